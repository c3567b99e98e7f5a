//! Network Rail TRUST train movement feed listener.
//!
//! Consumes batches of JSON-encoded movement reports from the
//! `TRAIN_MVT_ALL_TOC` channel, decodes each report's raw string fields
//! into typed domain values, and renders a normalized summary per report.

pub mod decode;
pub mod domain;
pub mod feed;
pub mod lookup;
pub mod processor;
