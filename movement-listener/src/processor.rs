//! Per-batch message processing.
//!
//! Envelopes are handled strictly in arrival order and each one is
//! processed to completion before the next begins. A bad envelope is a
//! skip, never an abort: header rejections are expected traffic on a
//! shared channel, validation failures are logged with their raw payload
//! for offline inspection.

use std::io::Write;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, warn};

use crate::domain::MovementRecord;
use crate::feed::RawEnvelope;
use crate::lookup::{CompanyLookup, LocationLookup};

/// What happened to a batch, envelope by envelope.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Envelopes rendered to the output stream.
    pub rendered: usize,
    /// Envelopes dropped because the header was not a movement report.
    pub skipped_header: usize,
    /// Envelopes dropped because construction or rendering failed.
    pub failed_validation: usize,
}

/// Decodes accepted envelopes and renders them to an output stream.
pub struct MessageProcessor<W> {
    locations: Arc<dyn LocationLookup>,
    companies: Arc<dyn CompanyLookup>,
    out: W,
}

impl<W: Write> MessageProcessor<W> {
    /// Create a processor writing rendered records to `out`.
    pub fn new(
        locations: Arc<dyn LocationLookup>,
        companies: Arc<dyn CompanyLookup>,
        out: W,
    ) -> Self {
        Self {
            locations,
            companies,
            out,
        }
    }

    /// Process one batch of envelopes in arrival order.
    ///
    /// At-most-once per envelope per delivery: nothing is retried, and no
    /// failure here aborts the batch or the stream.
    pub fn process_batch(&mut self, batch: &[RawEnvelope]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for envelope in batch {
            if !envelope.header.is_movement_report() {
                debug!(
                    msg_type = %envelope.header.msg_type,
                    "dropping message with unrecognised header"
                );
                outcome.skipped_header += 1;
                continue;
            }

            let record = match MovementRecord::from_body(
                envelope.body.clone(),
                Arc::clone(&self.locations),
                Arc::clone(&self.companies),
            ) {
                Ok(record) => record,
                Err(e) => {
                    warn!(
                        error = %e,
                        payload = %serde_json::Value::Object(envelope.body.clone()),
                        "dropping message that failed validation"
                    );
                    outcome.failed_validation += 1;
                    continue;
                }
            };

            let rendered = match record.serialize() {
                Ok(rendered) => rendered,
                Err(e) => {
                    warn!(
                        error = %e,
                        payload = %serde_json::Value::Object(envelope.body.clone()),
                        "dropping message with undecodable field"
                    );
                    outcome.failed_validation += 1;
                    continue;
                }
            };

            match writeln!(self.out, "{rendered:#}") {
                Ok(()) => outcome.rendered += 1,
                Err(e) => {
                    error!(error = %e, "failed to write rendered record");
                }
            }
        }

        outcome
    }

    /// Consume the processor, returning the output stream.
    pub fn into_inner(self) -> W {
        self.out
    }
}
