//! Domain types for train movement reports.
//!
//! This module contains the decoded view over a movement report body and
//! the value types it is made of. Wire fields stay raw until an accessor
//! asks for them; only the cross-field schema assumption is checked at
//! construction time.

mod error;
mod event;
mod movement;

pub use error::{DecodeError, ValidationError};
pub use event::{EventType, VariationStatus};
pub use movement::MovementRecord;
