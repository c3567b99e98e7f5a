//! Feed envelope types and the broker session interface.
//!
//! The broker transport itself (connect, authenticate, subscribe, ack,
//! reconnect) is an external collaborator; this module owns the shapes
//! that cross the boundary and a replay session for working without
//! broker credentials.

mod mock;
mod session;
mod types;

pub use mock::MockFeedSession;
pub use session::{FeedConfig, FeedError, FeedSession};
pub use types::{Header, MSG_TYPE_MOVEMENT, RawEnvelope};
