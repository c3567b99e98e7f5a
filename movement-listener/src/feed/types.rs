//! Wire envelope DTOs.
//!
//! These types map directly to the JSON the feed delivers. The shared
//! channel carries several message types distinguished by the header;
//! bodies stay raw JSON maps because only accepted movement reports are
//! ever decoded, and then lazily.

use serde::Deserialize;
use serde_json::{Map, Value};

/// The `msg_type` code for a train movement report.
///
/// Other codes on the channel (activations, cancellations, reinstatements)
/// are expected traffic that this listener filters out.
pub const MSG_TYPE_MOVEMENT: &str = "0003";

/// One message as received from the feed: a routing header and a raw body.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEnvelope {
    pub header: Header,
    pub body: Map<String, Value>,
}

/// Envelope routing header.
///
/// A header looks like:
///
/// ```json
/// {
///     "msg_type": "0003",
///     "source_system_id": "TRUST",
///     "msg_queue_timestamp": "1455883630000",
///     "original_data_source": "SMART",
///     "user_id": "",
///     "source_dev_id": ""
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Header {
    /// Message type code; `"0003"` is a movement report.
    pub msg_type: String,

    /// System that produced the message, e.g. `"TRUST"`.
    #[serde(default)]
    pub source_system_id: String,

    /// Epoch timestamp (numeric string) at which the message was queued.
    #[serde(default)]
    pub msg_queue_timestamp: String,

    /// Upstream data source, e.g. `"SMART"`.
    #[serde(default)]
    pub original_data_source: String,

    /// Publishing user; blank on this feed.
    #[serde(default)]
    pub user_id: String,

    /// Publishing device; blank on this feed.
    #[serde(default)]
    pub source_dev_id: String,
}

impl Header {
    /// Whether this envelope carries a movement report.
    ///
    /// A `false` here is a filtering decision, not an error: the channel
    /// is shared by several message types and we only consume one.
    pub fn is_movement_report(&self) -> bool {
        self.msg_type == MSG_TYPE_MOVEMENT
    }
}
