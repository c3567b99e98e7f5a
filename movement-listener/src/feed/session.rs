//! Feed session interface and configuration.

use std::path::PathBuf;

use async_trait::async_trait;

use super::types::RawEnvelope;

/// Default broker hostname for the National Rail data feeds.
const DEFAULT_HOSTNAME: &str = "datafeeds.networkrail.co.uk";

/// Default STOMP port on the broker.
const DEFAULT_PORT: u16 = 61618;

/// Default channel carrying movement reports for all operating companies.
const DEFAULT_CHANNEL: &str = "TRAIN_MVT_ALL_TOC";

/// Configuration for a broker feed session.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Broker hostname.
    pub hostname: String,
    /// Broker port.
    pub port: u16,
    /// Channel to subscribe to.
    pub channel: String,
    /// Account username.
    pub username: String,
    /// Account password.
    pub password: String,
}

impl FeedConfig {
    /// Create a config with the given credentials and production defaults.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            hostname: DEFAULT_HOSTNAME.to_string(),
            port: DEFAULT_PORT,
            channel: DEFAULT_CHANNEL.to_string(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Set a custom broker hostname (for testing).
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    /// Set a custom broker port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Subscribe to a different channel.
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    /// The broker topic for the configured channel.
    pub fn topic(&self) -> String {
        format!("/topic/{}", self.channel)
    }
}

/// Errors from a feed session.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// Failed to read a replay batch file
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A batch file did not hold a JSON array of envelopes
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A replay directory held no batch files
    #[error("no batch files found in {}", .0.display())]
    NoBatches(PathBuf),

    /// The broker connection dropped and could not be re-established.
    ///
    /// Reserved for broker-backed implementations; the only error in
    /// this system that is allowed to end the process.
    #[error("connection lost: {0}")]
    ConnectionLost(String),
}

/// A source of envelope batches.
///
/// Implementations own connect/authenticate/subscribe/acknowledge and
/// deliver batches one at a time, in feed order. The processor never
/// calls `next_batch` concurrently with itself, so implementations need
/// no internal ordering beyond the feed's own.
#[async_trait]
pub trait FeedSession: Send {
    /// Wait for and return the next batch.
    ///
    /// `Ok(None)` means the stream is exhausted (replay sessions) or was
    /// shut down cleanly.
    async fn next_batch(&mut self) -> Result<Option<Vec<RawEnvelope>>, FeedError>;
}
