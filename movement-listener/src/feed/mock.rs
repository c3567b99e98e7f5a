//! Replay feed session for development and testing.
//!
//! Loads batches of envelopes from JSON files and serves them as if they
//! had arrived from the broker, without needing feed credentials.

use std::collections::VecDeque;
use std::path::Path;

use async_trait::async_trait;

use super::session::{FeedError, FeedSession};
use super::types::RawEnvelope;

/// Feed session that replays batches from JSON files.
///
/// Each `.json` file in the directory holds one batch (a JSON array of
/// envelopes); files are replayed in filename order, then the session
/// reports end of stream.
#[derive(Debug)]
pub struct MockFeedSession {
    batches: VecDeque<Vec<RawEnvelope>>,
}

impl MockFeedSession {
    /// Load every `.json` batch file from a directory.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, FeedError> {
        let dir = dir.as_ref();

        let entries = std::fs::read_dir(dir).map_err(|source| FeedError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| FeedError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut batches = VecDeque::with_capacity(paths.len());
        for path in paths {
            let json = std::fs::read_to_string(&path).map_err(|source| FeedError::Io {
                path: path.clone(),
                source,
            })?;
            let batch: Vec<RawEnvelope> =
                serde_json::from_str(&json).map_err(|source| FeedError::Parse {
                    path: path.clone(),
                    source,
                })?;
            batches.push_back(batch);
        }

        if batches.is_empty() {
            return Err(FeedError::NoBatches(dir.to_path_buf()));
        }

        Ok(Self { batches })
    }

    /// Build a session directly from in-memory batches.
    pub fn from_batches(batches: impl IntoIterator<Item = Vec<RawEnvelope>>) -> Self {
        Self {
            batches: batches.into_iter().collect(),
        }
    }

    /// Number of batches still to deliver.
    pub fn remaining(&self) -> usize {
        self.batches.len()
    }
}

#[async_trait]
impl FeedSession for MockFeedSession {
    async fn next_batch(&mut self) -> Result<Option<Vec<RawEnvelope>>, FeedError> {
        Ok(self.batches.pop_front())
    }
}
