//! In-memory lookup directories, loadable from JSON files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{Company, CompanyLookup, Location, LocationLookup};

/// Error loading a lookup table from disk.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// STANOX → location directory.
///
/// # Examples
///
/// ```
/// use movement_listener::lookup::{Location, LocationLookup, StationDirectory};
///
/// let directory = StationDirectory::from_entries([Location {
///     stanox: "72410".to_string(),
///     name: "London Euston".to_string(),
/// }]);
///
/// assert!(directory.from_stanox("72410").is_some());
/// assert!(directory.from_stanox("00000").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StationDirectory {
    by_stanox: HashMap<String, Location>,
}

impl StationDirectory {
    /// Create an empty directory. Every lookup will miss.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a directory from location entries.
    pub fn from_entries(entries: impl IntoIterator<Item = Location>) -> Self {
        let by_stanox = entries
            .into_iter()
            .map(|loc| (loc.stanox.clone(), loc))
            .collect();
        Self { by_stanox }
    }

    /// Load a directory from a JSON file holding an array of locations.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: Vec<Location> =
            serde_json::from_str(&json).map_err(|source| TableError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_entries(entries))
    }

    /// Number of locations in the directory.
    pub fn len(&self) -> usize {
        self.by_stanox.len()
    }

    /// Whether the directory holds no locations.
    pub fn is_empty(&self) -> bool {
        self.by_stanox.is_empty()
    }
}

impl LocationLookup for StationDirectory {
    fn from_stanox(&self, stanox: &str) -> Option<Location> {
        self.by_stanox.get(stanox).cloned()
    }
}

/// Numeric TOC code → company directory.
#[derive(Debug, Clone, Default)]
pub struct CompanyDirectory {
    by_code: HashMap<u16, Company>,
}

impl CompanyDirectory {
    /// Create an empty directory. Every lookup will miss.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a directory from company entries.
    pub fn from_entries(entries: impl IntoIterator<Item = Company>) -> Self {
        let by_code = entries
            .into_iter()
            .map(|company| (company.code, company))
            .collect();
        Self { by_code }
    }

    /// Load a directory from a JSON file holding an array of companies.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: Vec<Company> =
            serde_json::from_str(&json).map_err(|source| TableError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_entries(entries))
    }

    /// Number of companies in the directory.
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    /// Whether the directory holds no companies.
    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

impl CompanyLookup for CompanyDirectory {
    fn from_numeric_code(&self, code: u16) -> Option<Company> {
        self.by_code.get(&code).cloned()
    }
}
