//! Static lookup services for locations and operating companies.
//!
//! Movement reports carry STANOX codes and numeric TOC codes; these
//! services resolve them to named entities. Both are pure lookups over
//! immutable tables: a miss means the code is unknown to the table, which
//! is legitimate, not an error. Directories are shared behind `Arc` and
//! are safe for concurrent reads.

mod directory;

pub use directory::{CompanyDirectory, StationDirectory, TableError};

use std::fmt;

use serde::Deserialize;

/// A physical location on the rail network, identified by STANOX code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Location {
    /// Numeric STANOX code, kept in its wire string form.
    pub stanox: String,
    /// Human-readable location name.
    pub name: String,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A train operating company, identified by numeric TOC code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Company {
    /// Numeric TOC code.
    pub code: u16,
    /// Company name.
    pub name: String,
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// STANOX code → location resolution.
pub trait LocationLookup: Send + Sync {
    /// Resolve a STANOX code. `None` means the code is not in the table.
    fn from_stanox(&self, stanox: &str) -> Option<Location>;
}

/// Numeric TOC code → operating company resolution.
pub trait CompanyLookup: Send + Sync {
    /// Resolve a numeric TOC code. `None` means the code is not in the table.
    fn from_numeric_code(&self, code: u16) -> Option<Company>;
}
