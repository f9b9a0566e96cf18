//! Cache module for package lookups
//!
//! Keeps resolved package descriptions on disk so repeated wizard runs do not
//! hit the MCP search tool for every role.

mod packages;

pub use packages::{CacheEntry, PackageCache};

use std::path::PathBuf;

/// Summary of the on-disk cache
#[derive(Debug, Clone, serde::Serialize)]
pub struct CacheStatus {
    pub file: PathBuf,
    pub exists: bool,
    pub entries: Vec<CacheEntryStatus>,
}

impl CacheStatus {
    pub fn fresh_count(&self) -> usize {
        self.entries.iter().filter(|e| e.fresh).count()
    }

    pub fn stale_count(&self) -> usize {
        self.entries.len() - self.fresh_count()
    }
}

/// Status of a single cached query
#[derive(Debug, Clone, serde::Serialize)]
pub struct CacheEntryStatus {
    pub query: String,
    pub package: String,
    pub age_secs: i64,
    pub fresh: bool,
}
