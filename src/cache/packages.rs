//! Read-through package cache with a freshness window

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cache::{CacheEntryStatus, CacheStatus};
use crate::error::Result;
use crate::packages::{PackageInfo, PackageSource};

/// Default freshness window: 24 hours
const DEFAULT_TTL_HOURS: i64 = 24;

/// A cached lookup result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// When the lookup was made
    pub ts: DateTime<Utc>,
    /// The resolved package
    pub data: PackageInfo,
}

impl CacheEntry {
    /// Entries stamped in the future (clock rollback, edited file) are stale
    fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let age = now.signed_duration_since(self.ts);
        age >= Duration::zero() && age < ttl
    }
}

/// Package lookups keyed by search query, persisted as one JSON document
#[derive(Debug)]
pub struct PackageCache {
    cache_file: PathBuf,
    ttl: Duration,
    entries: BTreeMap<String, CacheEntry>,
}

impl PackageCache {
    /// Empty cache backed by `cache_file`
    pub fn new(cache_file: impl Into<PathBuf>) -> Self {
        Self::with_ttl(cache_file, Duration::hours(DEFAULT_TTL_HOURS))
    }

    /// Empty cache with a custom freshness window
    pub fn with_ttl(cache_file: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            cache_file: cache_file.into(),
            ttl,
            entries: BTreeMap::new(),
        }
    }

    /// Load the persisted document. A missing or unreadable file yields an
    /// empty cache.
    pub fn load_from_disk(cache_file: impl Into<PathBuf>, ttl: Duration) -> Self {
        let mut cache = Self::with_ttl(cache_file, ttl);

        let data = match fs::read_to_string(&cache.cache_file) {
            Ok(data) => data,
            Err(e) => {
                debug!(file = %cache.cache_file.display(), %e, "no package cache on disk");
                return cache;
            }
        };

        match serde_json::from_str::<BTreeMap<String, CacheEntry>>(&data) {
            Ok(entries) => {
                debug!(count = entries.len(), "loaded package cache");
                cache.entries = entries;
            }
            Err(e) => {
                warn!(file = %cache.cache_file.display(), %e, "ignoring corrupt package cache");
            }
        }

        cache
    }

    /// Write every entry to disk, replacing the previous document atomically
    pub fn save_to_disk(&self) -> Result<()> {
        if let Some(parent) = self.cache_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(&self.entries)?;
        let tmp = tmp_path(&self.cache_file);
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.cache_file)?;

        debug!(count = self.entries.len(), file = %self.cache_file.display(), "saved package cache");
        Ok(())
    }

    /// Return the cached package for `query`, looking it up when absent or stale
    pub fn get(&mut self, query: &str, source: &mut dyn PackageSource) -> Result<PackageInfo> {
        self.get_at(query, source, Utc::now())
    }

    /// Same as [`get`](Self::get) with an explicit clock
    pub fn get_at(
        &mut self,
        query: &str,
        source: &mut dyn PackageSource,
        now: DateTime<Utc>,
    ) -> Result<PackageInfo> {
        if let Some(entry) = self.fresh_entry(query, now) {
            debug!(query, "package cache hit");
            return Ok(entry.data.clone());
        }

        debug!(query, "package cache miss");
        let data = source.search_package(query)?;
        self.entries.insert(
            query.to_string(),
            CacheEntry {
                ts: now,
                data: data.clone(),
            },
        );
        Ok(data)
    }

    /// Entry for `query` if it is still within the freshness window
    pub fn fresh_entry(&self, query: &str, now: DateTime<Utc>) -> Option<&CacheEntry> {
        self.entries
            .get(query)
            .filter(|entry| entry.is_fresh(now, self.ttl))
    }

    /// Drop one entry so the next access refreshes it
    pub fn invalidate(&mut self, query: &str) -> bool {
        self.entries.remove(query).is_some()
    }

    /// Remove all entries and the backing file
    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        if self.cache_file.exists() {
            fs::remove_file(&self.cache_file)?;
        }
        Ok(())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &CacheEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn file(&self) -> &Path {
        &self.cache_file
    }

    /// Per-entry freshness report
    pub fn status(&self, now: DateTime<Utc>) -> CacheStatus {
        CacheStatus {
            file: self.cache_file.clone(),
            exists: self.cache_file.exists(),
            entries: self
                .entries
                .iter()
                .map(|(query, entry)| CacheEntryStatus {
                    query: query.clone(),
                    package: entry.data.name.clone(),
                    age_secs: now.signed_duration_since(entry.ts).num_seconds(),
                    fresh: entry.is_fresh(now, self.ttl),
                })
                .collect(),
        }
    }
}

fn tmp_path(file: &Path) -> PathBuf {
    let mut name = file.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    file.with_file_name(name)
}
