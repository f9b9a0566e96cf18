mod cache;
mod config;
mod packages;
mod run;

use std::path::Path;

use tracing::warn;

use crate::cache::PackageCache;
use crate::config::Config;

pub use self::cache::cache;
pub use self::config::config;
pub use self::packages::{packages, search};
pub use self::run::run;

/// Load the package cache from the override path or the configured one
fn open_cache(config: &Config, cache_file: Option<&Path>) -> PackageCache {
    let file = cache_file.unwrap_or(&config.cache.file);
    PackageCache::load_from_disk(file, config.cache.ttl())
}

/// Persist lookups; a failed write only costs a refetch next time
fn persist(cache: &PackageCache) {
    if let Err(e) = cache.save_to_disk() {
        warn!(file = %cache.file().display(), error = %e, "could not save package cache");
    }
}
