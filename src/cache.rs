//! Compiled formatter caching.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;

use crate::error::PatternError;
use crate::formatter::Formatter;

/// Global cache for compiled format patterns.
static CACHE: Mutex<Option<LruCache<String, Formatter>>> = Mutex::new(None);

const CACHE_SIZE: usize = 100;

/// Get or compile a pattern, using the cache.
///
/// Racing compilations of the same pattern are wasteful but safe: compiled
/// formatters are deterministic and immutable, so whichever result lands in
/// the cache is interchangeable with the others.
pub fn get_or_compile(pattern: &str) -> Result<Formatter, PatternError> {
    let mut cache_guard = match CACHE.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };

    let cache =
        cache_guard.get_or_insert_with(|| LruCache::new(NonZeroUsize::new(CACHE_SIZE).unwrap()));

    if let Some(formatter) = cache.get(pattern) {
        return Ok(formatter.clone());
    }

    let formatter = Formatter::compile(pattern)?;
    cache.put(pattern.to_string(), formatter.clone());
    Ok(formatter)
}
