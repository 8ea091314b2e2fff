//! Error types for evictkit.
//!
//! ## Key Components
//!
//! - [`InvariantError`]: returned by `check_invariants` when the key index and
//!   the ordering structure of a cache disagree.
//! - [`ConfigError`]: returned when a cache configuration is rejected
//!   (e.g. zero shards).
//!
//! A cache miss is never an error; lookups return `None`.
//!
//! ```
//! use evictkit::builder::{CacheBuilder, CachePolicy};
//! use evictkit::error::ConfigError;
//!
//! let bad = CacheBuilder::new(100).shards(0).try_build_sharded::<u64, u64>(CachePolicy::Lru);
//! let err: ConfigError = bad.unwrap_err();
//! assert!(err.to_string().contains("shard"));
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Internal bookkeeping of a cache is inconsistent.
///
/// This indicates a defect in the cache itself, not a misuse by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// A cache configuration parameter is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invariant_error_displays_message() {
        let err = InvariantError::new("index holds 3 keys, list holds 2");
        assert_eq!(err.to_string(), "index holds 3 keys, list holds 2");
        assert_eq!(err.message(), "index holds 3 keys, list holds 2");
        assert_eq!(err.clone(), err);
    }

    #[test]
    fn config_error_displays_message() {
        let err = ConfigError::new("shard count must be greater than zero");
        assert_eq!(err.to_string(), "shard count must be greater than zero");
        assert!(format!("{err:?}").contains("shard count"));
    }

    #[test]
    fn both_implement_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<InvariantError>();
        assert_error::<ConfigError>();
    }
}
