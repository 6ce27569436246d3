//! Error types for the evictkit library.
//!
//! The error surface is intentionally small: replacement policies never fail
//! on their hot paths. Misses and evictions are silent; the only observable
//! failures are an absent key on the value-returning read surface and invalid
//! construction parameters.
//!
//! ## Example
//!
//! ```
//! use evictkit::error::CacheError;
//! use evictkit::policy::lfu::LfuCache;
//!
//! // Fallible constructor for user-configurable parameters
//! let cache: Result<LfuCache<u64, String>, CacheError> = LfuCache::try_new(100, 10);
//! assert!(cache.is_ok());
//!
//! // An aging threshold of zero is caught without panicking
//! let bad = LfuCache::<u64, String>::try_new(100, 0);
//! assert_eq!(bad.unwrap_err(), CacheError::InvalidConfig("aging_threshold must be >= 1"));
//! ```

use std::fmt;

/// Error returned by fallible cache operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheError {
    /// The requested key is not resident in the cache.
    ///
    /// Surfaced only by the value-returning read surface
    /// ([`SyncCache::try_get`](crate::sync::SyncCache::try_get)); the
    /// `Option`-returning form reports the same condition as `None`.
    NotFound,

    /// A construction parameter failed validation.
    ///
    /// Produced by `try_new` constructors and
    /// [`CacheBuilder::try_build`](crate::builder::CacheBuilder::try_build).
    /// The message names the offending parameter.
    InvalidConfig(&'static str),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::NotFound => f.write_str("key not found"),
            CacheError::InvalidConfig(msg) => write!(f, "invalid cache configuration: {msg}"),
        }
    }
}

impl std::error::Error for CacheError {}
