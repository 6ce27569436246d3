//! evictkit: bounded in-memory caches with interchangeable replacement
//! policies.
//!
//! Four engines behind one trait surface:
//!
//! - [`policy::lru::LruCore`]: classic recency ordering.
//! - [`policy::lru_k::LrukCache`]: LRU behind a K-reference admission
//!   filter; one-shot scans never displace resident entries.
//! - [`policy::lfu::LfuCache`]: frequency ordering with periodic
//!   halving-based aging.
//! - [`policy::arc::ArcCache`]: a two-arm adaptive cache that shifts
//!   capacity between recency and frequency based on ghost-list hits.
//!
//! Cores are single-threaded and run every hit in amortised O(1); wrap one
//! in [`sync::SyncCache`] for a locked, cloneable handle. Construct engines
//! directly or through [`builder::CacheBuilder`] to keep policy choice out
//! of call sites.
//!
//! ```
//! use evictkit::prelude::*;
//!
//! let mut cache = CacheBuilder::new(1024).build::<u64, String>(PolicyKind::Lru);
//! cache.insert(7, "seven".to_string());
//! assert_eq!(cache.get(&7).map(String::as_str), Some("seven"));
//! ```

pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;
pub mod prelude;
pub mod sync;
pub mod traits;
