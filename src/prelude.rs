pub use crate::builder::{Cache, CacheBuilder, PolicyKind};
pub use crate::ds::{FrequencyBuckets, GhostList, IntrusiveList, SlotArena, SlotId};
pub use crate::error::CacheError;
pub use crate::policy::arc::ArcCache;
pub use crate::policy::lfu::LfuCache;
pub use crate::policy::lru::LruCore;
pub use crate::policy::lru_k::LrukCache;
pub use crate::sync::SyncCache;
pub use crate::traits::{CoreCache, MutableCache, ReadOnlyCache};
