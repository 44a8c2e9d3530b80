//! RECALL Cache - Read-Through Query Result Caching
//!
//! A read-through cache for database query results. Queries are identified
//! by a deterministic fingerprint of their structural content (see
//! `recall-core`), stored with a jittered TTL, and served back under an
//! explicit freshness rule.
//!
//! # Design Philosophy
//!
//! Staleness is explicit, not hidden. Every stored payload carries the
//! timestamp the data source produced it, and every read decides between
//! three terminal outcomes: serve fresh, serve stale because the source is
//! unreachable (degraded availability), or refetch. Caching is an
//! optimization, never a correctness dependency: a failing store degrades to
//! the data source, not to an error.
//!
//! # Example
//!
//! ```ignore
//! use recall_cache::{store_for, AlwaysConnected, QueryCache};
//! use recall_core::{CachePolicy, CacheableQuery, CacheSettings, ReadQuery};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let store = store_for(&CacheSettings::memory())?;
//! let cache = QueryCache::with_defaults(store, Arc::new(AlwaysConnected));
//!
//! let query = CacheableQuery::new(ReadQuery::find("records"))
//!     .cached(CachePolicy::with_ttl(Duration::from_secs(60)));
//! let fetched = cache.execute(&query, &source).await?;
//! ```

use std::sync::Arc;

use recall_core::{CacheEngine, CacheSettings, ConfigError, RecallResult};

pub mod envelope;
pub mod jitter;
pub mod memory;
pub mod read_through;
pub mod store;

pub use envelope::{CacheOutcome, Fetched, ResultEnvelope};
pub use jitter::{JitterPolicy, DEFAULT_JITTER_MAX, DEFAULT_JITTER_MIN};
pub use memory::MemoryStore;
pub use read_through::{
    AlwaysConnected, CacheConfig, QueryCache, QueryExecutor, ReachabilityProbe,
    DEFAULT_STALENESS_WINDOW,
};
pub use store::{CacheStats, CacheStore};

/// Build a cache store from backend settings.
///
/// Settings are shape-validated first. The memory engine is served by
/// [`MemoryStore`]; networked engines are external collaborators plugged in
/// through the [`CacheStore`] trait, so selecting one here is a
/// configuration error.
pub fn store_for(settings: &CacheSettings) -> RecallResult<Arc<dyn CacheStore>> {
    settings.validate()?;
    match settings.engine {
        CacheEngine::Memory => Ok(Arc::new(MemoryStore::new())),
        CacheEngine::Redis => Err(ConfigError::EngineNotSupported {
            engine: settings.engine.as_str().to_string(),
        }
        .into()),
    }
}

// =============================================================================
// TESTS
// =============================================================================
