//! Read-through decorator over a query-execution capability.
//!
//! This module implements the per-call decision logic: consult the store,
//! judge freshness against the staleness window and the source's
//! reachability, and either serve the stored envelope or execute the real
//! query and refresh the entry.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use recall_core::{CacheableQuery, QueryDescriptor, RecallResult};

use crate::envelope::{CacheOutcome, Fetched, ResultEnvelope};
use crate::jitter::JitterPolicy;
use crate::store::CacheStore;

/// Grace period during which a stored entry is served without consulting
/// the data source.
pub const DEFAULT_STALENESS_WINDOW: Duration = Duration::from_secs(5);

/// Configuration for the read-through cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Entries younger than this are served without a reachability check.
    /// Entries older than this are refreshed while the source is reachable,
    /// and served as-is while it is not.
    pub staleness_window: Duration,
    /// Jitter applied to TTLs at store-write time.
    pub jitter: JitterPolicy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            staleness_window: DEFAULT_STALENESS_WINDOW,
            jitter: JitterPolicy::default(),
        }
    }
}

impl CacheConfig {
    /// Create a cache config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the staleness window.
    pub fn with_staleness_window(mut self, window: Duration) -> Self {
        self.staleness_window = window;
        self
    }

    /// Set the jitter policy.
    pub fn with_jitter(mut self, jitter: JitterPolicy) -> Self {
        self.jitter = jitter;
        self
    }
}

/// The query-execution capability of the underlying data source.
///
/// Implementations run the described query with no cache awareness: a
/// faithful pass-through of the original, unwrapped query.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Execute the described query against the data source.
    async fn execute_once(&self, descriptor: &QueryDescriptor) -> RecallResult<Value>;
}

/// Connection-liveness signal from the data source driver.
///
/// Polled at decision time, not subscribed to.
pub trait ReachabilityProbe: Send + Sync {
    /// Whether the data source connection is currently established.
    fn is_connected(&self) -> bool;
}

/// Probe for setups without a liveness signal: always reachable, so stale
/// entries are always refreshed rather than served degraded.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConnected;

impl ReachabilityProbe for AlwaysConnected {
    fn is_connected(&self) -> bool {
        true
    }
}

/// Read-through query result cache.
///
/// Each instance composes a store, a reachability probe, and a config;
/// there is no process-wide state and no installation step. Calls are
/// independent: no cross-call locking and no de-duplication of concurrent
/// identical misses - both will fetch and both will write, last write wins,
/// which is idempotent per key.
///
/// # Example
///
/// ```ignore
/// let cache = QueryCache::with_defaults(store, probe);
/// let query = CacheableQuery::new(ReadQuery::find("records"))
///     .cached(CachePolicy::with_ttl(Duration::from_secs(60)));
///
/// let fetched = cache.execute(&query, &source).await?;
/// println!("{} (cached: {})", fetched.payload(), fetched.was_cached());
/// ```
pub struct QueryCache {
    /// The external key/value store.
    store: Arc<dyn CacheStore>,
    /// Connection-liveness signal for the degraded-fallback decision.
    probe: Arc<dyn ReachabilityProbe>,
    /// Cache configuration.
    config: CacheConfig,
}

impl QueryCache {
    /// Create a read-through cache.
    pub fn new(
        store: Arc<dyn CacheStore>,
        probe: Arc<dyn ReachabilityProbe>,
        config: CacheConfig,
    ) -> Self {
        Self {
            store,
            probe,
            config,
        }
    }

    /// Create a read-through cache with default configuration.
    pub fn with_defaults(store: Arc<dyn CacheStore>, probe: Arc<dyn ReachabilityProbe>) -> Self {
        Self::new(store, probe, CacheConfig::default())
    }

    /// Get the cache configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Get a reference to the underlying store.
    pub fn store(&self) -> &dyn CacheStore {
        self.store.as_ref()
    }

    /// Execute a query through the cache.
    ///
    /// A query with no cache policy is passed straight to the source and the
    /// store is never consulted. For cacheable queries the outcome is
    /// decided once per call:
    ///
    /// - entry younger than the staleness window: served from cache;
    /// - entry older than the window while the source is unreachable:
    ///   served from cache (degraded availability);
    /// - otherwise: the source is executed, and on success the entry is
    ///   refreshed with a jittered TTL before the call completes.
    ///
    /// Source failures propagate and are never written to the cache. Store
    /// failures never fail the call: a failed lookup counts as a miss and a
    /// failed write is logged while the fetched result is still delivered.
    pub async fn execute<S: QueryExecutor>(
        &self,
        query: &CacheableQuery,
        source: &S,
    ) -> RecallResult<Fetched> {
        let policy = match query.policy.as_ref() {
            Some(policy) => policy,
            None => {
                let payload = source.execute_once(&query.descriptor).await?;
                return Ok(Fetched::bypass(payload));
            }
        };

        let key = query.cache_key();

        let cached = match self.store.get(&key).await {
            Ok(entry) => entry,
            Err(err) => {
                warn!(key = %key, error = %err, "cache lookup failed, treating as miss");
                None
            }
        };

        if let Some(envelope) = cached {
            if envelope.is_fresh_within(self.config.staleness_window) {
                debug!(key = %key, "cache hit");
                return Ok(Fetched::from_envelope(envelope, CacheOutcome::HitFresh));
            }
            if !self.probe.is_connected() {
                debug!(key = %key, "source unreachable, serving stale entry");
                return Ok(Fetched::from_envelope(envelope, CacheOutcome::HitDegraded));
            }
            debug!(key = %key, "entry past staleness window, refreshing");
        } else {
            debug!(key = %key, "cache miss");
        }

        let payload = source.execute_once(&query.descriptor).await?;
        let envelope = ResultEnvelope::new(payload);
        let ttl = self.config.jitter.apply(policy.ttl);
        if let Err(err) = self.store.set(&key, envelope.clone(), ttl).await {
            warn!(key = %key, error = %err, "cache write failed, serving result uncached");
        }
        Ok(Fetched::from_envelope(envelope, CacheOutcome::MissRefresh))
    }

    /// Delete the entry under an explicit key.
    ///
    /// A no-op success for an empty key or an absent entry. This is the only
    /// externally triggerable cache-busting operation; staleness is otherwise
    /// bounded by TTL and the staleness-window fallback.
    pub async fn invalidate(&self, key: &str) -> RecallResult<()> {
        if key.is_empty() {
            return Ok(());
        }
        self.store.delete(key).await
    }

    /// Drop every entry in the store.
    pub async fn clear(&self) -> RecallResult<()> {
        self.store.clear().await
    }
}

// =============================================================================
// TESTS
// =============================================================================
