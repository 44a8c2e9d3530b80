//! Cache store contract.
//!
//! This is the seam to the external key/value backend. The cache core only
//! consumes this contract; entry expiry is owned and enforced by the store,
//! not by the read-through layer.

use async_trait::async_trait;
use recall_core::RecallResult;
use std::time::Duration;

use crate::envelope::ResultEnvelope;

/// Pluggable key/value store holding cache entries with per-entry TTL.
///
/// Implementations must be thread-safe and support concurrent access.
/// Per-key get/set is expected to be linearizable: a completed `set` is
/// visible to subsequent `get` and `delete` calls for the same key.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Look up an envelope by key. `Ok(None)` on absence or expiry.
    async fn get(&self, key: &str) -> RecallResult<Option<ResultEnvelope>>;

    /// Store an envelope under the key.
    ///
    /// `Duration::ZERO` means "use the store's default expiry"; any other
    /// value overrides it for this entry.
    async fn set(&self, key: &str, envelope: ResultEnvelope, ttl: Duration) -> RecallResult<()>;

    /// Delete the entry for a key. Deleting an absent key is a success.
    async fn delete(&self, key: &str) -> RecallResult<()>;

    /// Drop every entry.
    async fn clear(&self) -> RecallResult<()>;
}

/// Statistics about cache store usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of lookups that returned a live entry.
    pub hits: u64,
    /// Number of lookups that found nothing usable.
    pub misses: u64,
    /// Number of entries currently held.
    pub entry_count: u64,
    /// Number of entries dropped because their TTL had lapsed.
    pub expirations: u64,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
