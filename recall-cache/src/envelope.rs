//! Stored envelope and read outcome types.
//!
//! A [`ResultEnvelope`] is what actually sits in the store: the payload plus
//! the moment the real query produced it. Staleness is always judged against
//! that issue timestamp, never against store-level expiry, which belongs to
//! the backend. A [`Fetched`] is what an execution hands back to the caller:
//! the payload plus provenance metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// A cached payload paired with its issue timestamp.
///
/// `issued_at` is set exactly once, when the real query's result was
/// obtained. Cache hits never touch it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    payload: Value,
    issued_at: DateTime<Utc>,
}

impl ResultEnvelope {
    /// Wrap a freshly fetched payload, stamping it with the current time.
    pub fn new(payload: Value) -> Self {
        Self {
            payload,
            issued_at: Utc::now(),
        }
    }

    /// Wrap a payload with an explicit issue timestamp.
    pub fn with_issued_at(payload: Value, issued_at: DateTime<Utc>) -> Self {
        Self { payload, issued_at }
    }

    /// The cached payload.
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Consume the envelope and return the payload.
    pub fn into_payload(self) -> Value {
        self.payload
    }

    /// When the payload was produced by the data source.
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// How old the payload is.
    pub fn age(&self) -> Duration {
        let now = Utc::now();
        if now > self.issued_at {
            (now - self.issued_at).to_std().unwrap_or(Duration::ZERO)
        } else {
            Duration::ZERO
        }
    }

    /// Whether the payload is younger than the given window.
    pub fn is_fresh_within(&self, window: Duration) -> bool {
        self.age() < window
    }
}

/// How an execution resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheOutcome {
    /// Served from cache, inside the staleness window.
    HitFresh,
    /// Served from cache past the window because the source was unreachable.
    HitDegraded,
    /// Fetched from the data source (entry absent or past the window).
    MissRefresh,
    /// Query was never marked cacheable; the cache was not consulted.
    Bypass,
}

/// The result of one execution: payload plus provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    payload: Value,
    outcome: CacheOutcome,
    issued_at: DateTime<Utc>,
}

impl Fetched {
    /// Build a result from a stored or freshly created envelope.
    pub(crate) fn from_envelope(envelope: ResultEnvelope, outcome: CacheOutcome) -> Self {
        Self {
            issued_at: envelope.issued_at,
            payload: envelope.payload,
            outcome,
        }
    }

    /// Build a pass-through result, never touched by the cache.
    pub(crate) fn bypass(payload: Value) -> Self {
        Self {
            payload,
            outcome: CacheOutcome::Bypass,
            issued_at: Utc::now(),
        }
    }

    /// The result payload.
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Consume the result and return the payload.
    pub fn into_payload(self) -> Value {
        self.payload
    }

    /// How this execution resolved.
    pub fn outcome(&self) -> CacheOutcome {
        self.outcome
    }

    /// When the payload was produced by the data source.
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Whether the payload came out of the cache.
    pub fn was_cached(&self) -> bool {
        matches!(
            self.outcome,
            CacheOutcome::HitFresh | CacheOutcome::HitDegraded
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================
