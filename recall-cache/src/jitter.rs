//! TTL jitter policy.
//!
//! Many keys created together with the same nominal TTL would otherwise
//! expire in the same instant and stampede the data source with refetches.
//! Jitter spreads each stored TTL across a band around its nominal value.
//! Applied only at store-write time, never at read time.

use rand::Rng;
use recall_core::ConfigError;
use std::time::Duration;

/// Lower bound of the default jitter band.
pub const DEFAULT_JITTER_MIN: f64 = 0.75;
/// Upper bound of the default jitter band.
pub const DEFAULT_JITTER_MAX: f64 = 1.25;

/// Multiplicative jitter band applied to stored TTLs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JitterPolicy {
    factor_min: f64,
    factor_max: f64,
}

impl Default for JitterPolicy {
    fn default() -> Self {
        Self {
            factor_min: DEFAULT_JITTER_MIN,
            factor_max: DEFAULT_JITTER_MAX,
        }
    }
}

impl JitterPolicy {
    /// Create a policy with a custom band.
    pub fn new(factor_min: f64, factor_max: f64) -> Result<Self, ConfigError> {
        if !factor_min.is_finite() || factor_min <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "factor_min".to_string(),
                value: factor_min.to_string(),
                reason: "must be a positive finite factor".to_string(),
            });
        }
        if !factor_max.is_finite() || factor_max < factor_min {
            return Err(ConfigError::InvalidValue {
                field: "factor_max".to_string(),
                value: factor_max.to_string(),
                reason: "must be finite and not below factor_min".to_string(),
            });
        }
        Ok(Self {
            factor_min,
            factor_max,
        })
    }

    /// A policy that leaves TTLs untouched.
    pub fn disabled() -> Self {
        Self {
            factor_min: 1.0,
            factor_max: 1.0,
        }
    }

    /// Lower bound of the band.
    pub fn factor_min(&self) -> f64 {
        self.factor_min
    }

    /// Upper bound of the band.
    pub fn factor_max(&self) -> f64 {
        self.factor_max
    }

    /// Jitter a TTL. Zero passes through untouched: it means "store default"
    /// and carries no expiry instant to desynchronize.
    pub fn apply(&self, ttl: Duration) -> Duration {
        self.apply_with_rng(ttl, &mut rand::rng())
    }

    /// Jitter a TTL using the supplied random source.
    pub fn apply_with_rng<R: Rng + ?Sized>(&self, ttl: Duration, rng: &mut R) -> Duration {
        if ttl.is_zero() {
            return ttl;
        }
        if self.factor_min == self.factor_max {
            if self.factor_min == 1.0 {
                return ttl;
            }
            return ttl.mul_f64(self.factor_min);
        }
        let factor = rng.random_range(self.factor_min..=self.factor_max);
        ttl.mul_f64(factor)
    }
}

// =============================================================================
// TESTS
// =============================================================================
