//! Cache backend configuration types.
//!
//! Settings carry backend selection and its connection parameters. Validation
//! is shape-level only: the store behind the selection owns its own deeper
//! connection handling.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Selectable cache backend engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheEngine {
    /// In-process memory store.
    Memory,
    /// External Redis instance, plugged in through the store contract.
    Redis,
}

impl CacheEngine {
    /// Engine name as it appears in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheEngine::Memory => "memory",
            CacheEngine::Redis => "redis",
        }
    }
}

/// Cache backend settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Backend engine selection.
    pub engine: CacheEngine,
    /// Backend host, for engines that connect over the network.
    pub host: String,
    /// Backend port, for engines that connect over the network.
    pub port: u16,
    /// Emit verbose cache decision logs.
    pub debug: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            engine: CacheEngine::Redis,
            host: "127.0.0.1".to_string(),
            port: 6379,
            debug: false,
        }
    }
}

impl CacheSettings {
    /// Settings for the in-process memory store.
    pub fn memory() -> Self {
        Self {
            engine: CacheEngine::Memory,
            host: String::new(),
            port: 0,
            debug: false,
        }
    }

    /// Shape-level validation of the settings.
    ///
    /// Networked engines need a host and a non-zero port; nothing deeper is
    /// checked here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.engine {
            CacheEngine::Memory => Ok(()),
            CacheEngine::Redis => {
                if self.host.is_empty() {
                    return Err(ConfigError::MissingRequired {
                        field: "host".to_string(),
                    });
                }
                if self.port == 0 {
                    return Err(ConfigError::InvalidValue {
                        field: "port".to_string(),
                        value: "0".to_string(),
                        reason: "must be non-zero for networked engines".to_string(),
                    });
                }
                Ok(())
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
