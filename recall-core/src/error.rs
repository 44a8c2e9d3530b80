//! Error types for RECALL operations

use thiserror::Error;

/// Configuration errors, raised synchronously at setup time.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Cache engine not supported: {engine}")]
    EngineNotSupported { engine: String },
}

/// Data source errors: the underlying execution primitive failed.
///
/// Never suppressed and never written to the cache.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("Data source unreachable: {reason}")]
    Unreachable { reason: String },

    #[error("Query failed on {collection}: {reason}")]
    QueryFailed { collection: String, reason: String },
}

/// Cache backend errors: the external store's get/set/delete failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Cache backend operation failed: {reason}")]
    Backend { reason: String },

    #[error("Envelope serialization failed: {reason}")]
    Serialization { reason: String },
}

/// Master error type for all RECALL errors.
#[derive(Debug, Clone, Error)]
pub enum RecallError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias for RECALL operations.
pub type RecallResult<T> = Result<T, RecallError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display_engine_not_supported() {
        let err = ConfigError::EngineNotSupported {
            engine: "redis".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("not supported"));
        assert!(msg.contains("redis"));
    }

    #[test]
    fn test_source_error_display_query_failed() {
        let err = SourceError::QueryFailed {
            collection: "records".to_string(),
            reason: "cursor timed out".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("records"));
        assert!(msg.contains("cursor timed out"));
    }

    #[test]
    fn test_store_error_display_backend() {
        let err = StoreError::Backend {
            reason: "connection refused".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Cache backend"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_recall_error_from_variants() {
        let config = RecallError::from(ConfigError::MissingRequired {
            field: "host".to_string(),
        });
        assert!(matches!(config, RecallError::Config(_)));

        let source = RecallError::from(SourceError::Unreachable {
            reason: "connection closed".to_string(),
        });
        assert!(matches!(source, RecallError::Source(_)));

        let store = RecallError::from(StoreError::Backend {
            reason: "timeout".to_string(),
        });
        assert!(matches!(store, RecallError::Store(_)));
    }
}
