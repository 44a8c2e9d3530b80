//! RECALL Core - Query Descriptors and Shared Types
//!
//! Pure data structures plus the canonicalization and fingerprinting that
//! give a query its cacheable identity. All other crates depend on this.
//! No I/O and no cache behavior lives here.

use chrono::{DateTime, Utc};

pub mod canonical;
pub mod descriptor;
pub mod error;
pub mod fingerprint;
pub mod settings;

pub use canonical::{canonical_string, canonicalize};
pub use descriptor::{
    AggregateQuery, CachePolicy, CacheableQuery, QueryDescriptor, QueryOptions, ReadOp, ReadQuery,
};
pub use error::{ConfigError, RecallError, RecallResult, SourceError, StoreError};
pub use fingerprint::fingerprint;
pub use settings::{CacheEngine, CacheSettings};

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;
