//! Query descriptors: the structurally comparable identity of a query.
//!
//! A descriptor captures everything that determines what a query returns -
//! collection, operation, predicate, projection, and options - without any
//! reference to the driver object that will eventually run it. Two deeply
//! equal descriptors must always resolve to the same cache slot.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// Read operation discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReadOp {
    Find,
    FindOne,
    Count,
    Distinct,
}

impl ReadOp {
    /// Wire-level name of the operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadOp::Find => "find",
            ReadOp::FindOne => "findOne",
            ReadOp::Count => "count",
            ReadOp::Distinct => "distinct",
        }
    }
}

/// Cursor options that participate in a query's identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryOptions {
    /// Number of leading documents to skip.
    pub skip: Option<u64>,
    /// Maximum number of documents to return.
    pub limit: Option<u64>,
    /// Sort specification document.
    pub sort: Option<Value>,
}

/// A read query against a single collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadQuery {
    /// Target collection name.
    pub collection: String,
    /// Operation kind.
    pub op: ReadOp,
    /// Filter/predicate document. Key order is not significant.
    pub filter: Value,
    /// Requested field projection, if any.
    pub projection: Option<Value>,
    /// Cursor options.
    pub options: QueryOptions,
    /// Field name for `distinct` operations.
    pub distinct_field: Option<String>,
}

impl ReadQuery {
    /// Create a read query with an empty filter.
    pub fn new(collection: impl Into<String>, op: ReadOp) -> Self {
        Self {
            collection: collection.into(),
            op,
            filter: Value::Object(Map::new()),
            projection: None,
            options: QueryOptions::default(),
            distinct_field: None,
        }
    }

    /// Create a `find` query.
    pub fn find(collection: impl Into<String>) -> Self {
        Self::new(collection, ReadOp::Find)
    }

    /// Create a `findOne` query.
    pub fn find_one(collection: impl Into<String>) -> Self {
        Self::new(collection, ReadOp::FindOne)
    }

    /// Create a `count` query.
    pub fn count(collection: impl Into<String>) -> Self {
        Self::new(collection, ReadOp::Count)
    }

    /// Create a `distinct` query over the named field.
    pub fn distinct(collection: impl Into<String>, field: impl Into<String>) -> Self {
        let mut query = Self::new(collection, ReadOp::Distinct);
        query.distinct_field = Some(field.into());
        query
    }

    /// Set the filter document.
    pub fn with_filter(mut self, filter: Value) -> Self {
        self.filter = filter;
        self
    }

    /// Set the field projection.
    pub fn with_projection(mut self, projection: Value) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Set the skip offset.
    pub fn with_skip(mut self, skip: u64) -> Self {
        self.options.skip = Some(skip);
        self
    }

    /// Set the result limit.
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.options.limit = Some(limit);
        self
    }

    /// Set the sort specification.
    pub fn with_sort(mut self, sort: Value) -> Self {
        self.options.sort = Some(sort);
        self
    }
}

/// An aggregation query: an ordered pipeline over a collection.
///
/// Unlike filter documents, the pipeline is a sequence - stage order is
/// semantically significant and is preserved in the fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateQuery {
    /// Target collection name.
    pub collection: String,
    /// Ordered pipeline stages.
    pub pipeline: Vec<Value>,
    /// Cursor options.
    pub options: QueryOptions,
}

impl AggregateQuery {
    /// Create an aggregation query.
    pub fn new(collection: impl Into<String>, pipeline: Vec<Value>) -> Self {
        Self {
            collection: collection.into(),
            pipeline,
            options: QueryOptions::default(),
        }
    }

    /// Set the cursor options.
    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }
}

/// The cacheable identity of a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum QueryDescriptor {
    /// A read query (find/findOne/count/distinct).
    Read(ReadQuery),
    /// An aggregation pipeline.
    Aggregate(AggregateQuery),
}

impl QueryDescriptor {
    /// Target collection name.
    pub fn collection(&self) -> &str {
        match self {
            QueryDescriptor::Read(q) => &q.collection,
            QueryDescriptor::Aggregate(q) => &q.collection,
        }
    }

    /// Wire-level operation name.
    pub fn op_name(&self) -> &'static str {
        match self {
            QueryDescriptor::Read(q) => q.op.as_str(),
            QueryDescriptor::Aggregate(_) => "aggregate",
        }
    }
}

impl From<ReadQuery> for QueryDescriptor {
    fn from(query: ReadQuery) -> Self {
        QueryDescriptor::Read(query)
    }
}

impl From<AggregateQuery> for QueryDescriptor {
    fn from(query: AggregateQuery) -> Self {
        QueryDescriptor::Aggregate(query)
    }
}

/// Caching directives for a single query.
///
/// `ttl` of zero defers to the store's default expiry, and `key` overrides
/// fingerprint derivation entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachePolicy {
    /// Store TTL for the entry. `Duration::ZERO` means "use store default".
    pub ttl: Duration,
    /// Explicit cache key, overriding fingerprint derivation.
    pub key: Option<String>,
}

impl CachePolicy {
    /// Cache with the store's default expiry and a derived key.
    pub fn store_default() -> Self {
        Self::default()
    }

    /// Cache with an explicit TTL and a derived key.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl, key: None }
    }

    /// Cache under an explicit key with the store's default expiry.
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            ttl: Duration::ZERO,
            key: Some(key.into()),
        }
    }

    /// Cache under an explicit key with an explicit TTL.
    pub fn with_ttl_and_key(ttl: Duration, key: impl Into<String>) -> Self {
        Self {
            ttl,
            key: Some(key.into()),
        }
    }
}

/// A query descriptor paired with its caching directives.
///
/// `policy == None` means pass-through: execution must be indistinguishable
/// from calling the data source directly. The policy is set once before
/// execution and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheableQuery {
    /// The query's structural identity.
    pub descriptor: QueryDescriptor,
    /// Caching directives; `None` disables caching for this query.
    pub policy: Option<CachePolicy>,
}

impl CacheableQuery {
    /// Create a pass-through (uncached) query.
    pub fn new(descriptor: impl Into<QueryDescriptor>) -> Self {
        Self {
            descriptor: descriptor.into(),
            policy: None,
        }
    }

    /// Mark the query cacheable, chaining style.
    pub fn cached(mut self, policy: CachePolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Whether this query participates in caching.
    pub fn is_cached(&self) -> bool {
        self.policy.is_some()
    }
}

// =============================================================================
// TESTS
// =============================================================================
