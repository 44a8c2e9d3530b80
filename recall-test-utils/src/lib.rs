//! RECALL Test Utilities
//!
//! Centralized test infrastructure for the RECALL workspace:
//! - A mock data source with execution counting and a switchable
//!   connectivity flag
//! - Record fixtures for common scenarios
//! - Convenience re-exports of the core and cache surfaces

// Re-export the cache surface for convenience
pub use recall_cache::{
    store_for, AlwaysConnected, CacheConfig, CacheOutcome, CacheStats, CacheStore, Fetched,
    JitterPolicy, MemoryStore, QueryCache, QueryExecutor, ReachabilityProbe, ResultEnvelope,
    DEFAULT_STALENESS_WINDOW,
};

// Re-export core types for convenience
pub use recall_core::{
    canonical_string, canonicalize, fingerprint, AggregateQuery, CacheEngine, CachePolicy,
    CacheSettings, CacheableQuery, ConfigError, QueryDescriptor, QueryOptions, ReadOp, ReadQuery,
    RecallError, RecallResult, SourceError, StoreError, Timestamp,
};

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

// ============================================================================
// MOCK DATA SOURCE
// ============================================================================

/// In-memory record collection acting as the authoritative data source.
///
/// Implements [`QueryExecutor`] with just enough query semantics for cache
/// tests (top-level equality filters, skip/limit, distinct) and
/// [`ReachabilityProbe`] through a switchable connectivity flag. Every
/// successful dispatch to the "database" increments an execution counter so
/// tests can assert exactly how often the cache fell through.
pub struct MockDataSource {
    records: RwLock<Vec<Value>>,
    executions: AtomicUsize,
    connected: AtomicBool,
    fail_next: AtomicBool,
}

impl MockDataSource {
    /// Create an empty, connected data source.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            executions: AtomicUsize::new(0),
            connected: AtomicBool::new(true),
            fail_next: AtomicBool::new(false),
        }
    }

    /// Create a data source holding the given records.
    pub fn with_records(records: Vec<Value>) -> Self {
        let source = Self::new();
        *source.records.write().unwrap() = records;
        source
    }

    /// Append a record.
    pub fn insert(&self, record: Value) {
        self.records.write().unwrap().push(record);
    }

    /// Number of records currently held.
    pub fn record_count(&self) -> usize {
        self.records.read().unwrap().len()
    }

    /// Remove every record.
    pub fn remove_all(&self) {
        self.records.write().unwrap().clear();
    }

    /// How many queries actually ran against the record set.
    pub fn executions(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }

    /// Flip the connectivity flag reported to the cache.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Make the next execution fail with a query error.
    pub fn fail_next_execution(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    fn run_read(&self, query: &ReadQuery) -> Value {
        let records = self.records.read().unwrap();
        let mut matched: Vec<Value> = records
            .iter()
            .filter(|record| matches_filter(record, &query.filter))
            .cloned()
            .collect();

        if let Some(skip) = query.options.skip {
            matched = matched.into_iter().skip(skip as usize).collect();
        }
        if let Some(limit) = query.options.limit {
            matched.truncate(limit as usize);
        }

        match query.op {
            ReadOp::Find => Value::Array(matched),
            ReadOp::FindOne => matched.into_iter().next().unwrap_or(Value::Null),
            ReadOp::Count => Value::from(matched.len() as u64),
            ReadOp::Distinct => {
                let field = query.distinct_field.as_deref().unwrap_or_default();
                let mut seen: Vec<Value> = Vec::new();
                for record in matched {
                    if let Some(value) = record.get(field) {
                        if !seen.contains(value) {
                            seen.push(value.clone());
                        }
                    }
                }
                Value::Array(seen)
            }
        }
    }
}

impl Default for MockDataSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueryExecutor for MockDataSource {
    async fn execute_once(&self, descriptor: &QueryDescriptor) -> RecallResult<Value> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(SourceError::Unreachable {
                reason: "connection is not established".to_string(),
            }
            .into());
        }
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(SourceError::QueryFailed {
                collection: descriptor.collection().to_string(),
                reason: "injected failure".to_string(),
            }
            .into());
        }

        self.executions.fetch_add(1, Ordering::SeqCst);
        let result = match descriptor {
            QueryDescriptor::Read(query) => self.run_read(query),
            // Pipelines are not interpreted; an aggregation returns the full
            // record set.
            QueryDescriptor::Aggregate(_) => Value::Array(self.records.read().unwrap().clone()),
        };
        Ok(result)
    }
}

impl ReachabilityProbe for MockDataSource {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

/// Top-level equality match of a filter document against a record.
/// An empty filter matches every record.
fn matches_filter(record: &Value, filter: &Value) -> bool {
    match filter {
        Value::Object(map) => map.iter().all(|(key, value)| record.get(key) == Some(value)),
        _ => false,
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

/// A numbered test record.
pub fn numbered_record(num: i64) -> Value {
    json!({"num": num, "str": format!("record-{num}")})
}

/// Append `count` numbered records, continuing from the current count.
pub fn seed_records(source: &MockDataSource, count: usize) {
    let start = source.record_count() as i64;
    for offset in 0..count as i64 {
        source.insert(numbered_record(start + offset));
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_matches_all_on_empty_filter() {
        let source = MockDataSource::new();
        seed_records(&source, 3);

        let descriptor: QueryDescriptor = ReadQuery::find("records").into();
        let result = source.execute_once(&descriptor).await.unwrap();
        assert_eq!(result.as_array().map(Vec::len), Some(3));
        assert_eq!(source.executions(), 1);
    }

    #[tokio::test]
    async fn test_find_with_equality_filter() {
        let source = MockDataSource::new();
        seed_records(&source, 5);

        let descriptor: QueryDescriptor = ReadQuery::find("records")
            .with_filter(json!({"num": 2}))
            .into();
        let result = source.execute_once(&descriptor).await.unwrap();
        assert_eq!(result, json!([{"num": 2, "str": "record-2"}]));
    }

    #[tokio::test]
    async fn test_find_with_skip_and_limit() {
        let source = MockDataSource::new();
        seed_records(&source, 10);

        let descriptor: QueryDescriptor =
            ReadQuery::find("records").with_skip(1).with_limit(3).into();
        let result = source.execute_once(&descriptor).await.unwrap();
        let rows = result.as_array().expect("array");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["num"], json!(1));
    }

    #[tokio::test]
    async fn test_find_one_and_count_and_distinct() {
        let source = MockDataSource::new();
        seed_records(&source, 4);
        source.insert(json!({"num": 0, "str": "record-0"}));

        let one: QueryDescriptor = ReadQuery::find_one("records").into();
        assert_eq!(
            source.execute_once(&one).await.unwrap(),
            json!({"num": 0, "str": "record-0"})
        );

        let count: QueryDescriptor = ReadQuery::count("records").into();
        assert_eq!(source.execute_once(&count).await.unwrap(), json!(5));

        let distinct: QueryDescriptor = ReadQuery::distinct("records", "str").into();
        let values = source.execute_once(&distinct).await.unwrap();
        assert_eq!(values.as_array().map(Vec::len), Some(4));
    }

    #[tokio::test]
    async fn test_disconnected_source_errors() {
        let source = MockDataSource::new();
        source.set_connected(false);
        assert!(!source.is_connected());

        let descriptor: QueryDescriptor = ReadQuery::find("records").into();
        let err = source.execute_once(&descriptor).await.unwrap_err();
        assert!(matches!(
            err,
            RecallError::Source(SourceError::Unreachable { .. })
        ));
        assert_eq!(source.executions(), 0);
    }

    #[tokio::test]
    async fn test_fail_next_execution_fails_once() {
        let source = MockDataSource::new();
        seed_records(&source, 1);
        source.fail_next_execution();

        let descriptor: QueryDescriptor = ReadQuery::find("records").into();
        assert!(source.execute_once(&descriptor).await.is_err());
        assert!(source.execute_once(&descriptor).await.is_ok());
        assert_eq!(source.executions(), 1);
    }
}
