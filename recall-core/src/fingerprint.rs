//! Deterministic cache key derivation for query descriptors.
//!
//! The fingerprint is a pure function of a descriptor's structural content:
//! the descriptor is projected onto a fixed-field canonical document specific
//! to its kind, the document is canonicalized and serialized, and the result
//! is hashed. The readable `collection:op:` prefix aids debugging and log
//! inspection; the hash bounds key length.

use serde_json::json;
use sha2::{Digest, Sha256};

use crate::canonical::canonical_string;
use crate::descriptor::{CacheableQuery, QueryDescriptor};

/// Derive the cache key for a query descriptor.
///
/// Same structural input always yields the same string; different structural
/// input yields a different string with overwhelming probability. Object key
/// order inside filters, projections, and sort documents is not significant;
/// aggregation pipeline stage order is.
pub fn fingerprint(descriptor: &QueryDescriptor) -> String {
    let document = match descriptor {
        QueryDescriptor::Read(q) => json!({
            "collection": q.collection,
            "op": q.op.as_str(),
            "filter": q.filter,
            "projection": q.projection,
            "distinct": q.distinct_field,
            "skip": q.options.skip,
            "limit": q.options.limit,
            "sort": q.options.sort,
        }),
        QueryDescriptor::Aggregate(q) => json!({
            "collection": q.collection,
            "op": "aggregate",
            "pipeline": q.pipeline,
            "skip": q.options.skip,
            "limit": q.options.limit,
            "sort": q.options.sort,
        }),
    };

    let canonical = canonical_string(&document);
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!(
        "{}:{}:{}",
        descriptor.collection(),
        descriptor.op_name(),
        hex::encode(hasher.finalize())
    )
}

impl CacheableQuery {
    /// Resolve the cache key for this query.
    ///
    /// An explicit, non-empty policy key overrides derivation; otherwise the
    /// key is the descriptor fingerprint.
    pub fn cache_key(&self) -> String {
        match self.policy.as_ref().and_then(|p| p.key.as_deref()) {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => fingerprint(&self.descriptor),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================


#[cfg(test)]
mod prop_tests {
    use super::*;
    use crate::descriptor::ReadQuery;
    use proptest::prelude::*;
    use serde_json::{Map, Value};

    fn collection_strategy() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_]{0,11}"
    }

    fn filter_entries_strategy() -> impl Strategy<Value = Vec<(String, i64)>> {
        proptest::collection::btree_map("[a-z]{1,6}", any::<i64>(), 0..5)
            .prop_map(|map| map.into_iter().collect())
    }

    fn filter_from_entries(entries: &[(String, i64)]) -> Value {
        let mut map = Map::new();
        for (key, value) in entries {
            map.insert(key.clone(), Value::from(*value));
        }
        Value::Object(map)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        /// Same structural content fingerprints identically regardless of
        /// the order entries were inserted in.
        #[test]
        fn prop_insertion_order_irrelevant(
            collection in collection_strategy(),
            entries in filter_entries_strategy(),
        ) {
            let forward = filter_from_entries(&entries);
            let mut reversed_entries = entries.clone();
            reversed_entries.reverse();
            let reversed = filter_from_entries(&reversed_entries);

            let left: QueryDescriptor =
                ReadQuery::find(collection.clone()).with_filter(forward).into();
            let right: QueryDescriptor =
                ReadQuery::find(collection).with_filter(reversed).into();
            prop_assert_eq!(fingerprint(&left), fingerprint(&right));
        }

        /// Fingerprinting is deterministic across repeated invocations.
        #[test]
        fn prop_fingerprint_deterministic(
            collection in collection_strategy(),
            entries in filter_entries_strategy(),
        ) {
            let descriptor: QueryDescriptor = ReadQuery::find(collection)
                .with_filter(filter_from_entries(&entries))
                .into();
            prop_assert_eq!(fingerprint(&descriptor), fingerprint(&descriptor));
        }

        /// Distinct collections never share a fingerprint.
        #[test]
        fn prop_collections_distinct(
            left in collection_strategy(),
            right in collection_strategy(),
            entries in filter_entries_strategy(),
        ) {
            prop_assume!(left != right);
            let filter = filter_from_entries(&entries);
            let a: QueryDescriptor = ReadQuery::find(left).with_filter(filter.clone()).into();
            let b: QueryDescriptor = ReadQuery::find(right).with_filter(filter).into();
            prop_assert_ne!(fingerprint(&a), fingerprint(&b));
        }

        /// Changing any filter value changes the fingerprint.
        #[test]
        fn prop_filter_value_significant(
            collection in collection_strategy(),
            key in "[a-z]{1,6}",
            left in any::<i64>(),
            right in any::<i64>(),
        ) {
            prop_assume!(left != right);
            let a: QueryDescriptor = ReadQuery::find(collection.clone())
                .with_filter(filter_from_entries(&[(key.clone(), left)]))
                .into();
            let b: QueryDescriptor = ReadQuery::find(collection)
                .with_filter(filter_from_entries(&[(key, right)]))
                .into();
            prop_assert_ne!(fingerprint(&a), fingerprint(&b));
        }
    }
}
