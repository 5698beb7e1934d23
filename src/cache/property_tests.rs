//! Property-Based Tests for Cache Module
//!
//! Uses proptest over the in-memory store; async calls are driven with
//! tokio_test::block_on.

use std::sync::Arc;

use proptest::prelude::*;
use tokio_test::block_on;

use crate::cache::HashCache;
use crate::codec::JsonCodec;
use crate::store::MemoryStore;

// == Helpers ==
fn cache_on(store: &MemoryStore, id: &str) -> HashCache<MemoryStore, JsonCodec> {
    HashCache::new(id, Arc::new(store.clone()), None, Arc::new(JsonCodec::new())).unwrap()
}

// == Strategies ==
/// Generates cache keys
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_:]{1,64}".prop_map(|s| s)
}

/// Generates cache names
fn cache_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9.]{0,31}".prop_map(|s| s)
}

/// Generates query-result-like values
fn row_strategy() -> impl Strategy<Value = Vec<(u64, String)>> {
    prop::collection::vec((any::<u64>(), "[a-zA-Z0-9 ]{0,32}"), 0..8)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: String, value: i64 },
    Remove { key: String },
    Clear,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (key_strategy(), any::<i64>()).prop_map(|(key, value)| CacheOp::Put { key, value }),
        2 => key_strategy().prop_map(|key| CacheOp::Remove { key }),
        1 => Just(CacheOp::Clear),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Storing a value and reading it back returns an equal value.
    #[test]
    fn prop_roundtrip(key in key_strategy(), rows in row_strategy()) {
        let store = MemoryStore::new();
        let cache = cache_on(&store, "rows");

        let read: Option<Vec<(u64, String)>> = block_on(async {
            cache.put(key.as_str(), &rows).await.unwrap();
            cache.get(key.as_str()).await.unwrap()
        });

        prop_assert_eq!(read, Some(rows));
    }

    // Keys with the same string form address the same entry.
    #[test]
    fn prop_key_collision(n in any::<u32>(), value in any::<i64>()) {
        let store = MemoryStore::new();
        let cache = cache_on(&store, "numbers");

        let read: Option<i64> = block_on(async {
            cache.put(&n, &value).await.unwrap();
            cache.get(n.to_string().as_str()).await.unwrap()
        });

        prop_assert_eq!(read, Some(value));
    }

    // Reading a key never written yields absence, not an error.
    #[test]
    fn prop_absent_key(key in key_strategy()) {
        let store = MemoryStore::new();
        let cache = cache_on(&store, "empty");

        let read: Option<String> = block_on(cache.get(key.as_str())).unwrap();
        prop_assert!(read.is_none());
    }

    // Removing an absent key succeeds and leaves the size unchanged.
    #[test]
    fn prop_remove_absent_is_noop(
        keys in prop::collection::hash_set(key_strategy(), 1..10),
        absent in key_strategy()
    ) {
        prop_assume!(!keys.contains(&absent));
        let store = MemoryStore::new();
        let cache = cache_on(&store, "items");

        let (before, removed, after) = block_on(async {
            for key in &keys {
                cache.put(key.as_str(), &1).await.unwrap();
            }
            let before = cache.size().await.unwrap();
            let removed = cache.remove(absent.as_str()).await.unwrap();
            (before, removed, cache.size().await.unwrap())
        });

        prop_assert_eq!(removed, 0);
        prop_assert_eq!(before, keys.len());
        prop_assert_eq!(after, before);
    }

    // Two caches with different names never see each other's entries.
    #[test]
    fn prop_isolation(
        name_a in cache_name_strategy(),
        name_b in cache_name_strategy(),
        key in key_strategy(),
        value in any::<i64>()
    ) {
        prop_assume!(name_a != name_b);
        let store = MemoryStore::new();
        let a = cache_on(&store, &name_a);
        let b = cache_on(&store, &name_b);

        let (in_b, size_b) = block_on(async {
            a.put(key.as_str(), &value).await.unwrap();
            let in_b: Option<i64> = b.get(key.as_str()).await.unwrap();
            (in_b, b.size().await.unwrap())
        });

        prop_assert!(in_b.is_none());
        prop_assert_eq!(size_b, 0);
    }

    // After any operation sequence, size matches a model map and no
    // connection is left checked out.
    #[test]
    fn prop_size_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..40)) {
        let store = MemoryStore::new();
        let cache = cache_on(&store, "model");
        let mut model = std::collections::HashMap::new();

        let size = block_on(async {
            for op in ops {
                match op {
                    CacheOp::Put { key, value } => {
                        cache.put(key.as_str(), &value).await.unwrap();
                        model.insert(key, value);
                    }
                    CacheOp::Remove { key } => {
                        let removed = cache.remove(key.as_str()).await.unwrap();
                        assert_eq!(removed, u64::from(model.remove(&key).is_some()));
                    }
                    CacheOp::Clear => {
                        cache.clear().await.unwrap();
                        model.clear();
                    }
                }
            }
            cache.size().await.unwrap()
        });

        prop_assert_eq!(size, model.len());
        prop_assert_eq!(store.outstanding_connections(), 0);
    }
}
