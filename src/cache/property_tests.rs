//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the store against a plain model map.

use proptest::prelude::*;
use std::collections::HashMap;
use std::thread::sleep;
use std::time::Duration;

use crate::cache::CacheStore;

// == Test Configuration ==
const LONG_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
/// Generates object-key shaped strings
fn object_key_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,8}(/[a-z0-9_.-]{1,12}){0,3}"
}

/// Sequence of store operations
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    // Small key space so operations collide
    let key = prop::sample::select(vec!["a", "b", "c/d", "e/f.jpg"]).prop_map(String::from);
    prop_oneof![
        (key.clone(), "[a-zA-Z]{1,16}").prop_map(|(key, value)| CacheOp::Set { key, value }),
        key.clone().prop_map(|key| CacheOp::Get { key }),
        key.prop_map(|key| CacheOp::Delete { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any sequence of set/get/delete with a long TTL, the store behaves
    // exactly like a map: last write wins, delete removes, get never mutates.
    #[test]
    fn prop_matches_model_map(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let mut store = CacheStore::new();
        let mut model: HashMap<String, String> = HashMap::new();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(key.clone(), value.clone(), LONG_TTL);
                    model.insert(key, value);
                }
                CacheOp::Get { key } => {
                    let len_before = store.len();
                    prop_assert_eq!(store.get(&key), model.get(&key).cloned());
                    prop_assert_eq!(store.len(), len_before, "get must not mutate");
                }
                CacheOp::Delete { key } => {
                    prop_assert_eq!(store.delete(&key), model.remove(&key).is_some());
                }
            }
        }

        prop_assert_eq!(store.len(), model.len());
    }

    // Keys stay unique: overwriting any key leaves exactly one entry holding the last value.
    #[test]
    fn prop_overwrite_semantics(
        key in object_key_strategy(),
        values in prop::collection::vec("[a-z]{1,8}", 1..10)
    ) {
        let mut store = CacheStore::new();

        for value in &values {
            store.set(key.clone(), value.clone(), LONG_TTL);
        }

        prop_assert_eq!(store.len(), 1);
        prop_assert_eq!(store.get(&key), values.last().cloned());
    }

    // A sweep with nothing expired never removes anything.
    #[test]
    fn prop_cleanup_keeps_live_entries(
        keys in prop::collection::hash_set(object_key_strategy(), 0..40)
    ) {
        let mut store = CacheStore::new();
        for key in &keys {
            store.set(key.clone(), (), LONG_TTL);
        }

        prop_assert_eq!(store.cleanup_expired(), 0);
        prop_assert_eq!(store.len(), keys.len());
    }
}

// Separate proptest block with fewer cases for time-sensitive TTL tests
proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]

    // Once the TTL elapses, get reports not-found regardless of the sweep, and
    // a later sweep removes exactly the expired entries.
    #[test]
    fn prop_ttl_expiry_is_time_based(
        short_keys in prop::collection::hash_set("s[a-z]{1,6}", 1..10),
        long_keys in prop::collection::hash_set("l[a-z]{1,6}", 0..10)
    ) {
        let mut store = CacheStore::new();
        for key in &short_keys {
            store.set(key.clone(), "NoSuchKey", Duration::from_millis(30));
        }
        for key in &long_keys {
            store.set(key.clone(), "NoSuchKey", LONG_TTL);
        }

        sleep(Duration::from_millis(60));

        for key in &short_keys {
            prop_assert!(store.get(key).is_none(), "expired entry still visible");
        }
        for key in &long_keys {
            prop_assert!(store.get(key).is_some(), "live entry disappeared");
        }
        prop_assert_eq!(store.len(), short_keys.len() + long_keys.len());

        let removed = store.cleanup_expired();
        prop_assert_eq!(removed, short_keys.len());
        prop_assert_eq!(store.len(), long_keys.len());
    }
}
