//! # Store Property Tests
//!
//! The observable guarantees of the store, exercised through its public API.
//!
//! ## Groups
//! - Merge: idempotence, card dedup, set union, overwrite semantics
//! - Persistence: snapshot round-trip
//! - Concurrency: no torn reads, no lost merges, concurrent saves

use localsync_core::{Document, DocumentStore, Value};
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

fn doc(value: Value) -> Document {
    Document::try_from(value).expect("test document must be an object")
}

fn favorite_array(store: &DocumentStore, key: &str) -> Vec<Value> {
    store
        .get()
        .get("favorite")
        .and_then(|f| f.get(key))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

// =============================================================================
// MERGE
// =============================================================================

mod merge {
    use super::*;

    #[test]
    fn merging_same_partial_twice_equals_once() {
        let partial = doc(json!({
            "k": {"v": 1},
            "favorite": {"card": [{"id": 1}], "tags": [1, 2]}
        }));

        let once = DocumentStore::new();
        once.merge(partial.clone());

        let twice = DocumentStore::new();
        twice.merge(partial.clone());
        twice.merge(partial);

        assert_eq!(once.get(), twice.get());
    }

    #[test]
    fn card_dedup_keeps_latest_per_id() {
        let store = DocumentStore::new();
        store.merge(doc(json!({"favorite": {"card": [{"id": 1, "x": "a"}]}})));
        store.merge(doc(json!({"favorite": {"card": [{"id": 1, "x": "b"}, {"id": 2}]}})));

        let cards = favorite_array(&store, "card");
        assert_eq!(cards.len(), 2);
        assert!(cards.contains(&json!({"id": 1, "x": "b"})));
        assert!(cards.contains(&json!({"id": 2})));
    }

    #[test]
    fn cards_lacking_id_yield_empty_array() {
        let store = DocumentStore::new();
        store.merge(doc(json!({"favorite": {"card": [{"x": 1}]}})));

        assert_eq!(store.get(), doc(json!({"favorite": {"card": []}})));
    }

    #[test]
    fn id_arrays_union_as_sets() {
        let store = DocumentStore::new();
        store.merge(doc(json!({"favorite": {"tags": [1, 2]}})));
        store.merge(doc(json!({"favorite": {"tags": [2, 3]}})));

        let tags: BTreeSet<i64> = favorite_array(&store, "tags")
            .iter()
            .filter_map(Value::as_i64)
            .collect();
        assert_eq!(tags, BTreeSet::from([1, 2, 3]));
        assert_eq!(favorite_array(&store, "tags").len(), 3);
    }

    #[test]
    fn non_favorite_keys_overwrite_without_deep_merge() {
        let store = DocumentStore::new();
        store.merge(doc(json!({"a": {"x": 1}})));
        store.merge(doc(json!({"a": {"y": 2}})));

        assert_eq!(store.get(), doc(json!({"a": {"y": 2}})));
    }
}

// =============================================================================
// PERSISTENCE
// =============================================================================

mod persistence {
    use super::*;

    #[test]
    fn save_then_load_reproduces_document() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("data.json");

        let store = DocumentStore::new();
        store.merge(doc(json!({
            "file_view": ["file_view_1"],
            "file_view_1": {"time": 10, "percent": 3},
            "favorite": {"card": [{"id": "tt1", "t": "x"}], "history": [1, 2]}
        })));
        store.save_to_file(&path).expect("save");

        let reloaded = DocumentStore::new();
        reloaded.load_from_file(&path).expect("load");

        assert_eq!(store.get(), reloaded.get());
    }

    #[test]
    fn snapshot_of_empty_store_loads_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("data.json");

        DocumentStore::new().save_to_file(&path).expect("save");

        let reloaded = DocumentStore::with_document(doc(json!({"x": 1})));
        reloaded.load_from_file(&path).expect("load");
        assert!(reloaded.is_empty());
    }
}

// =============================================================================
// CONCURRENCY
// =============================================================================

mod concurrency {
    use super::*;

    /// Every merge writes `a` and `b` together; a reader must never see them differ.
    #[test]
    fn readers_never_observe_partial_merge() {
        let store = Arc::new(DocumentStore::new());
        store.merge(doc(json!({"a": 0, "b": 0})));

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 1..=2_000 {
                    store.merge(doc(json!({"a": i, "b": i, "favorite": {"tags": [i % 10]}})));
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..2_000 {
                        let snapshot = store.get();
                        assert_eq!(snapshot.get("a"), snapshot.get("b"));
                    }
                })
            })
            .collect();

        writer.join().expect("writer");
        for reader in readers {
            reader.join().expect("reader");
        }

        assert_eq!(store.get().get("a"), Some(&json!(2_000)));
    }

    #[test]
    fn concurrent_merges_are_not_lost() {
        let store = Arc::new(DocumentStore::new());

        let writers: Vec<_> = (0..8)
            .map(|worker| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..100 {
                        let id = worker * 1_000 + i;
                        store.merge(doc(json!({"favorite": {"card": [{"id": id}], "tags": [id]}})));
                    }
                })
            })
            .collect();

        for writer in writers {
            writer.join().expect("writer");
        }

        assert_eq!(favorite_array(&store, "card").len(), 800);
        assert_eq!(favorite_array(&store, "tags").len(), 800);
    }

    #[test]
    fn snapshot_during_merges_is_always_loadable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("data.json");
        let store = Arc::new(DocumentStore::new());

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..500 {
                    store.merge(doc(json!({"n": i, "m": i})));
                }
            })
        };

        for _ in 0..20 {
            store.save_to_file(&path).expect("save");
            let reloaded = DocumentStore::new();
            reloaded.load_from_file(&path).expect("load");
            let snapshot = reloaded.get();
            assert_eq!(snapshot.get("n"), snapshot.get("m"));
        }

        writer.join().expect("writer");
    }

    #[test]
    fn concurrent_saves_all_succeed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("data.json");
        let cards: Vec<Value> = (0..20_000).map(|i| json!({"id": i, "title": "card"})).collect();
        let store = Arc::new(DocumentStore::with_document(doc(json!({
            "favorite": {"card": cards}
        }))));

        for _ in 0..10 {
            let savers: Vec<_> = (0..4)
                .map(|_| {
                    let store = Arc::clone(&store);
                    let path = path.clone();
                    thread::spawn(move || store.save_to_file(&path))
                })
                .collect();

            for saver in savers {
                let result = saver.join().expect("saver");
                assert!(result.is_ok(), "concurrent save failed: {:?}", result);
            }
        }

        let reloaded = DocumentStore::new();
        reloaded.load_from_file(&path).expect("load");
        assert_eq!(reloaded.get(), store.get());
        let files = std::fs::read_dir(dir.path()).expect("read dir").count();
        assert_eq!(files, 1, "no temporary files left behind");
    }
}
