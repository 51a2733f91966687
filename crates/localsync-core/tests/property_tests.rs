//! # Property-Based Tests
//!
//! Merge invariants checked against generated documents with proptest.

use localsync_core::{Document, Fingerprint, MergeEngine, Value};
use proptest::collection::vec;
use proptest::prelude::*;
use serde_json::json;
use std::collections::BTreeSet;

// =============================================================================
// STRATEGIES
// =============================================================================

/// Small scalar values, chosen so collisions are frequent.
fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (0i64..8).prop_map(|n| json!(n)),
        "[a-c]{1,2}".prop_map(Value::String),
    ]
}

/// Cards whose ids collide often; some have no id or a null id.
fn card() -> impl Strategy<Value = Value> {
    prop_oneof![
        ((0i64..6), "[x-z]").prop_map(|(id, v)| json!({"id": id, "v": v})),
        "[x-z]".prop_map(|v| json!({"v": v})),
        Just(json!({"id": null})),
    ]
}

fn favorite_partial() -> impl Strategy<Value = Document> {
    (vec(card(), 0..10), vec(scalar(), 0..10), vec(scalar(), 0..3)).prop_map(
        |(cards, tags, plain)| {
            let value = json!({
                "plain": plain,
                "favorite": {"card": cards, "tags": tags}
            });
            Document::try_from(value).unwrap_or_default()
        },
    )
}

fn favorite_array<'a>(document: &'a Document, key: &str) -> &'a [Value] {
    document
        .get("favorite")
        .and_then(|f| f.get(key))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Applying the same partial twice equals applying it once.
    #[test]
    fn merge_is_idempotent(
        base in favorite_partial(),
        partial in favorite_partial()
    ) {
        let once = MergeEngine::merge(&base, partial.clone());
        let twice = MergeEngine::merge(&once, partial);
        prop_assert_eq!(once, twice);
    }

    /// No two cards share a non-null id after any sequence of merges.
    #[test]
    fn card_ids_unique(partials in vec(favorite_partial(), 1..6)) {
        let mut current = Document::new();
        for partial in partials {
            MergeEngine::merge_into(&mut current, partial);
        }

        let mut seen = BTreeSet::new();
        for card in favorite_array(&current, "card") {
            let id = card.get("id");
            prop_assert!(id.is_some_and(|id| !id.is_null()), "card without id survived");
            if let Some(id) = id {
                prop_assert!(seen.insert(Fingerprint::of(id)), "duplicate card id");
            }
        }
    }

    /// No two elements of a plain favorite array are structurally equal.
    #[test]
    fn tag_elements_unique(partials in vec(favorite_partial(), 1..6)) {
        let mut current = Document::new();
        for partial in partials {
            MergeEngine::merge_into(&mut current, partial);
        }

        let tags = favorite_array(&current, "tags");
        let distinct: BTreeSet<Fingerprint> = tags.iter().map(Fingerprint::of).collect();
        prop_assert_eq!(distinct.len(), tags.len());
    }

    /// Every element ever submitted to a plain favorite array is retained.
    #[test]
    fn tag_union_retains_everything(partials in vec(favorite_partial(), 1..6)) {
        let mut current = Document::new();
        let mut submitted = BTreeSet::new();
        for partial in partials {
            for tag in favorite_array(&partial, "tags") {
                submitted.insert(Fingerprint::of(tag));
            }
            MergeEngine::merge_into(&mut current, partial);
        }

        let stored: BTreeSet<Fingerprint> =
            favorite_array(&current, "tags").iter().map(Fingerprint::of).collect();
        prop_assert_eq!(stored, submitted);
    }

    /// Non-favorite keys always hold the last submitted value.
    #[test]
    fn plain_keys_last_write_wins(partials in vec(favorite_partial(), 1..6)) {
        let mut current = Document::new();
        let mut last = None;
        for partial in partials {
            last = partial.get("plain").cloned();
            MergeEngine::merge_into(&mut current, partial);
        }
        prop_assert_eq!(current.get("plain").cloned(), last);
    }

    /// A merged document always re-serializes and parses back to itself.
    #[test]
    fn merged_document_reserializes(partials in vec(favorite_partial(), 1..4)) {
        let mut current = Document::new();
        for partial in partials {
            MergeEngine::merge_into(&mut current, partial);
        }

        let bytes = localsync_core::document_to_bytes(&current).expect("serialize");
        let restored = localsync_core::document_from_bytes(&bytes).expect("parse");
        prop_assert_eq!(current, restored);
    }
}
