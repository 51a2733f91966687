//! # Merge Engine
//!
//! Combines an incoming partial document into an existing one.
//!
//! ## Rules
//!
//! - Every top-level key other than `"favorite"` is replaced wholesale by the
//!   incoming value (last write wins, no deep merge).
//! - `"favorite"` is merged key by key:
//!   - `"card"` arrays are keyed by each card's `"id"`; an incoming card
//!     replaces the stored card with the same id, cards without a usable id
//!     are dropped.
//!   - any other array is a set: the result is the union of stored and
//!     incoming elements under structural equality.
//!   - a non-array value replaces whatever was stored under that key.
//! - Keys absent from the incoming document are left untouched.
//!
//! Incoming arrays are deduplicated on their own before they are combined
//! with stored state, so one request can never introduce a duplicate.
//!
//! Malformed shapes degrade instead of failing: a non-object `"favorite"` is
//! read as an empty one and a stored non-array is read as an empty array.

use crate::fingerprint::Fingerprint;
use crate::primitives::{CARD_ID_FIELD, CARD_KEY, FAVORITE_KEY};
use crate::Document;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Stateless merge functions for LocalSync documents.
pub struct MergeEngine;

impl MergeEngine {
    /// Merge `incoming` into a copy of `existing` and return the result.
    #[must_use]
    pub fn merge(existing: &Document, incoming: Document) -> Document {
        let mut result = existing.clone();
        Self::merge_into(&mut result, incoming);
        result
    }

    /// Merge `incoming` into `target` in place.
    ///
    /// This is the form the store uses under its write lock. It cannot fail,
    /// so `target` is never left half-merged.
    pub fn merge_into(target: &mut Document, incoming: Document) {
        for (key, value) in incoming {
            if key == FAVORITE_KEY {
                // Take in place so the key keeps its position.
                let existing = target.get_mut(FAVORITE_KEY).map(Value::take);
                let merged = Self::merge_favorite(existing, value);
                target.insert(key, Value::Object(merged));
            } else {
                target.insert(key, value);
            }
        }
    }

    /// Merge an incoming favorite payload into the stored one.
    ///
    /// A missing or non-object `existing` is treated as empty.
    #[must_use]
    pub fn merge_favorite(existing: Option<Value>, incoming: Value) -> Map<String, Value> {
        let mut result = match existing {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };

        for (key, value) in Self::dedup_favorite(incoming) {
            match value {
                Value::Array(items) => {
                    let stored = match result.get_mut(&key).map(Value::take) {
                        Some(Value::Array(stored)) => stored,
                        _ => Vec::new(),
                    };
                    let merged = if key == CARD_KEY {
                        Self::merge_cards(stored, items)
                    } else {
                        Self::union_values(stored, items)
                    };
                    result.insert(key, Value::Array(merged));
                }
                other => {
                    result.insert(key, other);
                }
            }
        }

        result
    }

    /// Deduplicate every array of a favorite payload on its own.
    ///
    /// Returns an empty map when the payload is not an object.
    #[must_use]
    pub fn dedup_favorite(value: Value) -> Map<String, Value> {
        let Value::Object(favorite) = value else {
            return Map::new();
        };

        favorite
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::Array(items) if key == CARD_KEY => Value::Array(Self::dedup_cards(items)),
                    Value::Array(items) => Value::Array(Self::dedup_values(items)),
                    other => other,
                };
                (key, value)
            })
            .collect()
    }

    /// Collapse cards sharing an id; the last occurrence wins.
    ///
    /// Cards that are not objects, lack an id, or carry a null id are dropped.
    #[must_use]
    pub fn dedup_cards(cards: Vec<Value>) -> Vec<Value> {
        let mut index = CardIndex::default();
        index.extend(cards);
        index.into_cards()
    }

    /// Remove structurally equal elements, keeping the first occurrence.
    #[must_use]
    pub fn dedup_values(values: Vec<Value>) -> Vec<Value> {
        Self::union_values(Vec::new(), values)
    }

    /// Combine stored cards with incoming ones.
    ///
    /// An incoming card overwrites the stored card with the same id in place;
    /// cards with new ids are appended.
    #[must_use]
    pub fn merge_cards(existing: Vec<Value>, incoming: Vec<Value>) -> Vec<Value> {
        let mut index = CardIndex::default();
        index.extend(existing);
        index.extend(incoming);
        index.into_cards()
    }

    /// Set union under structural equality.
    ///
    /// Stored elements come first, in their stored order, followed by the
    /// incoming elements not already present.
    #[must_use]
    pub fn union_values(existing: Vec<Value>, incoming: Vec<Value>) -> Vec<Value> {
        let mut seen = BTreeSet::new();
        let mut result = Vec::with_capacity(existing.len() + incoming.len());
        for value in existing.into_iter().chain(incoming) {
            if seen.insert(Fingerprint::of(&value)) {
                result.push(value);
            }
        }
        result
    }
}

// =============================================================================
// CARD INDEX
// =============================================================================

/// Cards keyed by id, remembering the order in which each id was first seen.
#[derive(Default)]
struct CardIndex {
    cards: Vec<Value>,
    positions: BTreeMap<Fingerprint, usize>,
}

impl CardIndex {
    fn extend(&mut self, cards: Vec<Value>) {
        for card in cards {
            self.insert(card);
        }
    }

    fn insert(&mut self, card: Value) {
        let Some(id) = card_id(&card) else {
            return;
        };
        let key = Fingerprint::of(id);
        match self.positions.get(&key) {
            Some(&slot) => self.cards[slot] = card,
            None => {
                self.positions.insert(key, self.cards.len());
                self.cards.push(card);
            }
        }
    }

    fn into_cards(self) -> Vec<Value> {
        self.cards
    }
}

/// The usable id of a card, if any.
fn card_id(card: &Value) -> Option<&Value> {
    match card.as_object()?.get(CARD_ID_FIELD)? {
        Value::Null => None,
        id => Some(id),
    }
}

// =============================================================================
// TESTS
// =============================================================================
