//! # Document
//!
//! The single JSON object persisted and served by LocalSync.
//!
//! A `Document` is a mapping from string keys to arbitrary JSON values. Key
//! order carries no meaning. The reserved `"favorite"` key holds a nested
//! object of arrays that is merged with deduplication (see [`crate::merge`]).

use crate::LocalSyncError;
use crate::primitives::FAVORITE_KEY;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A top-level JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of top-level keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the document has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up a top-level value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Mutable access to a top-level value.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    /// Insert a top-level value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Summarize the document shape without copying values.
    #[must_use]
    pub fn summary(&self) -> DocumentSummary {
        let favorites = match self.0.get(FAVORITE_KEY) {
            Some(Value::Object(favorite)) => favorite
                .iter()
                .filter_map(|(key, value)| value.as_array().map(|arr| (key.clone(), arr.len())))
                .collect(),
            _ => BTreeMap::new(),
        };

        DocumentSummary {
            key_count: self.0.len(),
            favorites,
        }
    }
}

impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Document {
    type Error = LocalSyncError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(LocalSyncError::InvalidDocument(format!(
                "expected a JSON object, found {}",
                json_type_name(&other)
            ))),
        }
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Human-readable name of a JSON value's type.
#[must_use]
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// SUMMARY
// =============================================================================

/// Shape of a document: how many keys, and how large each favorite array is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub key_count: usize,
    /// Favorite array name -> element count. Non-array favorite values are omitted.
    pub favorites: BTreeMap<String, usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn try_from_rejects_non_objects() {
        for value in [json!([1]), json!(null), json!("x"), json!(3), json!(true)] {
            let result = Document::try_from(value);
            assert!(matches!(result, Err(LocalSyncError::InvalidDocument(_))));
        }
    }

    #[test]
    fn try_from_accepts_object() {
        let doc = Document::try_from(json!({"a": 1})).expect("object");
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.get("a"), Some(&json!(1)));
    }

    #[test]
    fn serializes_as_plain_object() {
        let mut doc = Document::new();
        doc.insert("k", json!([1, 2]));
        let text = serde_json::to_string(&doc).expect("serialize");
        assert_eq!(text, r#"{"k":[1,2]}"#);
    }

    #[test]
    fn summary_counts_favorite_arrays() {
        let doc = Document::try_from(json!({
            "a": 1,
            "favorite": {"card": [{"id": 1}, {"id": 2}], "tags": [1], "mode": "x"}
        }))
        .expect("object");

        let summary = doc.summary();
        assert_eq!(summary.key_count, 2);
        assert_eq!(summary.favorites.get("card"), Some(&2));
        assert_eq!(summary.favorites.get("tags"), Some(&1));
        assert!(!summary.favorites.contains_key("mode"));
    }

    #[test]
    fn summary_of_empty_document() {
        assert_eq!(Document::new().summary(), DocumentSummary::default());
    }
}
