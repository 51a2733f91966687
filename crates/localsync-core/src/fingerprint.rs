//! # Value Fingerprints
//!
//! Canonical string form of a JSON value, used as the identity key when
//! deduplicating favorite arrays and card ids.
//!
//! Two values share a fingerprint exactly when they are structurally equal:
//! - object keys are sorted, so key order never matters
//! - numbers keep their textual form, so `1` and `1.0` stay distinct
//! - strings are escaped, so no string can collide with another variant

use serde_json::Value;
use std::fmt::Write;

/// Canonical identity of a JSON value.
///
/// Ordered so it can key a `BTreeMap`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute the fingerprint of a value.
    #[must_use]
    pub fn of(value: &Value) -> Self {
        let mut out = String::new();
        write_canonical(value, &mut out);
        Self(out)
    }

    /// The canonical text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => {
            let _ = write!(out, "{n}");
        }
        Value::String(s) => {
            let _ = write!(out, "{s:?}");
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                let _ = write!(out, "{key:?}:");
                write_canonical(item, out);
            }
            out.push('}');
        }
    }
}
