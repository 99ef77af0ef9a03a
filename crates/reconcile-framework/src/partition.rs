//! # Field Partitioner
//!
//! Splits a document's top-level keys into the fields a kind declares and the opaque extension
//! fields it does not, and merges the two halves back together. Pure functions, no I/O.
//!
//! Extension values travel as text: numbers and booleans in their canonical textual form, arrays
//! and objects as JSON text, strings verbatim. A string whose text would itself parse as JSON
//! (`"42"`, `"true"`, `"null"`) travels JSON-quoted so it comes back as a string. [`merge`]
//! decodes any text that parses as JSON to that value; everything else stays a string.

use crate::document::{is_reserved, Document, Extensions};
use serde_json::Value;

/// The two halves of a partitioned document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    /// Declared and reserved (`id`, `resourceType`, `meta`) fields, values untouched.
    pub known: Document,
    pub extensions: Extensions,
}

/// Splits `document` into known fields and extensions.
pub fn partition(document: &Document, known_keys: &[&str]) -> Partition {
    let mut out = Partition::default();
    for (key, value) in document {
        if is_reserved(key) || known_keys.contains(&key.as_str()) {
            out.known.insert(key.clone(), value.clone());
        } else {
            out.extensions.insert(key.clone(), canonical_string(value));
        }
    }
    out
}

/// Union of known fields and decoded extensions. Known fields win on collision.
pub fn merge(known: Document, extensions: &Extensions) -> Document {
    let mut document = known;
    for (key, raw) in extensions {
        if !document.contains_key(key) {
            document.insert(key.clone(), decode_extension(raw));
        }
    }
    document
}

/// Canonical text form of a JSON value. [`decode_extension`] inverts it exactly.
pub fn canonical_string(value: &Value) -> String {
    match value {
        Value::String(s) if serde_json::from_str::<Value>(s).is_ok() => value.to_string(),
        Value::String(s) => s.clone(),
        // Display on Value renders compact JSON for every other variant.
        other => other.to_string(),
    }
}

/// Plain text of a scalar: strings verbatim, everything else as compact JSON.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Inverse of [`canonical_string`] for extension values.
pub fn decode_extension(raw: &str) -> Value {
    serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
