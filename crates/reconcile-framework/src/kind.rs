//! # KindAdapter Trait
//!
//! The `KindAdapter` trait defines the contract every resource kind (User, Role, AccessPolicy,
//! generic passthrough, …) implements to be managed by the generic [`ReconcileEngine`]. It names
//! the kind's typed known-field shape and knows how to project declared state into a wire
//! document and back.
//!
//! # Architecture Note
//! Writing the create/read/update/delete flow once in the engine and keeping every
//! kind-specific rule behind this trait means a new kind only has to describe its fields. The
//! associated `Known` type ties each engine to exactly one field shape, so a role payload can
//! never be handed to the user engine.
//!
//! Adapters are stateless values. They perform no I/O; the engine owns the transport.
//!
//! [`ReconcileEngine`]: crate::ReconcileEngine

use crate::document::{
    is_reserved, strip_server_fields, DeclaredState, Document, Extensions, ResourceIdentity,
    ID_KEY, RESOURCE_TYPE_KEY,
};
use crate::error::ReconcileError;
use crate::partition::{self, Partition};
use serde_json::Value;
use std::fmt::Debug;

/// Projection between a kind's declared state and its wire document.
pub trait KindAdapter: Send + Sync + 'static {
    /// The kind's typed known fields.
    type Known: Clone + Debug + PartialEq + Send + Sync;

    /// The fixed `resourceType` this adapter manages, or `None` for the generic passthrough,
    /// whose kind comes from the caller's identity.
    fn resource_type(&self) -> Option<&str>;

    /// Top-level document keys owned by `Known`.
    fn known_keys(&self) -> &[&'static str];

    /// Builds the full outgoing document for create/update.
    fn build_document(
        &self,
        identity: &ResourceIdentity,
        state: &DeclaredState<Self::Known>,
    ) -> Result<Document, ReconcileError>;

    /// Projects a read-back document into declared state.
    fn extract_state(
        &self,
        document: Document,
    ) -> Result<DeclaredState<Self::Known>, ReconcileError>;

    /// Drift check between what the caller wants and what the store holds.
    fn in_sync(
        &self,
        desired: &DeclaredState<Self::Known>,
        observed: &DeclaredState<Self::Known>,
    ) -> bool {
        desired.known == observed.known && desired.extensions == observed.extensions
    }
}

/// Rejects extensions that shadow a reserved key or one of the kind's known keys.
pub fn check_extensions(known_keys: &[&str], extensions: &Extensions) -> Result<(), ReconcileError> {
    for key in extensions.keys() {
        if is_reserved(key) {
            return Err(ReconcileError::validation(format!(
                "'{key}' is managed by the engine and cannot be set as an extension"
            )));
        }
        if known_keys.contains(&key.as_str()) {
            return Err(ReconcileError::validation(format!(
                "'{key}' is a declared field of this resource kind, set it directly instead of as an extension"
            )));
        }
    }
    Ok(())
}

/// Merges known fields with extensions and stamps the identity on top.
pub fn assemble_document(
    identity: &ResourceIdentity,
    known: Document,
    extensions: &Extensions,
) -> Document {
    let mut document = partition::merge(known, extensions);
    document.insert(
        RESOURCE_TYPE_KEY.to_string(),
        Value::String(identity.kind.clone()),
    );
    document.insert(ID_KEY.to_string(), Value::String(identity.id.clone()));
    document
}

/// Read-back preparation shared by adapters: strips server fields, then partitions.
///
/// Returns the partition together with the parsed `meta`.
pub fn split_read_back(
    mut document: Document,
    known_keys: &[&str],
) -> (Partition, Option<crate::document::Meta>) {
    let meta = strip_server_fields(&mut document);
    (partition::partition(&document, known_keys), meta)
}

/// Serializes a typed known-field value into a document fragment.
pub fn to_fragment<T: serde::Serialize>(value: &T) -> Result<Document, ReconcileError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(ReconcileError::Encoding(format!(
            "expected a JSON object for known fields, got {other}"
        ))),
    }
}

/// Deserializes a typed known-field value from a document fragment.
pub fn from_fragment<T: serde::de::DeserializeOwned>(
    fragment: Document,
) -> Result<T, ReconcileError> {
    Ok(serde_json::from_value(Value::Object(fragment))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_check_extensions_rejects_reserved_and_known() {
        let mut ext = Extensions::new();
        ext.insert("email".to_string(), "a@b".to_string());
        assert!(check_extensions(&["name"], &ext).is_ok());

        ext.insert("meta".to_string(), "{}".to_string());
        assert!(matches!(
            check_extensions(&["name"], &ext),
            Err(ReconcileError::Validation(_))
        ));

        let mut ext = Extensions::new();
        ext.insert("name".to_string(), "x".to_string());
        assert!(matches!(
            check_extensions(&["name"], &ext),
            Err(ReconcileError::Validation(_))
        ));
    }

    #[test]
    fn test_assemble_document_stamps_identity_last() {
        let identity = ResourceIdentity::new("Patient", "p1");
        let mut known = Document::new();
        known.insert("id".to_string(), json!("spoofed"));
        let document = assemble_document(&identity, known, &Extensions::new());
        assert_eq!(document["id"], json!("p1"));
        assert_eq!(document["resourceType"], json!("Patient"));
    }

    #[test]
    fn test_split_read_back() {
        let document = match json!({
            "resourceType": "Role",
            "id": "r1",
            "meta": {"versionId": "4"},
            "name": "admins",
            "description": "ops"
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let (parts, meta) = split_read_back(document, &["name"]);
        assert_eq!(meta.unwrap().version_id.as_deref(), Some("4"));
        assert_eq!(parts.known.len(), 1);
        assert_eq!(parts.known["name"], json!("admins"));
        assert_eq!(parts.extensions["description"], "ops");
    }

    #[test]
    fn test_to_fragment_requires_object() {
        assert!(to_fragment(&json!({"a": 1})).is_ok());
        assert!(matches!(
            to_fragment(&json!([1, 2])),
            Err(ReconcileError::Encoding(_))
        ));
    }
}
