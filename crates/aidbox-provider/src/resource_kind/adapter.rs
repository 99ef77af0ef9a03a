//! [`KindAdapter`] implementation for generic resources.
//!
//! The whole payload is the known half: on read-back every non-server field lands in the
//! payload and the extensions come back empty. Drift compares the merged documents.

use crate::model::ResourcePayload;
use reconcile_framework::document::{strip_server_fields, PASSWORD_KEY, RESERVED_KEYS};
use reconcile_framework::kind::assemble_document;
use reconcile_framework::partition::merge;
use reconcile_framework::{DeclaredState, Document, KindAdapter, ReconcileError, ResourceIdentity};

/// Projects [`ResourcePayload`] to and from documents of any type.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceAdapter;

fn comparable(state: &DeclaredState<ResourcePayload>) -> Document {
    let mut document = merge(state.known.resource.clone(), &state.extensions);
    document.remove(PASSWORD_KEY);
    document
}

impl KindAdapter for ResourceAdapter {
    type Known = ResourcePayload;

    fn resource_type(&self) -> Option<&str> {
        None
    }

    fn known_keys(&self) -> &[&'static str] {
        &[]
    }

    fn build_document(
        &self,
        identity: &ResourceIdentity,
        state: &DeclaredState<ResourcePayload>,
    ) -> Result<Document, ReconcileError> {
        let payload = &state.known.resource;
        if let Some(key) = RESERVED_KEYS.iter().find(|key| payload.contains_key(**key)) {
            return Err(ReconcileError::validation(format!(
                "do not set '{key}' inside the resource payload; use resource_type and resource_id instead"
            )));
        }
        if let Some(key) = state.extensions.keys().find(|key| payload.contains_key(*key)) {
            return Err(ReconcileError::validation(format!(
                "'{key}' is set both in the resource payload and as an extension"
            )));
        }
        Ok(assemble_document(identity, payload.clone(), &state.extensions))
    }

    fn extract_state(
        &self,
        mut document: Document,
    ) -> Result<DeclaredState<ResourcePayload>, ReconcileError> {
        let meta = strip_server_fields(&mut document);
        Ok(DeclaredState {
            known: ResourcePayload::new(document),
            extensions: Default::default(),
            meta,
        })
    }

    /// Passwords never count as drift.
    fn in_sync(
        &self,
        desired: &DeclaredState<ResourcePayload>,
        observed: &DeclaredState<ResourcePayload>,
    ) -> bool {
        comparable(desired) == comparable(observed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn payload(value: Value) -> DeclaredState<ResourcePayload> {
        DeclaredState::new(ResourcePayload::new(doc(value)))
    }

    #[test]
    fn test_payload_is_sent_verbatim_with_identity() {
        let identity = ResourceIdentity::new("Organization", "test-org");
        let document = ResourceAdapter
            .build_document(&identity, &payload(json!({"name": "Test", "active": true})))
            .unwrap();
        assert_eq!(
            Value::Object(document),
            json!({
                "resourceType": "Organization",
                "id": "test-org",
                "name": "Test",
                "active": true
            })
        );
    }

    #[test]
    fn test_forbidden_fields_in_payload() {
        let identity = ResourceIdentity::new("Organization", "o1");
        for forbidden in [
            json!({"id": "x"}),
            json!({"resourceType": "Patient"}),
            json!({"meta": {"versionId": "1"}}),
        ] {
            assert!(matches!(
                ResourceAdapter.build_document(&identity, &payload(forbidden)),
                Err(ReconcileError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_extension_may_not_duplicate_payload_key() {
        let state = payload(json!({"name": "Test"})).with_extension("name", "Other");
        assert!(matches!(
            ResourceAdapter.build_document(&ResourceIdentity::new("Organization", "o1"), &state),
            Err(ReconcileError::Validation(_))
        ));
    }

    #[test]
    fn test_extract_and_drift() {
        let observed = ResourceAdapter
            .extract_state(doc(json!({
                "resourceType": "Organization",
                "id": "o1",
                "meta": {"versionId": "3"},
                "name": "Test",
                "size": 12,
                "password": "$s0$abc"
            })))
            .unwrap();
        assert_eq!(observed.known.resource, doc(json!({"name": "Test", "size": 12})));
        assert!(observed.extensions.is_empty());

        let desired = payload(json!({"name": "Test", "password": "plain"})).with_extension("size", "12");
        assert!(ResourceAdapter.in_sync(&desired, &observed));

        let changed = payload(json!({"name": "Renamed"})).with_extension("size", "12");
        assert!(!ResourceAdapter.in_sync(&changed, &observed));
    }
}
