//! [`KindAdapter`] implementation for the Role kind.

use crate::model::role::default_reference_type;
use crate::model::{RoleSpec, UserReference};
use reconcile_framework::kind::{assemble_document, from_fragment, split_read_back, to_fragment};
use reconcile_framework::{DeclaredState, Document, KindAdapter, ReconcileError, ResourceIdentity};
use serde::{Deserialize, Serialize};

pub const ROLE_RESOURCE_TYPE: &str = "Role";

const KNOWN_KEYS: &[&str] = &["name", "user"];

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireReference {
    #[serde(default)]
    id: String,
    #[serde(default = "default_reference_type")]
    resource_type: String,
}

#[derive(Serialize, Deserialize)]
struct WireRole {
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<WireReference>,
}

/// The spec as sent: an empty reference type becomes `User`.
fn normalized(spec: &RoleSpec) -> RoleSpec {
    let mut spec = spec.clone();
    if let Some(user) = spec.user.as_mut() {
        if user.resource_type.is_empty() {
            user.resource_type = default_reference_type();
        }
    }
    spec
}

/// Projects [`RoleSpec`] to and from `Role` documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleAdapter;

impl KindAdapter for RoleAdapter {
    type Known = RoleSpec;

    fn resource_type(&self) -> Option<&str> {
        Some(ROLE_RESOURCE_TYPE)
    }

    fn known_keys(&self) -> &[&'static str] {
        KNOWN_KEYS
    }

    fn build_document(
        &self,
        identity: &ResourceIdentity,
        state: &DeclaredState<RoleSpec>,
    ) -> Result<Document, ReconcileError> {
        let spec = normalized(&state.known);
        if spec.name.is_empty() {
            return Err(ReconcileError::validation("role name must not be empty"));
        }
        let user = spec
            .user
            .as_ref()
            .ok_or_else(|| ReconcileError::validation("user block is required"))?;
        if user.id.is_empty() {
            return Err(ReconcileError::validation("user.id must not be empty"));
        }
        let wire = WireRole {
            name: spec.name.clone(),
            user: Some(WireReference {
                id: user.id.clone(),
                resource_type: user.resource_type.clone(),
            }),
        };
        Ok(assemble_document(
            identity,
            to_fragment(&wire)?,
            &state.extensions,
        ))
    }

    fn extract_state(&self, document: Document) -> Result<DeclaredState<RoleSpec>, ReconcileError> {
        let (parts, meta) = split_read_back(document, KNOWN_KEYS);
        let wire: WireRole = from_fragment(parts.known)?;
        Ok(DeclaredState {
            known: RoleSpec {
                name: wire.name,
                user: wire.user.map(|user| UserReference {
                    id: user.id,
                    resource_type: user.resource_type,
                }),
            },
            extensions: parts.extensions,
            meta,
        })
    }

    fn in_sync(&self, desired: &DeclaredState<RoleSpec>, observed: &DeclaredState<RoleSpec>) -> bool {
        normalized(&desired.known) == observed.known && desired.extensions == observed.extensions
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

    #[test]
    fn test_build_document_defaults_reference_type() {
        let mut spec = RoleSpec::new("admins", "u1");
        if let Some(user) = spec.user.as_mut() {
            user.resource_type = String::new();
        }
        let state = DeclaredState::new(spec).with_extension("description", "Ops team");
        let document = RoleAdapter
            .build_document(&ResourceIdentity::new("Role", "r1"), &state)
            .unwrap();

        assert_eq!(
            Value::Object(document),
            json!({
                "resourceType": "Role",
                "id": "r1",
                "name": "admins",
                "user": {"id": "u1", "resourceType": "User"},
                "description": "Ops team"
            })
        );
    }

    #[test]
    fn test_build_document_validates() {
        let identity = ResourceIdentity::new("Role", "r1");
        let unnamed = DeclaredState::new(RoleSpec::new("", "u1"));
        let unbound = DeclaredState::new(RoleSpec {
            name: "admins".to_string(),
            user: None,
        });
        for state in [unnamed, unbound] {
            assert!(matches!(
                RoleAdapter.build_document(&identity, &state),
                Err(ReconcileError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_extract_state() {
        let state = RoleAdapter
            .extract_state(doc(json!({
                "resourceType": "Role",
                "id": "r1",
                "name": "admins",
                "user": {"id": "client-1", "resourceType": "Client"},
                "links": [1, 2]
            })))
            .unwrap();

        assert_eq!(state.known.name, "admins");
        assert_eq!(
            state.known.user,
            Some(UserReference {
                id: "client-1".to_string(),
                resource_type: "Client".to_string()
            })
        );
        assert_eq!(state.extensions["links"], "[1,2]");
        assert!(state.meta.is_none());
    }

    #[test]
    fn test_caller_shape_defaults_reference_type() {
        let spec: RoleSpec =
            serde_json::from_value(json!({"name": "admins", "user": {"id": "u1"}})).unwrap();
        assert_eq!(spec, RoleSpec::new("admins", "u1"));
    }

    #[test]
    fn test_empty_reference_type_is_not_drift() {
        let mut declared = RoleSpec::new("admins", "u1");
        if let Some(user) = declared.user.as_mut() {
            user.resource_type = String::new();
        }
        let observed = RoleAdapter
            .extract_state(doc(json!({
                "resourceType": "Role",
                "id": "r1",
                "name": "admins",
                "user": {"id": "u1", "resourceType": "User"}
            })))
            .unwrap();

        assert!(RoleAdapter.in_sync(&DeclaredState::new(declared), &observed));
        let other = DeclaredState::new(RoleSpec::new("admins", "u2"));
        assert!(!RoleAdapter.in_sync(&other, &observed));
    }
}
