//! [`KindAdapter`] implementation for the User kind.

use crate::model::{UserName, UserSpec};
use reconcile_framework::kind::{assemble_document, from_fragment, split_read_back, to_fragment};
use reconcile_framework::{DeclaredState, Document, KindAdapter, ReconcileError, ResourceIdentity};
use serde::{Deserialize, Serialize};

pub const USER_RESOURCE_TYPE: &str = "User";

const KNOWN_KEYS: &[&str] = &["name", "password"];

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireName {
    #[serde(default)]
    given_name: String,
    #[serde(default)]
    family_name: String,
}

#[derive(Serialize, Deserialize)]
struct WireUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<WireName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    password: Option<String>,
}

impl From<&UserName> for WireName {
    fn from(name: &UserName) -> Self {
        Self {
            given_name: name.given_name.clone(),
            family_name: name.family_name.clone(),
        }
    }
}

impl From<WireName> for UserName {
    fn from(name: WireName) -> Self {
        Self {
            given_name: name.given_name,
            family_name: name.family_name,
        }
    }
}

/// Projects [`UserSpec`] to and from `User` documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserAdapter;

impl KindAdapter for UserAdapter {
    type Known = UserSpec;

    fn resource_type(&self) -> Option<&str> {
        Some(USER_RESOURCE_TYPE)
    }

    fn known_keys(&self) -> &[&'static str] {
        KNOWN_KEYS
    }

    fn build_document(
        &self,
        identity: &ResourceIdentity,
        state: &DeclaredState<UserSpec>,
    ) -> Result<Document, ReconcileError> {
        let name = state
            .known
            .name
            .as_ref()
            .ok_or_else(|| ReconcileError::validation("name block is required"))?;
        if name.given_name.is_empty() || name.family_name.is_empty() {
            return Err(ReconcileError::validation(
                "name.given_name and name.family_name must not be empty",
            ));
        }

        let wire = WireUser {
            name: Some(name.into()),
            password: state.known.password.clone(),
        };
        Ok(assemble_document(
            identity,
            to_fragment(&wire)?,
            &state.extensions,
        ))
    }

    fn extract_state(&self, document: Document) -> Result<DeclaredState<UserSpec>, ReconcileError> {
        let (parts, meta) = split_read_back(document, KNOWN_KEYS);
        let wire: WireUser = from_fragment(parts.known)?;
        Ok(DeclaredState {
            known: UserSpec {
                name: wire.name.map(UserName::from),
                password: wire.password,
            },
            extensions: parts.extensions,
            meta,
        })
    }

    /// Passwords never count as drift.
    fn in_sync(&self, desired: &DeclaredState<UserSpec>, observed: &DeclaredState<UserSpec>) -> bool {
        desired.known.name == observed.known.name && desired.extensions == observed.extensions
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

    fn ada() -> DeclaredState<UserSpec> {
        DeclaredState::new(UserSpec::new("Ada", "Lovelace").with_password("p@ss"))
    }

    #[test]
    fn test_build_document_uses_wire_names() {
        let identity = ResourceIdentity::new("User", "tf-1");
        let document = UserAdapter.build_document(&identity, &ada()).unwrap();
        assert_eq!(
            Value::Object(document),
            json!({
                "resourceType": "User",
                "id": "tf-1",
                "name": {"givenName": "Ada", "familyName": "Lovelace"},
                "password": "p@ss"
            })
        );
    }

    #[test]
    fn test_build_document_requires_name() {
        let identity = ResourceIdentity::new("User", "u1");
        let nameless = DeclaredState::new(UserSpec::default());
        assert!(matches!(
            UserAdapter.build_document(&identity, &nameless),
            Err(ReconcileError::Validation(_))
        ));

        let blank = DeclaredState::new(UserSpec::new("", "Lovelace"));
        assert!(matches!(
            UserAdapter.build_document(&identity, &blank),
            Err(ReconcileError::Validation(_))
        ));
    }

    #[test]
    fn test_extract_suppresses_hashed_password() {
        let state = UserAdapter
            .extract_state(doc(json!({
                "resourceType": "User",
                "id": "u1",
                "meta": {"versionId": "2"},
                "name": {"givenName": "Ada", "familyName": "Lovelace"},
                "password": "$s0$1f2e3d",
                "email": "ada@example.com"
            })))
            .unwrap();

        assert_eq!(state.known.name, UserSpec::new("Ada", "Lovelace").name);
        assert_eq!(state.known.password, None);
        assert!(!state.extensions.contains_key("password"));
        assert_eq!(state.extensions["email"], "ada@example.com");
        assert_eq!(state.meta.unwrap().version_id.as_deref(), Some("2"));
    }

    #[test]
    fn test_password_is_ignored_for_drift() {
        let observed = DeclaredState::new(UserSpec::new("Ada", "Lovelace"));
        assert!(UserAdapter.in_sync(&ada(), &observed));

        let renamed = DeclaredState::new(UserSpec::new("Ada", "Byron"));
        assert!(!UserAdapter.in_sync(&ada(), &renamed));
    }
}
