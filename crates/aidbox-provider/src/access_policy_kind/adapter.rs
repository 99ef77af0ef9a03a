//! [`KindAdapter`] implementation for the AccessPolicy kind.

use crate::model::{AccessPolicySpec, PolicyEngine};
use reconcile_framework::kind::{assemble_document, from_fragment, split_read_back, to_fragment};
use reconcile_framework::{DeclaredState, Document, KindAdapter, ReconcileError, ResourceIdentity};
use tracing::debug;

pub const ACCESS_POLICY_RESOURCE_TYPE: &str = "AccessPolicy";

const KNOWN_KEYS: &[&str] = &["engine", "matcho", "sql", "schema", "and", "or"];

/// Projects [`AccessPolicySpec`] to and from `AccessPolicy` documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessPolicyAdapter;

fn required<T: Clone>(value: &Option<T>, engine: PolicyEngine, key: &str) -> Result<T, ReconcileError> {
    value.clone().ok_or_else(|| {
        ReconcileError::validation(format!("engine '{engine}' requires a '{key}' sub-document"))
    })
}

/// The outgoing known fields: the engine plus exactly its own sub-document.
fn outgoing(spec: &AccessPolicySpec) -> Result<AccessPolicySpec, ReconcileError> {
    let engine: PolicyEngine = spec.engine.parse()?;
    let mut out = AccessPolicySpec::new(engine);
    match engine {
        PolicyEngine::Matcho => out.matcho = Some(required(&spec.matcho, engine, "matcho")?),
        PolicyEngine::Sql => out.sql = Some(required(&spec.sql, engine, "sql")?),
        PolicyEngine::JsonSchema => out.schema = Some(required(&spec.schema, engine, "schema")?),
        PolicyEngine::Complex => {
            if spec.and.is_none() && spec.or.is_none() {
                return Err(ReconcileError::validation(
                    "engine 'complex' requires at least one of 'and' or 'or'",
                ));
            }
            out.and = spec.and.clone();
            out.or = spec.or.clone();
        }
        _ => {}
    }
    Ok(out)
}

impl KindAdapter for AccessPolicyAdapter {
    type Known = AccessPolicySpec;

    fn resource_type(&self) -> Option<&str> {
        Some(ACCESS_POLICY_RESOURCE_TYPE)
    }

    fn known_keys(&self) -> &[&'static str] {
        KNOWN_KEYS
    }

    fn build_document(
        &self,
        identity: &ResourceIdentity,
        state: &DeclaredState<AccessPolicySpec>,
    ) -> Result<Document, ReconcileError> {
        let known = outgoing(&state.known)?;
        if known != state.known {
            debug!(
                id = %identity.id,
                engine = %known.engine,
                "Dropping sub-documents of other engines"
            );
        }
        Ok(assemble_document(
            identity,
            to_fragment(&known)?,
            &state.extensions,
        ))
    }

    fn extract_state(
        &self,
        document: Document,
    ) -> Result<DeclaredState<AccessPolicySpec>, ReconcileError> {
        let (parts, meta) = split_read_back(document, KNOWN_KEYS);
        Ok(DeclaredState {
            known: from_fragment(parts.known)?,
            extensions: parts.extensions,
            meta,
        })
    }

    /// Compares what would be sent, so stale sub-documents in the declared state are not drift.
    fn in_sync(
        &self,
        desired: &DeclaredState<AccessPolicySpec>,
        observed: &DeclaredState<AccessPolicySpec>,
    ) -> bool {
        let desired_known = outgoing(&desired.known).unwrap_or_else(|_| desired.known.clone());
        desired_known == observed.known && desired.extensions == observed.extensions
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

    fn build(spec: AccessPolicySpec) -> Result<Value, ReconcileError> {
        AccessPolicyAdapter
            .build_document(
                &ResourceIdentity::new("AccessPolicy", "ap1"),
                &DeclaredState::new(spec),
            )
            .map(Value::Object)
    }

    #[test]
    fn test_only_selected_sub_document_is_attached() {
        let spec = AccessPolicySpec {
            sql: Some(doc(json!({"query": "SELECT true"}))),
            ..AccessPolicySpec::matcho(doc(json!({"uri": "/Patient"})))
        };
        assert_eq!(
            build(spec).unwrap(),
            json!({
                "resourceType": "AccessPolicy",
                "id": "ap1",
                "engine": "matcho",
                "matcho": {"uri": "/Patient"}
            })
        );
    }

    #[test]
    fn test_engine_to_key_mapping() {
        let schema = build(AccessPolicySpec::json_schema(doc(json!({"required": ["user"]})))).unwrap();
        assert_eq!(schema["schema"], json!({"required": ["user"]}));
        assert!(schema.get("json-schema").is_none());

        let complex = build(AccessPolicySpec::complex(
            Some(vec![json!({"engine": "allow"})]),
            None,
        ))
        .unwrap();
        assert_eq!(complex["and"], json!([{"engine": "allow"}]));
        assert!(complex.get("or").is_none());

        let allow = AccessPolicySpec {
            matcho: Some(doc(json!({"uri": "/x"}))),
            ..AccessPolicySpec::new(PolicyEngine::Allow)
        };
        assert_eq!(
            build(allow).unwrap(),
            json!({"resourceType": "AccessPolicy", "id": "ap1", "engine": "allow"})
        );
    }

    #[test]
    fn test_invalid_policies() {
        let unknown = AccessPolicySpec {
            engine: "opa".to_string(),
            ..AccessPolicySpec::default()
        };
        let missing_engine = AccessPolicySpec::default();
        let matcho_without_doc = AccessPolicySpec::new(PolicyEngine::Matcho);
        let empty_complex = AccessPolicySpec::complex(None, None);

        for spec in [unknown, missing_engine, matcho_without_doc, empty_complex] {
            assert!(matches!(build(spec), Err(ReconcileError::Validation(_))));
        }
    }

    #[test]
    fn test_stale_sub_documents_are_not_drift() {
        let desired = DeclaredState::new(AccessPolicySpec {
            sql: Some(doc(json!({"query": "SELECT 1"}))),
            ..AccessPolicySpec::matcho(doc(json!({"uri": "/Patient"})))
        });
        let observed = AccessPolicyAdapter
            .extract_state(doc(json!({
                "resourceType": "AccessPolicy",
                "id": "ap1",
                "engine": "matcho",
                "matcho": {"uri": "/Patient"}
            })))
            .unwrap();
        assert!(AccessPolicyAdapter.in_sync(&desired, &observed));
    }

    #[test]
    fn test_stored_stale_sub_document_is_drift() {
        let desired = DeclaredState::new(AccessPolicySpec::matcho(doc(json!({"uri": "/Patient"}))));
        let observed = AccessPolicyAdapter
            .extract_state(doc(json!({
                "engine": "matcho",
                "matcho": {"uri": "/Patient"},
                "sql": {"query": "SELECT 1"}
            })))
            .unwrap();
        assert!(!AccessPolicyAdapter.in_sync(&desired, &observed));
    }
}
