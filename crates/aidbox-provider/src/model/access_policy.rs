use reconcile_framework::{Document, ReconcileError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Declared fields of an Aidbox `AccessPolicy`.
///
/// `engine` is kept as text so a policy written by another tool with an engine this crate does
/// not know can still be read; it is parsed into [`PolicyEngine`] when a document is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessPolicySpec {
    #[serde(default)]
    pub engine: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matcho: Option<Document>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql: Option<Document>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Document>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub and: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub or: Option<Vec<Value>>,
}

impl AccessPolicySpec {
    /// A policy for an engine that carries no sub-document.
    pub fn new(engine: PolicyEngine) -> Self {
        Self {
            engine: engine.to_string(),
            ..Self::default()
        }
    }

    pub fn matcho(matcho: Document) -> Self {
        Self {
            matcho: Some(matcho),
            ..Self::new(PolicyEngine::Matcho)
        }
    }

    pub fn sql(sql: Document) -> Self {
        Self {
            sql: Some(sql),
            ..Self::new(PolicyEngine::Sql)
        }
    }

    pub fn json_schema(schema: Document) -> Self {
        Self {
            schema: Some(schema),
            ..Self::new(PolicyEngine::JsonSchema)
        }
    }

    pub fn complex(and: Option<Vec<Value>>, or: Option<Vec<Value>>) -> Self {
        Self {
            and,
            or,
            ..Self::new(PolicyEngine::Complex)
        }
    }
}

/// Policy evaluation engines supported by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyEngine {
    JsonSchema,
    Allow,
    Sql,
    Complex,
    Matcho,
    Clj,
    MatchoRpc,
    AllowRpc,
    SignedRpc,
    SmartOnFhir,
}

impl PolicyEngine {
    pub const ALL: [PolicyEngine; 10] = [
        PolicyEngine::JsonSchema,
        PolicyEngine::Allow,
        PolicyEngine::Sql,
        PolicyEngine::Complex,
        PolicyEngine::Matcho,
        PolicyEngine::Clj,
        PolicyEngine::MatchoRpc,
        PolicyEngine::AllowRpc,
        PolicyEngine::SignedRpc,
        PolicyEngine::SmartOnFhir,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyEngine::JsonSchema => "json-schema",
            PolicyEngine::Allow => "allow",
            PolicyEngine::Sql => "sql",
            PolicyEngine::Complex => "complex",
            PolicyEngine::Matcho => "matcho",
            PolicyEngine::Clj => "clj",
            PolicyEngine::MatchoRpc => "matcho-rpc",
            PolicyEngine::AllowRpc => "allow-rpc",
            PolicyEngine::SignedRpc => "signed-rpc",
            PolicyEngine::SmartOnFhir => "smart-on-fhir",
        }
    }
}

impl fmt::Display for PolicyEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyEngine {
    type Err = ReconcileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ReconcileError::validation("access policy engine is required"));
        }
        PolicyEngine::ALL
            .into_iter()
            .find(|engine| engine.as_str() == s)
            .ok_or_else(|| {
                let supported: Vec<&str> = PolicyEngine::ALL.iter().map(|e| e.as_str()).collect();
                ReconcileError::validation(format!(
                    "unknown access policy engine '{s}', expected one of: {}",
                    supported.join(", ")
                ))
            })
    }
}
