//! # Resource Documents
//!
//! Wire-level and caller-level data model shared by every resource kind.
//!
//! - [`Document`]: the full JSON object exchanged with the remote store.
//! - [`ResourceIdentity`]: the `(kind, id)` address of a resource.
//! - [`Meta`]: server-managed metadata, read-only.
//! - [`DeclaredState`]: the caller-authored view, split into typed known fields and string
//!   extensions.

use crate::error::ReconcileError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A full remote document: top-level key to JSON value.
pub type Document = Map<String, Value>;

/// Extension fields keyed by name, values in canonical text form.
pub type Extensions = BTreeMap<String, String>;

pub const ID_KEY: &str = "id";
pub const RESOURCE_TYPE_KEY: &str = "resourceType";
pub const META_KEY: &str = "meta";
pub const PASSWORD_KEY: &str = "password";

/// Keys handled by the engine itself; never known fields of a kind, never extensions.
pub const RESERVED_KEYS: [&str; 3] = [ID_KEY, RESOURCE_TYPE_KEY, META_KEY];

/// Prefix of engine-generated resource ids.
pub const GENERATED_ID_PREFIX: &str = "tf-";

/// Prefix the store puts on password values it has already hashed.
pub const PASSWORD_HASH_MARKER: &str = "$s0$";

pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// The `(kind, id)` address of a resource.
///
/// An empty `id` means "not assigned yet"; the engine generates one on create.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceIdentity {
    pub kind: String,
    #[serde(default)]
    pub id: String,
}

impl ResourceIdentity {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// An identity hint with no id; create will generate one.
    pub fn unassigned(kind: impl Into<String>) -> Self {
        Self::new(kind, String::new())
    }

    pub fn is_assigned(&self) -> bool {
        !self.id.is_empty()
    }

    /// Returns this identity, generating `tf-<opaque>` when no id is set.
    pub fn or_generated(self) -> Self {
        if self.is_assigned() {
            return self;
        }
        let id = format!(
            "{GENERATED_ID_PREFIX}{}",
            uuid::Uuid::new_v4().simple()
        );
        Self { id, ..self }
    }
}

impl fmt::Display for ResourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

impl FromStr for ResourceIdentity {
    type Err = ReconcileError;

    /// Parses the `kind/id` state id form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((kind, id)) if !kind.is_empty() && !id.is_empty() && !id.contains('/') => {
                Ok(Self::new(kind, id))
            }
            _ => Err(ReconcileError::validation(format!(
                "'{s}' is not a valid resource identity, expected 'kind/id'"
            ))),
        }
    }
}

/// Server-managed metadata of a stored resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl Meta {
    /// Reads `meta` from its wire form. Accepts snake_case and camelCase keys.
    pub fn from_value(value: &Value) -> Option<Meta> {
        let object = value.as_object()?;
        let field = |snake: &str, camel: &str| {
            object
                .get(snake)
                .or_else(|| object.get(camel))
                .filter(|v| !v.is_null())
                .map(crate::partition::scalar_text)
        };
        let meta = Meta {
            version_id: field("version_id", "versionId"),
            created_at: field("created_at", "createdAt"),
            last_updated: field("last_updated", "lastUpdated"),
        };
        Some(meta)
    }

    pub fn is_empty(&self) -> bool {
        self.version_id.is_none() && self.created_at.is_none() && self.last_updated.is_none()
    }
}

/// The caller-authored view of a resource.
///
/// `meta` is populated from the most recent read only; it is skipped when a state is
/// deserialized from caller input and is never written back to the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeclaredState<K> {
    #[serde(flatten)]
    pub known: K,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: Extensions,
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl<K> DeclaredState<K> {
    pub fn new(known: K) -> Self {
        Self {
            known,
            extensions: Extensions::new(),
            meta: None,
        }
    }

    pub fn with_extension(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extensions.insert(key.into(), value.into());
        self
    }
}

/// True when `value` is a password the store has already hashed.
pub fn is_hashed_password(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|pw| pw.starts_with(PASSWORD_HASH_MARKER))
}

/// Removes the fields the server owns from a read-back document.
///
/// Drops `meta` (returned parsed), `id`, `resourceType`, and a hash-marked `password`.
pub fn strip_server_fields(document: &mut Document) -> Option<Meta> {
    let meta = document
        .remove(META_KEY)
        .as_ref()
        .and_then(Meta::from_value);
    document.remove(ID_KEY);
    document.remove(RESOURCE_TYPE_KEY);
    if document.get(PASSWORD_KEY).is_some_and(is_hashed_password) {
        document.remove(PASSWORD_KEY);
    }
    meta
}
