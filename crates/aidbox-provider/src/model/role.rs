use serde::{Deserialize, Serialize};

/// Declared fields of an Aidbox `Role`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserReference>,
}

/// Reference from a role to the principal it is granted to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserReference {
    pub id: String,
    #[serde(default = "default_reference_type")]
    pub resource_type: String,
}

pub(crate) fn default_reference_type() -> String {
    "User".to_string()
}

impl RoleSpec {
    /// A role granted to the `User` with the given id.
    pub fn new(name: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            user: Some(UserReference {
                id: user_id.into(),
                resource_type: default_reference_type(),
            }),
        }
    }
}
