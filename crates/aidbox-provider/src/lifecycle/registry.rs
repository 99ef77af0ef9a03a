//! Registry of managed resource type names.

use crate::access_policy_kind::adapter::ACCESS_POLICY_RESOURCE_TYPE;
use crate::error::ProviderError;
use crate::role_kind::adapter::ROLE_RESOURCE_TYPE;
use crate::user_kind::adapter::USER_RESOURCE_TYPE;
use std::fmt;
use std::str::FromStr;

/// A resource type the provider manages, by its declared name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    User,
    Role,
    AccessPolicy,
    /// Any store resource type, given per resource.
    Resource,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::User,
        ResourceKind::Role,
        ResourceKind::AccessPolicy,
        ResourceKind::Resource,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::User => "aidbox_user",
            ResourceKind::Role => "aidbox_role",
            ResourceKind::AccessPolicy => "aidbox_access_policy",
            ResourceKind::Resource => "aidbox_resource",
        }
    }

    /// The store resource type; `None` for the generic kind.
    pub fn resource_type(&self) -> Option<&'static str> {
        match self {
            ResourceKind::User => Some(USER_RESOURCE_TYPE),
            ResourceKind::Role => Some(ROLE_RESOURCE_TYPE),
            ResourceKind::AccessPolicy => Some(ACCESS_POLICY_RESOURCE_TYPE),
            ResourceKind::Resource => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResourceKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ProviderError::UnknownType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in ResourceKind::ALL {
            assert_eq!(kind.name().parse::<ResourceKind>().unwrap(), kind);
        }
        assert_eq!(ResourceKind::User.resource_type(), Some("User"));
        assert_eq!(ResourceKind::Resource.resource_type(), None);
    }

    #[test]
    fn test_unknown_name() {
        assert!(matches!(
            "aidbox_client".parse::<ResourceKind>(),
            Err(ProviderError::UnknownType(name)) if name == "aidbox_client"
        ));
    }
}
