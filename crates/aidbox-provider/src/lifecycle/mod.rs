//! # Provider Lifecycle
//!
//! Wires the four kind clients onto one shared transport.
//!
//! ```text
//! ProviderConfig ──connect──▶ AidboxClient ──Arc<dyn Transport>──┬──▶ UserClient
//!                                                                ├──▶ RoleClient
//!                                                                ├──▶ AccessPolicyClient
//!                                                                └──▶ ResourceClient
//! ```
//!
//! The token exchange happens once, in [`AidboxProvider::connect`]; every client reuses the
//! connected transport. Tests build the provider with
//! [`from_transport`](AidboxProvider::from_transport) over a
//! [`MemoryStore`](reconcile_framework::mock::MemoryStore) instead.
//!
//! [`ResourceKind`] is the registry of managed resource type names.

pub mod registry;

pub use registry::ResourceKind;

use crate::clients::{AccessPolicyClient, ResourceClient, RoleClient, UserClient};
use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::http::AidboxClient;
use crate::{access_policy_kind, resource_kind, role_kind, user_kind};
use reconcile_framework::Transport;
use std::sync::Arc;
use tracing::info;

/// The configured provider: one client per managed kind.
pub struct AidboxProvider {
    pub users: UserClient,
    pub roles: RoleClient,
    pub access_policies: AccessPolicyClient,
    pub resources: ResourceClient,
}

impl AidboxProvider {
    /// Builds every client on `transport`.
    pub fn from_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            users: user_kind::new(transport.clone()),
            roles: role_kind::new(transport.clone()),
            access_policies: access_policy_kind::new(transport.clone()),
            resources: resource_kind::new(transport),
        }
    }

    /// Connects to the store described by `config`.
    ///
    /// Fails on an unreachable endpoint or a rejected token exchange.
    pub async fn connect(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = AidboxClient::connect(config).await?;
        info!(kinds = ResourceKind::ALL.len(), "Provider ready");
        Ok(Self::from_transport(Arc::new(client)))
    }
}
