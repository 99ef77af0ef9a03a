//! # Kind Clients
//!
//! One client per resource kind. Each wraps a [`ReconcileEngine`](reconcile_framework::ReconcileEngine)
//! and exposes kind-shaped create, update and apply methods; `read`, `delete` and `plan` come from
//! [`KindClient`](reconcile_framework::KindClient).

mod access_policy_client;
mod resource_client;
mod role_client;
mod user_client;

pub use access_policy_client::AccessPolicyClient;
pub use resource_client::ResourceClient;
pub use role_client::RoleClient;
pub use user_client::UserClient;

use reconcile_framework::ResourceIdentity;

/// Identity for a kind with a fixed resource type; `None` asks the engine to generate an id.
pub(crate) fn identity_for(resource_type: &str, resource_id: Option<&str>) -> ResourceIdentity {
    match resource_id {
        Some(id) => ResourceIdentity::new(resource_type, id),
        None => ResourceIdentity::unassigned(resource_type),
    }
}
