//! # Declared Shapes
//!
//! Caller-facing known-field types for each managed kind. These are the `Known` halves of
//! [`DeclaredState`](reconcile_framework::DeclaredState); the wire (camelCase) forms live next to
//! each adapter.

pub mod access_policy;
pub mod resource;
pub mod role;
pub mod user;

pub use access_policy::{AccessPolicySpec, PolicyEngine};
pub use resource::ResourcePayload;
pub use role::{RoleSpec, UserReference};
pub use user::{UserName, UserSpec};
