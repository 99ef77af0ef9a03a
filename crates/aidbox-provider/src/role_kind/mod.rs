//! # Role Kind
//!
//! Reconciles Aidbox `Role` resources: a named grant bound to one principal.
//!
//! - [`adapter`] - [`KindAdapter`](reconcile_framework::KindAdapter) implementation for
//!   [`RoleSpec`](crate::model::RoleSpec)
//! - [`new()`] - Factory function that creates the engine and client
//!
//! The user reference's `resource_type` defaults to `User`.

pub mod adapter;

pub use adapter::RoleAdapter;

use crate::clients::RoleClient;
use reconcile_framework::{ReconcileEngine, Transport};
use std::sync::Arc;

/// Creates a Role engine on `transport` and its client.
pub fn new(transport: Arc<dyn Transport>) -> RoleClient {
    RoleClient::new(ReconcileEngine::new(RoleAdapter, transport))
}
