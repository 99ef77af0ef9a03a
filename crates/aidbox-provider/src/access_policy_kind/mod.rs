//! # Access Policy Kind
//!
//! Reconciles Aidbox `AccessPolicy` resources.
//!
//! - [`adapter`] - [`KindAdapter`](reconcile_framework::KindAdapter) implementation for
//!   [`AccessPolicySpec`](crate::model::AccessPolicySpec)
//! - [`new()`] - Factory function that creates the engine and client
//!
//! ## Engine sub-documents
//!
//! | engine | attached keys |
//! |--------|---------------|
//! | `matcho` | `matcho` |
//! | `sql` | `sql` |
//! | `json-schema` | `schema` |
//! | `complex` | `and`, `or` |
//! | `allow`, `clj`, `matcho-rpc`, `allow-rpc`, `signed-rpc`, `smart-on-fhir` | none |
//!
//! Only the selected engine's sub-document is sent; sub-documents of other engines in the
//! declared state are dropped.

pub mod adapter;

pub use adapter::AccessPolicyAdapter;

use crate::clients::AccessPolicyClient;
use reconcile_framework::{ReconcileEngine, Transport};
use std::sync::Arc;

/// Creates an AccessPolicy engine on `transport` and its client.
pub fn new(transport: Arc<dyn Transport>) -> AccessPolicyClient {
    AccessPolicyClient::new(ReconcileEngine::new(AccessPolicyAdapter, transport))
}
