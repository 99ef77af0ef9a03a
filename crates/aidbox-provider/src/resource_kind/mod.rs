//! # Generic Resource Kind
//!
//! Reconciles a resource of any type from a free-form JSON payload. The caller picks the
//! resource type; the payload is sent verbatim with the identity injected.
//!
//! - [`adapter`] - [`KindAdapter`](reconcile_framework::KindAdapter) implementation for
//!   [`ResourcePayload`](crate::model::ResourcePayload)
//! - [`new()`] - Factory function that creates the engine and client

pub mod adapter;

pub use adapter::ResourceAdapter;

use crate::clients::ResourceClient;
use reconcile_framework::{ReconcileEngine, Transport};
use std::sync::Arc;

/// Creates a generic engine on `transport` and its client.
pub fn new(transport: Arc<dyn Transport>) -> ResourceClient {
    ResourceClient::new(ReconcileEngine::new(ResourceAdapter, transport))
}
