//! Error types for the provider.

use crate::config::ConfigError;
use reconcile_framework::{ReconcileError, TransportError};
use thiserror::Error;

/// Errors surfaced by the provider, its dispatcher and its binary.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Connecting to the store failed (client construction or token exchange).
    #[error("Connection failed: {0}")]
    Connect(#[from] TransportError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    /// The resource type name is not in the registry.
    #[error("Unknown resource type '{0}', expected one of: aidbox_user, aidbox_role, aidbox_access_policy, aidbox_resource")]
    UnknownType(String),

    /// A dispatcher request is malformed.
    #[error("Invalid request: {0}")]
    Request(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProviderError {
    pub fn request(msg: impl Into<String>) -> Self {
        ProviderError::Request(msg.into())
    }
}
