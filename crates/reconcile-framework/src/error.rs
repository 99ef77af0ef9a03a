//! # Framework Errors
//!
//! This module defines the error taxonomy shared by the engine, the kind adapters and every
//! transport implementation. By centralizing error definitions, callers get one type to match on
//! regardless of which resource kind failed.
//!
//! - [`ReconcileError::Validation`] is raised before any network call and is never retried.
//! - [`ReconcileError::Transport`] wraps a [`TransportError`] from the remote store.
//! - [`ReconcileError::Encoding`] reports documents that could not be (de)serialized.
//!
//! Not-found is not an error: a missing resource collapses to the absent state.

use crate::document::ResourceIdentity;

/// Errors produced by a [`Transport`](crate::Transport) implementation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    /// The store answered with a status outside the operation's success set.
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// The request did not complete within the configured timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Connection-level failure (DNS, TLS, refused connection, ...).
    #[error("Network error: {0}")]
    Network(String),

    /// The client-credentials token exchange failed.
    #[error("Token acquisition failed: {0}")]
    Token(String),

    /// A success response carried a body that is not a JSON document.
    #[error("Invalid response body: {0}")]
    Body(String),
}

impl TransportError {
    /// True when the store reported that the addressed resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TransportError::Status { status: 404, .. })
    }
}

/// Errors returned by [`ReconcileEngine`](crate::ReconcileEngine) operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReconcileError {
    /// The declared state is malformed.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The mandatory read-after-write found nothing at the identity just written.
    #[error("Resource {0} disappeared between write and read-back")]
    Vanished(ResourceIdentity),
}

impl ReconcileError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ReconcileError::Validation(msg.into())
    }
}

impl From<serde_json::Error> for ReconcileError {
    fn from(e: serde_json::Error) -> Self {
        ReconcileError::Encoding(e.to_string())
    }
}
