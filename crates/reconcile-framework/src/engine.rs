//! # Reconciliation Engine
//!
//! This module defines the `ReconcileEngine`, the single component that drives a resource
//! through its lifecycle against the remote store:
//!
//! ```text
//! Absent ──create──▶ Present ──update──▶ Present ──delete──▶ Absent
//!                       │
//!                       └── read finds nothing (external deletion) ──▶ Absent
//! ```
//!
//! The engine holds no mutable state of its own; everything lives in the store. Each operation
//! runs to completion before its result is returned, and the engine can be shared across tasks
//! working on different identities.

use crate::document::{DeclaredState, ResourceIdentity, ID_KEY};
use crate::error::ReconcileError;
use crate::kind::{check_extensions, KindAdapter};
use crate::transport::Transport;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of comparing desired state with the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Drift<S> {
    /// Nothing is stored at the identity.
    Absent,
    /// The store matches the desired state.
    InSync(S),
    /// The store holds something else; carries what was observed.
    Drifted(S),
}

/// What [`ReconcileEngine::apply`] had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyOutcome {
    Created,
    /// The prior resource was gone and has been written again under the same identity.
    Recreated,
    /// The identity changed; the prior resource was deleted and a new one created.
    Replaced,
    Updated,
    Unchanged,
}

/// True when moving from `prior` to `desired` cannot be done in place.
///
/// Ids are immutable: a different kind, or a non-empty desired id that differs from the prior
/// one, forces delete + create.
pub fn requires_replacement(prior: &ResourceIdentity, desired: &ResourceIdentity) -> bool {
    (!desired.kind.is_empty() && desired.kind != prior.kind)
        || (desired.is_assigned() && desired.id != prior.id)
}

/// The generic engine that reconciles one resource kind.
///
/// ## Operations
///
/// * **Create**:
///     1. Resolves the identity, generating `tf-<opaque>` when no id is given.
///     2. Validates extensions and builds the document through the adapter.
///     3. PUTs the document.
///     4. Reads it back; the store is the source of truth for `meta` and normalized fields.
///
/// * **Read**:
///     1. GETs the document; not-found yields `None`.
///     2. Strips server fields and projects the rest through the adapter.
///
/// * **Update**: Same wire exchange as create with a fixed identity, including the read-back.
///
/// * **Delete**: DELETEs the document; not-found counts as success.
///
/// A concurrent external change between a write and its read-back is not detected.
pub struct ReconcileEngine<K: KindAdapter> {
    adapter: K,
    transport: Arc<dyn Transport>,
}

impl<K: KindAdapter> ReconcileEngine<K> {
    pub fn new(adapter: K, transport: Arc<dyn Transport>) -> Self {
        Self { adapter, transport }
    }

    pub fn adapter(&self) -> &K {
        &self.adapter
    }

    /// Fills or checks the identity's kind against the adapter.
    pub fn resolve_kind(
        &self,
        identity: ResourceIdentity,
    ) -> Result<ResourceIdentity, ReconcileError> {
        match self.adapter.resource_type() {
            Some(fixed) if identity.kind.is_empty() => Ok(ResourceIdentity {
                kind: fixed.to_string(),
                ..identity
            }),
            Some(fixed) if identity.kind != fixed => Err(ReconcileError::validation(format!(
                "resource type '{}' cannot be managed as '{fixed}'",
                identity.kind
            ))),
            None if identity.kind.is_empty() => {
                Err(ReconcileError::validation("resource type is required"))
            }
            _ => Ok(identity),
        }
    }

    fn resolve_existing(
        &self,
        identity: &ResourceIdentity,
    ) -> Result<ResourceIdentity, ReconcileError> {
        let identity = self.resolve_kind(identity.clone())?;
        if !identity.is_assigned() {
            return Err(ReconcileError::validation(format!(
                "resource id is required for an existing {} resource",
                identity.kind
            )));
        }
        Ok(identity)
    }

    fn prepare(
        &self,
        identity: &ResourceIdentity,
        state: &DeclaredState<K::Known>,
    ) -> Result<crate::document::Document, ReconcileError> {
        check_extensions(self.adapter.known_keys(), &state.extensions)?;
        self.adapter.build_document(identity, state)
    }

    async fn write(
        &self,
        identity: &ResourceIdentity,
        state: &DeclaredState<K::Known>,
    ) -> Result<(), ReconcileError> {
        let kind = identity.kind.as_str();
        let document = self.prepare(identity, state)?;
        debug!(kind, id = %identity.id, fields = document.len(), "PUT");
        self.transport
            .create_or_replace(kind, &identity.id, &document)
            .await
            .map_err(|e| {
                warn!(kind, id = %identity.id, error = %e, "Write failed");
                ReconcileError::from(e)
            })
    }

    /// Mandatory read-after-write.
    async fn read_back(
        &self,
        identity: &ResourceIdentity,
    ) -> Result<DeclaredState<K::Known>, ReconcileError> {
        match self.read(identity).await? {
            Some(state) => Ok(state),
            None => {
                warn!(kind = %identity.kind, id = %identity.id, "Vanished after write");
                Err(ReconcileError::Vanished(identity.clone()))
            }
        }
    }

    /// Creates the resource and returns its fixed identity plus the read-back state.
    pub async fn create(
        &self,
        hint: ResourceIdentity,
        state: DeclaredState<K::Known>,
    ) -> Result<(ResourceIdentity, DeclaredState<K::Known>), ReconcileError> {
        let identity = self.resolve_kind(hint)?.or_generated();
        debug!(kind = %identity.kind, id = %identity.id, "Create");
        self.write(&identity, &state).await?;
        info!(kind = %identity.kind, id = %identity.id, "Created");
        let observed = self.read_back(&identity).await?;
        Ok((identity, observed))
    }

    /// Reads the resource; `None` means it is absent.
    pub async fn read(
        &self,
        identity: &ResourceIdentity,
    ) -> Result<Option<DeclaredState<K::Known>>, ReconcileError> {
        let identity = self.resolve_existing(identity)?;
        let kind = identity.kind.as_str();
        let document = match self.transport.read(kind, &identity.id).await {
            Ok(Some(document)) => document,
            Ok(None) => {
                info!(kind, id = %identity.id, "Absent");
                return Ok(None);
            }
            Err(e) => {
                warn!(kind, id = %identity.id, error = %e, "Read failed");
                return Err(e.into());
            }
        };
        if let Some(Value::String(stored)) = document.get(ID_KEY) {
            if *stored != identity.id {
                warn!(kind, id = %identity.id, stored = %stored, "Store returned a different id");
            }
        }
        let state = self.adapter.extract_state(document)?;
        debug!(kind, id = %identity.id, extensions = state.extensions.len(), "Read");
        Ok(Some(state))
    }

    /// Replaces the resource in place and returns the read-back state.
    pub async fn update(
        &self,
        identity: &ResourceIdentity,
        state: DeclaredState<K::Known>,
    ) -> Result<DeclaredState<K::Known>, ReconcileError> {
        let identity = self.resolve_existing(identity)?;
        debug!(kind = %identity.kind, id = %identity.id, "Update");
        self.write(&identity, &state).await?;
        info!(kind = %identity.kind, id = %identity.id, "Updated");
        self.read_back(&identity).await
    }

    /// Deletes the resource. Deleting an absent resource succeeds.
    pub async fn delete(&self, identity: &ResourceIdentity) -> Result<(), ReconcileError> {
        let identity = self.resolve_existing(identity)?;
        let kind = identity.kind.as_str();
        debug!(kind, id = %identity.id, "Delete");
        match self.transport.delete(kind, &identity.id).await {
            Ok(()) => {
                info!(kind, id = %identity.id, "Deleted");
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                info!(kind, id = %identity.id, "Already absent");
                Ok(())
            }
            Err(e) => {
                warn!(kind, id = %identity.id, error = %e, "Delete failed");
                Err(e.into())
            }
        }
    }

    /// Compares `desired` with what the store currently holds.
    ///
    /// The desired state is validated first, so a malformed state fails before any request.
    pub async fn diff(
        &self,
        identity: &ResourceIdentity,
        desired: &DeclaredState<K::Known>,
    ) -> Result<Drift<DeclaredState<K::Known>>, ReconcileError> {
        let identity = self.resolve_existing(identity)?;
        self.prepare(&identity, desired)?;
        let drift = match self.read(&identity).await? {
            None => Drift::Absent,
            Some(observed) if self.adapter.in_sync(desired, &observed) => Drift::InSync(observed),
            Some(observed) => Drift::Drifted(observed),
        };
        debug!(
            kind = %identity.kind,
            id = %identity.id,
            drifted = matches!(drift, Drift::Drifted(_)),
            absent = matches!(drift, Drift::Absent),
            "Diff"
        );
        Ok(drift)
    }

    /// Drives the store to `state` starting from the last known identity, if any.
    pub async fn apply(
        &self,
        prior: Option<&ResourceIdentity>,
        desired: ResourceIdentity,
        state: DeclaredState<K::Known>,
    ) -> Result<(ResourceIdentity, DeclaredState<K::Known>, ApplyOutcome), ReconcileError> {
        let Some(prior) = prior else {
            let (identity, observed) = self.create(desired, state).await?;
            return Ok((identity, observed, ApplyOutcome::Created));
        };
        let prior = self.resolve_existing(prior)?;

        if requires_replacement(&prior, &desired) {
            // Validate the new state before tearing anything down.
            let target = self.resolve_kind(desired)?;
            self.prepare(&target, &state)?;
            info!(from = %prior, to = %target, "Replacing");
            self.delete(&prior).await?;
            let (identity, observed) = self.create(target, state).await?;
            return Ok((identity, observed, ApplyOutcome::Replaced));
        }

        match self.diff(&prior, &state).await? {
            Drift::Absent => {
                let (identity, observed) = self.create(prior, state).await?;
                Ok((identity, observed, ApplyOutcome::Recreated))
            }
            Drift::InSync(observed) => Ok((prior, observed, ApplyOutcome::Unchanged)),
            Drift::Drifted(_) => {
                let observed = self.update(&prior, state).await?;
                Ok((prior, observed, ApplyOutcome::Updated))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_replacement() {
        let prior = ResourceIdentity::new("User", "u1");
        assert!(!requires_replacement(&prior, &ResourceIdentity::new("User", "u1")));
        assert!(!requires_replacement(&prior, &ResourceIdentity::unassigned("User")));
        assert!(!requires_replacement(&prior, &ResourceIdentity::unassigned("")));
        assert!(requires_replacement(&prior, &ResourceIdentity::new("User", "u2")));
        assert!(requires_replacement(&prior, &ResourceIdentity::new("Client", "u1")));
    }
}
