//! # KindClient Trait
//!
//! Provides a common interface for kind-specific clients, adding default `read`, `delete` and
//! `plan` methods built on top of a [`ReconcileEngine`].
use crate::document::{DeclaredState, ResourceIdentity};
use crate::engine::{Drift, ReconcileEngine};
use crate::error::ReconcileError;
use crate::kind::KindAdapter;
use async_trait::async_trait;

/// Trait for kind-specific clients to inherit the operations whose signatures do not depend on
/// the kind.
///
/// Create, update and apply take kind-shaped input and live on each client.
///
/// # Example
///
/// ```rust,ignore
/// struct RoleClient {
///     engine: ReconcileEngine<RoleAdapter>,
/// }
///
/// impl KindClient<RoleAdapter> for RoleClient {
///     fn engine(&self) -> &ReconcileEngine<RoleAdapter> {
///         &self.engine
///     }
/// }
///
/// // read(), delete() and plan() are provided automatically.
/// let state = client.read(&ResourceIdentity::new("Role", "admins")).await?;
/// ```
#[async_trait]
pub trait KindClient<K: KindAdapter>: Send + Sync {
    /// Access the engine that reconciles this kind.
    fn engine(&self) -> &ReconcileEngine<K>;

    /// Fetch the current state; `None` when the resource is absent.
    #[tracing::instrument(skip(self, identity), fields(resource = %identity))]
    async fn read(
        &self,
        identity: &ResourceIdentity,
    ) -> Result<Option<DeclaredState<K::Known>>, ReconcileError> {
        tracing::debug!("Sending request");
        self.engine().read(identity).await
    }

    /// Delete the resource. Succeeds when it is already gone.
    #[tracing::instrument(skip(self, identity), fields(resource = %identity))]
    async fn delete(&self, identity: &ResourceIdentity) -> Result<(), ReconcileError> {
        tracing::debug!("Sending request");
        self.engine().delete(identity).await
    }

    /// Report drift between `desired` and the store without writing.
    #[tracing::instrument(skip(self, identity, desired), fields(resource = %identity))]
    async fn plan(
        &self,
        identity: &ResourceIdentity,
        desired: &DeclaredState<K::Known>,
    ) -> Result<Drift<DeclaredState<K::Known>>, ReconcileError> {
        tracing::debug!("Sending request");
        self.engine().diff(identity, desired).await
    }
}
