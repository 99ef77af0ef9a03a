//! # Role Client
//!
//! High-level API for reconciling `Role` resources.
use crate::clients::identity_for;
use crate::model::RoleSpec;
use crate::role_kind::adapter::ROLE_RESOURCE_TYPE;
use crate::role_kind::RoleAdapter;
use reconcile_framework::{
    ApplyOutcome, DeclaredState, KindClient, ReconcileEngine, ReconcileError, ResourceIdentity,
};
use tracing::{debug, instrument};

pub struct RoleClient {
    engine: ReconcileEngine<RoleAdapter>,
}

impl RoleClient {
    pub fn new(engine: ReconcileEngine<RoleAdapter>) -> Self {
        Self { engine }
    }

    #[instrument(skip(self, state))]
    pub async fn create_role(
        &self,
        resource_id: Option<&str>,
        state: DeclaredState<RoleSpec>,
    ) -> Result<(ResourceIdentity, DeclaredState<RoleSpec>), ReconcileError> {
        debug!("Sending request");
        self.engine
            .create(identity_for(ROLE_RESOURCE_TYPE, resource_id), state)
            .await
    }

    #[instrument(skip(self, state))]
    pub async fn update_role(
        &self,
        id: &str,
        state: DeclaredState<RoleSpec>,
    ) -> Result<DeclaredState<RoleSpec>, ReconcileError> {
        debug!("Sending request");
        self.engine
            .update(&ResourceIdentity::new(ROLE_RESOURCE_TYPE, id), state)
            .await
    }

    #[instrument(skip(self, state))]
    pub async fn apply_role(
        &self,
        prior: Option<&ResourceIdentity>,
        resource_id: Option<&str>,
        state: DeclaredState<RoleSpec>,
    ) -> Result<(ResourceIdentity, DeclaredState<RoleSpec>, ApplyOutcome), ReconcileError> {
        debug!("Sending request");
        self.engine
            .apply(prior, identity_for(ROLE_RESOURCE_TYPE, resource_id), state)
            .await
    }
}

impl KindClient<RoleAdapter> for RoleClient {
    fn engine(&self) -> &ReconcileEngine<RoleAdapter> {
        &self.engine
    }
}
