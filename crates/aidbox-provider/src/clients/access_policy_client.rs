//! # Access Policy Client
//!
//! High-level API for reconciling `AccessPolicy` resources.
use crate::access_policy_kind::adapter::ACCESS_POLICY_RESOURCE_TYPE;
use crate::access_policy_kind::AccessPolicyAdapter;
use crate::clients::identity_for;
use crate::model::AccessPolicySpec;
use reconcile_framework::{
    ApplyOutcome, DeclaredState, KindClient, ReconcileEngine, ReconcileError, ResourceIdentity,
};
use tracing::{debug, instrument};

pub struct AccessPolicyClient {
    engine: ReconcileEngine<AccessPolicyAdapter>,
}

impl AccessPolicyClient {
    pub fn new(engine: ReconcileEngine<AccessPolicyAdapter>) -> Self {
        Self { engine }
    }

    #[instrument(skip(self, state))]
    pub async fn create_policy(
        &self,
        resource_id: Option<&str>,
        state: DeclaredState<AccessPolicySpec>,
    ) -> Result<(ResourceIdentity, DeclaredState<AccessPolicySpec>), ReconcileError> {
        debug!("Sending request");
        self.engine
            .create(identity_for(ACCESS_POLICY_RESOURCE_TYPE, resource_id), state)
            .await
    }

    #[instrument(skip(self, state))]
    pub async fn update_policy(
        &self,
        id: &str,
        state: DeclaredState<AccessPolicySpec>,
    ) -> Result<DeclaredState<AccessPolicySpec>, ReconcileError> {
        debug!("Sending request");
        self.engine
            .update(&ResourceIdentity::new(ACCESS_POLICY_RESOURCE_TYPE, id), state)
            .await
    }

    #[instrument(skip(self, state))]
    pub async fn apply_policy(
        &self,
        prior: Option<&ResourceIdentity>,
        resource_id: Option<&str>,
        state: DeclaredState<AccessPolicySpec>,
    ) -> Result<(ResourceIdentity, DeclaredState<AccessPolicySpec>, ApplyOutcome), ReconcileError>
    {
        debug!("Sending request");
        self.engine
            .apply(
                prior,
                identity_for(ACCESS_POLICY_RESOURCE_TYPE, resource_id),
                state,
            )
            .await
    }
}

impl KindClient<AccessPolicyAdapter> for AccessPolicyClient {
    fn engine(&self) -> &ReconcileEngine<AccessPolicyAdapter> {
        &self.engine
    }
}
