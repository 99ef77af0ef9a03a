//! # Resource Client
//!
//! High-level API for reconciling resources of any type from a free-form payload.
use crate::clients::identity_for;
use crate::model::ResourcePayload;
use crate::resource_kind::ResourceAdapter;
use reconcile_framework::{
    ApplyOutcome, DeclaredState, KindClient, ReconcileEngine, ReconcileError, ResourceIdentity,
};
use tracing::{debug, instrument};

pub struct ResourceClient {
    engine: ReconcileEngine<ResourceAdapter>,
}

impl ResourceClient {
    pub fn new(engine: ReconcileEngine<ResourceAdapter>) -> Self {
        Self { engine }
    }

    #[instrument(skip(self, state))]
    pub async fn create_resource(
        &self,
        resource_type: &str,
        resource_id: Option<&str>,
        state: DeclaredState<ResourcePayload>,
    ) -> Result<(ResourceIdentity, DeclaredState<ResourcePayload>), ReconcileError> {
        debug!("Sending request");
        self.engine
            .create(identity_for(resource_type, resource_id), state)
            .await
    }

    #[instrument(skip(self, state))]
    pub async fn update_resource(
        &self,
        resource_type: &str,
        id: &str,
        state: DeclaredState<ResourcePayload>,
    ) -> Result<DeclaredState<ResourcePayload>, ReconcileError> {
        debug!("Sending request");
        self.engine
            .update(&ResourceIdentity::new(resource_type, id), state)
            .await
    }

    /// Changing `resource_type` or `resource_id` replaces the resource.
    #[instrument(skip(self, state))]
    pub async fn apply_resource(
        &self,
        prior: Option<&ResourceIdentity>,
        resource_type: &str,
        resource_id: Option<&str>,
        state: DeclaredState<ResourcePayload>,
    ) -> Result<(ResourceIdentity, DeclaredState<ResourcePayload>, ApplyOutcome), ReconcileError>
    {
        debug!("Sending request");
        self.engine
            .apply(prior, identity_for(resource_type, resource_id), state)
            .await
    }
}

impl KindClient<ResourceAdapter> for ResourceClient {
    fn engine(&self) -> &ReconcileEngine<ResourceAdapter> {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource_kind;
    use reconcile_framework::mock::MockTransport;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_forbidden_field_sends_nothing() {
        let transport = MockTransport::new();
        let client = resource_kind::new(Arc::new(transport.clone()));

        let payload = match json!({"id": "x", "name": "Test"}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        let result = client
            .create_resource(
                "Organization",
                Some("org-1"),
                DeclaredState::new(ResourcePayload::new(payload)),
            )
            .await;

        assert!(matches!(result, Err(ReconcileError::Validation(_))));
        transport.verify();
        assert!(transport.puts().is_empty());
    }

    #[tokio::test]
    async fn test_resource_type_is_required() {
        let transport = MockTransport::new();
        let client = resource_kind::new(Arc::new(transport.clone()));
        let result = client
            .create_resource("", None, DeclaredState::new(ResourcePayload::default()))
            .await;
        assert!(matches!(result, Err(ReconcileError::Validation(_))));
    }
}
