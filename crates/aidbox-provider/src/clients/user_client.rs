//! # User Client
//!
//! High-level API for reconciling `User` resources.
use crate::clients::identity_for;
use crate::model::UserSpec;
use crate::user_kind::adapter::USER_RESOURCE_TYPE;
use crate::user_kind::UserAdapter;
use reconcile_framework::{
    ApplyOutcome, DeclaredState, KindClient, ReconcileEngine, ReconcileError, ResourceIdentity,
};
use tracing::{debug, instrument};

pub struct UserClient {
    engine: ReconcileEngine<UserAdapter>,
}

impl UserClient {
    pub fn new(engine: ReconcileEngine<UserAdapter>) -> Self {
        Self { engine }
    }

    /// Creates a user; without `resource_id` a `tf-` id is generated.
    #[instrument(skip(self, state))]
    pub async fn create_user(
        &self,
        resource_id: Option<&str>,
        state: DeclaredState<UserSpec>,
    ) -> Result<(ResourceIdentity, DeclaredState<UserSpec>), ReconcileError> {
        debug!("Sending request");
        self.engine
            .create(identity_for(USER_RESOURCE_TYPE, resource_id), state)
            .await
    }

    #[instrument(skip(self, state))]
    pub async fn update_user(
        &self,
        id: &str,
        state: DeclaredState<UserSpec>,
    ) -> Result<DeclaredState<UserSpec>, ReconcileError> {
        debug!("Sending request");
        self.engine
            .update(&ResourceIdentity::new(USER_RESOURCE_TYPE, id), state)
            .await
    }

    #[instrument(skip(self, state))]
    pub async fn apply_user(
        &self,
        prior: Option<&ResourceIdentity>,
        resource_id: Option<&str>,
        state: DeclaredState<UserSpec>,
    ) -> Result<(ResourceIdentity, DeclaredState<UserSpec>, ApplyOutcome), ReconcileError> {
        debug!("Sending request");
        self.engine
            .apply(prior, identity_for(USER_RESOURCE_TYPE, resource_id), state)
            .await
    }
}

impl KindClient<UserAdapter> for UserClient {
    fn engine(&self) -> &ReconcileEngine<UserAdapter> {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user_kind;
    use reconcile_framework::mock::MemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_create_with_explicit_id_then_delete() {
        let store = MemoryStore::new();
        let client = user_kind::new(Arc::new(store.clone()));

        let (identity, observed) = client
            .create_user(Some("ada"), DeclaredState::new(UserSpec::new("Ada", "Lovelace")))
            .await
            .unwrap();
        assert_eq!(identity, ResourceIdentity::new("User", "ada"));
        assert_eq!(observed.known, UserSpec::new("Ada", "Lovelace"));

        client.delete(&identity).await.unwrap();
        assert!(client.read(&identity).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_renames() {
        let store = MemoryStore::new();
        let client = user_kind::new(Arc::new(store.clone()));
        client
            .create_user(Some("ada"), DeclaredState::new(UserSpec::new("Ada", "Lovelace")))
            .await
            .unwrap();

        let observed = client
            .update_user("ada", DeclaredState::new(UserSpec::new("Ada", "King")))
            .await
            .unwrap();
        assert_eq!(observed.known, UserSpec::new("Ada", "King"));
        assert_eq!(store.write_count(), 2);
    }
}
