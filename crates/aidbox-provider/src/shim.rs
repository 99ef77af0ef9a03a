//! # Request Dispatcher
//!
//! Routes one JSON request to the engine of the named resource type and shapes the answer:
//!
//! ```json
//! {"operation": "create", "type": "aidbox_user", "resource_id": "ada",
//!  "state": {"name": {"given_name": "Ada", "family_name": "Lovelace"}, "password": "p@ss"}}
//! ```
//!
//! | Operation | Needs | Answers with |
//! |-----------|-------|--------------|
//! | `create` | `state` | `identity`, `state` |
//! | `read` | `resource_id` or `prior` | `state` (omitted when absent) |
//! | `update` | `resource_id` or `prior`, `state` | `identity`, `state` |
//! | `delete` | `resource_id` or `prior` | nothing |
//! | `plan` | `resource_id` or `prior`, `state` | `drift`, observed `state` |
//! | `apply` | `state`, optional `prior` | `identity`, `state`, `outcome` |
//!
//! The generic `aidbox_resource` type also needs `resource_type`. A failed request rendered with
//! [`Response::failure`] carries only `error`.

use crate::error::ProviderError;
use crate::lifecycle::{AidboxProvider, ResourceKind};
use reconcile_framework::{
    ApplyOutcome, DeclaredState, Drift, KindAdapter, KindClient, ReconcileEngine, ReconcileError,
    ResourceIdentity,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    Plan,
    Apply,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Plan => "plan",
            Operation::Apply => "apply",
        }
    }
}

/// One dispatcher request.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    pub operation: Operation,
    /// Registry name, e.g. `aidbox_role`.
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub resource_id: Option<String>,
    /// Identity recorded by the previous apply.
    #[serde(default)]
    pub prior: Option<ResourceIdentity>,
    #[serde(default)]
    pub state: Option<Value>,
}

/// Drift verdict reported by `plan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftStatus {
    Absent,
    InSync,
    Drifted,
}

/// One dispatcher answer. Empty fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<ResourceIdentity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<ApplyOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drift: Option<DriftStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn failure(error: &ProviderError) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::default()
        }
    }
}

impl AidboxProvider {
    /// Executes `request` against the engine of its resource type.
    pub async fn dispatch(&self, request: Request) -> Result<Response, ProviderError> {
        let kind: ResourceKind = request.type_name.parse()?;
        debug!(operation = request.operation.as_str(), kind = %kind, "Dispatch");
        match kind {
            ResourceKind::User => run(self.users.engine(), kind, request).await,
            ResourceKind::Role => run(self.roles.engine(), kind, request).await,
            ResourceKind::AccessPolicy => run(self.access_policies.engine(), kind, request).await,
            ResourceKind::Resource => run(self.resources.engine(), kind, request).await,
        }
    }
}

fn target_identity(kind: ResourceKind, request: &Request) -> ResourceIdentity {
    let resource_type = request
        .resource_type
        .clone()
        .or_else(|| kind.resource_type().map(str::to_string))
        .unwrap_or_default();
    ResourceIdentity::new(resource_type, request.resource_id.clone().unwrap_or_default())
}

/// The identity an operation on an existing resource addresses: the requested id, else `prior`.
fn existing_identity(kind: ResourceKind, request: &Request) -> ResourceIdentity {
    let target = target_identity(kind, request);
    match &request.prior {
        Some(prior) if !target.is_assigned() => prior.clone(),
        _ => target,
    }
}

fn decode_state<T: DeserializeOwned>(request: &Request) -> Result<DeclaredState<T>, ProviderError> {
    let value = request.state.clone().ok_or_else(|| {
        ProviderError::request(format!(
            "{} of {} needs a state",
            request.operation.as_str(),
            request.type_name
        ))
    })?;
    serde_json::from_value(value)
        .map_err(|e| ProviderError::request(format!("invalid {} state: {e}", request.type_name)))
}

fn encode_state<T: Serialize>(state: &DeclaredState<T>) -> Result<Value, ProviderError> {
    Ok(serde_json::to_value(state).map_err(ReconcileError::from)?)
}

async fn run<K>(
    engine: &ReconcileEngine<K>,
    kind: ResourceKind,
    request: Request,
) -> Result<Response, ProviderError>
where
    K: KindAdapter,
    K::Known: Serialize + DeserializeOwned,
{
    match request.operation {
        Operation::Create => {
            let state = decode_state::<K::Known>(&request)?;
            let (identity, observed) = engine.create(target_identity(kind, &request), state).await?;
            Ok(Response {
                identity: Some(identity),
                state: Some(encode_state(&observed)?),
                ..Response::default()
            })
        }
        Operation::Read => {
            let identity = existing_identity(kind, &request);
            let state = match engine.read(&identity).await? {
                Some(observed) => Some(encode_state(&observed)?),
                None => None,
            };
            Ok(Response {
                identity: Some(identity),
                state,
                ..Response::default()
            })
        }
        Operation::Update => {
            let identity = existing_identity(kind, &request);
            let state = decode_state::<K::Known>(&request)?;
            let observed = engine.update(&identity, state).await?;
            Ok(Response {
                identity: Some(identity),
                state: Some(encode_state(&observed)?),
                ..Response::default()
            })
        }
        Operation::Delete => {
            engine.delete(&existing_identity(kind, &request)).await?;
            Ok(Response::default())
        }
        Operation::Plan => {
            let identity = existing_identity(kind, &request);
            let desired = decode_state::<K::Known>(&request)?;
            let (drift, observed) = match engine.diff(&identity, &desired).await? {
                Drift::Absent => (DriftStatus::Absent, None),
                Drift::InSync(observed) => (DriftStatus::InSync, Some(observed)),
                Drift::Drifted(observed) => (DriftStatus::Drifted, Some(observed)),
            };
            Ok(Response {
                identity: Some(identity),
                state: observed.as_ref().map(encode_state).transpose()?,
                drift: Some(drift),
                ..Response::default()
            })
        }
        Operation::Apply => {
            let state = decode_state::<K::Known>(&request)?;
            let (identity, observed, outcome) = engine
                .apply(request.prior.as_ref(), target_identity(kind, &request), state)
                .await?;
            Ok(Response {
                identity: Some(identity),
                state: Some(encode_state(&observed)?),
                outcome: Some(outcome),
                ..Response::default()
            })
        }
    }
}
