//! # User Kind
//!
//! Reconciles Aidbox `User` resources.
//!
//! ## Structure
//!
//! - [`adapter`] - [`KindAdapter`](reconcile_framework::KindAdapter) implementation for
//!   [`UserSpec`](crate::model::UserSpec)
//! - [`new()`] - Factory function that creates the engine and client
//!
//! ## Usage
//!
//! ```rust
//! use aidbox_provider::model::UserSpec;
//! use aidbox_provider::user_kind;
//! use reconcile_framework::mock::MemoryStore;
//! use reconcile_framework::DeclaredState;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = user_kind::new(Arc::new(MemoryStore::new()));
//!
//!     let state = DeclaredState::new(UserSpec::new("Ada", "Lovelace").with_password("p@ss"));
//!     let (identity, observed) = client.create_user(None, state).await?;
//!
//!     assert!(identity.id.starts_with("tf-"));
//!     assert!(!observed.extensions.contains_key("password"));
//!     Ok(())
//! }
//! ```
//!
//! ## Key Features
//!
//! - **Required name**: a missing or empty name is rejected before any request
//! - **Password suppression**: the store returns passwords hashed; they never show up as drift
//! - **Wire naming**: `given_name`/`family_name` become `givenName`/`familyName` on the wire

pub mod adapter;

pub use adapter::UserAdapter;

use crate::clients::UserClient;
use reconcile_framework::{ReconcileEngine, Transport};
use std::sync::Arc;

/// Creates a User engine on `transport` and its client.
pub fn new(transport: Arc<dyn Transport>) -> UserClient {
    UserClient::new(ReconcileEngine::new(UserAdapter, transport))
}
