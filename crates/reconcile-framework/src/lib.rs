//! # Reconcile Framework
//!
//! This crate provides the kind-agnostic core for reconciling declaratively specified resources
//! against a remote document store that exposes only PUT (create-or-replace), GET and DELETE on
//! `{kind}/{id}`.
//!
//! ## Architecture Overview
//!
//! The framework separates concerns into four layers:
//!
//! 1. **Document Layer** ([`document`], [`partition`]) - identities, wire documents, declared
//!    state, and the split between known fields and string extensions
//! 2. **Kind Layer** ([`KindAdapter`]) - per-kind projection between declared state and documents
//! 3. **Engine Layer** ([`ReconcileEngine`]) - the create/read/update/delete lifecycle, identity
//!    assignment, read-after-write and drift detection
//! 4. **Transport Layer** ([`Transport`]) - the three remote operations, supplied by the caller
//!
//! You describe a kind **once** in its adapter; the engine handles identity generation,
//! server-field stripping, extension validation and the lifecycle.
//!
//! ## Lifecycle
//!
//! ```text
//! Absent ──create──▶ Present ──update──▶ Present ──delete──▶ Absent
//!                       └── read finds nothing ──▶ Absent
//! ```
//!
//! - `create` generates `tf-<opaque>` when no id is given, writes, then reads back.
//! - `read` returns `None` for a missing resource; that is not an error.
//! - `update` is a full replacement followed by a read-back.
//! - `delete` succeeds when the resource is already gone.
//!
//! ## Example
//!
//! ```rust
//! use reconcile_framework::kind::{assemble_document, from_fragment, split_read_back, to_fragment};
//! use reconcile_framework::mock::MemoryStore;
//! use reconcile_framework::{
//!     DeclaredState, Document, KindAdapter, ReconcileEngine, ReconcileError, ResourceIdentity,
//! };
//! use serde::{Deserialize, Serialize};
//! use std::sync::Arc;
//!
//! #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
//! struct Team { name: String }
//!
//! struct TeamAdapter;
//!
//! impl KindAdapter for TeamAdapter {
//!     type Known = Team;
//!     fn resource_type(&self) -> Option<&str> { Some("Team") }
//!     fn known_keys(&self) -> &[&'static str] { &["name"] }
//!     fn build_document(
//!         &self,
//!         identity: &ResourceIdentity,
//!         state: &DeclaredState<Team>,
//!     ) -> Result<Document, ReconcileError> {
//!         Ok(assemble_document(identity, to_fragment(&state.known)?, &state.extensions))
//!     }
//!     fn extract_state(&self, document: Document) -> Result<DeclaredState<Team>, ReconcileError> {
//!         let (parts, meta) = split_read_back(document, self.known_keys());
//!         let mut known = parts.known;
//!         known.retain(|key, _| self.known_keys().contains(&key.as_str()));
//!         Ok(DeclaredState { known: from_fragment(known)?, extensions: parts.extensions, meta })
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let engine = ReconcileEngine::new(TeamAdapter, Arc::new(MemoryStore::new()));
//!
//!     let state = DeclaredState::new(Team { name: "ops".into() }).with_extension("size", "3");
//!     let (identity, observed) = engine
//!         .create(ResourceIdentity::unassigned("Team"), state)
//!         .await
//!         .unwrap();
//!
//!     assert!(identity.id.starts_with("tf-"));
//!     assert_eq!(observed.known.name, "ops");
//!     assert_eq!(observed.extensions["size"], "3");
//!     assert!(observed.meta.is_some());
//!
//!     engine.delete(&identity).await.unwrap();
//!     engine.delete(&identity).await.unwrap(); // idempotent
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - Operations are `async` and run to completion before returning
//! - The engine holds no mutable state; it is `Send + Sync` and can be shared across tasks
//! - Operations on the same identity are not coordinated (last write wins)
//! - No background tasks, no retries
//!
//! ## Testing
//!
//! The [`mock`] module provides [`MemoryStore`](mock::MemoryStore), a stateful in-memory store,
//! and [`MockTransport`](mock::MockTransport), a scripted transport with a fluent expectation
//! API.

pub mod client_trait;
pub mod document;
pub mod engine;
pub mod error;
pub mod kind;
pub mod mock;
pub mod partition;
pub mod tracing;
pub mod transport;

// Re-export core types for convenience
pub use client_trait::KindClient;
pub use document::{DeclaredState, Document, Extensions, Meta, ResourceIdentity};
pub use engine::{requires_replacement, ApplyOutcome, Drift, ReconcileEngine};
pub use error::{ReconcileError, TransportError};
pub use kind::KindAdapter;
pub use transport::Transport;
