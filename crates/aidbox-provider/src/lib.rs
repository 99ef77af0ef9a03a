//! # Aidbox Provider
//!
//! Declarative management of Aidbox resources on top of [`reconcile_framework`].
//!
//! ## Core Components
//!
//! - **[model]**: Typed known fields per kind ([`UserSpec`](model::UserSpec),
//!   [`RoleSpec`](model::RoleSpec), [`AccessPolicySpec`](model::AccessPolicySpec),
//!   [`ResourcePayload`](model::ResourcePayload)).
//! - **Kinds** ([`user_kind`], [`role_kind`], [`access_policy_kind`], [`resource_kind`]): one
//!   [`KindAdapter`](reconcile_framework::KindAdapter) each, plus a factory for its client.
//! - **[clients]**: Typed create/update/apply per kind; read/delete/plan come from
//!   [`KindClient`](reconcile_framework::KindClient).
//! - **[http]**: The reqwest [`Transport`](reconcile_framework::Transport) and token exchange.
//! - **[lifecycle]**: [`AidboxProvider`](lifecycle::AidboxProvider) wiring and the
//!   [`ResourceKind`](lifecycle::ResourceKind) registry.
//! - **[shim]**: JSON request dispatcher used by the `aidbox-provider` binary.
//!
//! ## Testing
//!
//! Build the provider with [`AidboxProvider::from_transport`](lifecycle::AidboxProvider::from_transport)
//! over [`reconcile_framework::mock::MemoryStore`] to exercise everything without a server.

pub mod access_policy_kind;
pub mod clients;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod resource_kind;
pub mod role_kind;
pub mod shim;
pub mod user_kind;
