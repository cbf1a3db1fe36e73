#![allow(missing_docs)]

//! Web API Bridge - capability-scoped RPC surface for sandboxed applications.
//!
//! Untrusted application code calls in by method name with positional
//! arguments. The bridge validates, resolves the session, authorizes, verifies
//! ownership, delegates to a collaborator, and shapes what comes back.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           WEB API BRIDGE                                 │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  ┌───────────────────────────────────────────────┐                      │
//! │  │              RpcDispatcher                     │                      │
//! │  │  method table → option validation              │                      │
//! │  └────────────────────┬──────────────────────────┘                      │
//! │                       │                                                  │
//! │  ┌────────────────────┴──────────────────────────┐                      │
//! │  │              WebApiService                     │                      │
//! │  │  AuthorizationGate → OwnershipVerifier         │                      │
//! │  │  InteractiveDialogBridge → shaper              │                      │
//! │  └────────────────────┬──────────────────────────┘                      │
//! └───────────────────────┼─────────────────────────────────────────────────┘
//!                         │  driven ports
//!     ┌──────────┬────────┼─────────┬──────────────┬────────────┐
//!     ▼          ▼        ▼         ▼              ▼            ▼
//! NameResolver Perms  Sessions  ContentStore  AppRegistry  ModalPresenter
//! ```
//!
//! # Method Kinds
//!
//! - **Dialog**: the user's choice in the modal is the authorization
//! - **Query**: `getApplicationState`, session required, no capability gate
//! - **GuardedRead / GuardedWrite**: the `statuses.*` family, gated on the
//!   statuses capability; writes naming a target are ownership-verified
//!
//! # Usage
//!
//! ```ignore
//! use web_api_bridge::{BridgeConfig, Collaborators, RpcDispatcher, WebApiService};
//!
//! let service = WebApiService::new(BridgeConfig::from_env()?, collaborators);
//! let rpc = RpcDispatcher::new(Arc::new(service));
//! let added = rpc.call(&caller, "statuses.add", vec![json!("hello")]).await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod dialogs;
pub mod domain;
pub mod gate;
pub mod ownership;
pub mod ports;
pub mod rpc;
pub mod service;

// Re-exports
pub use dialogs::{DialogRequest, InteractiveDialogBridge, UserResult};
pub use domain::*;
pub use gate::{origin_of, AuthorizationGate};
pub use ownership::{OwnershipVerifier, ResourceReference};
pub use ports::*;
pub use rpc::RpcDispatcher;
pub use service::{join_archive_path, Collaborators, WebApiService};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
