//! Bridge error taxonomy and its RPC boundary representation.
//!
//! Every guarded operation fails with exactly one [`BridgeError`]. Named kinds
//! reflect bad input or a deliberate denial and are never retried; collaborator
//! failures that are none of those are carried through untouched.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::domain::types::Action;

/// Stable numeric codes surfaced across the RPC boundary
pub mod codes {
    // JSON-RPC 2.0 standard errors
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    // Bridge errors
    pub const NO_ACTIVE_SESSION: i32 = -32020;
    pub const PERMISSION_DENIED: i32 = -32021;
    pub const FORBIDDEN_CROSS_ORIGIN: i32 = -32022;
    pub const INVALID_REFERENCE: i32 = -32023;
    pub const USER_DENIED: i32 = -32024;

    // Pass-through collaborator failure
    pub const COLLABORATOR_ERROR: i32 = -32030;
}

/// Failure reported by an external collaborator (store, resolver, registry).
///
/// `kind` is the collaborator's own error name and is preserved verbatim when
/// the error crosses the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct CollaboratorError {
    pub kind: String,
    pub message: String,
}

impl CollaboratorError {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

/// Result type for collaborator calls
pub type CollaboratorResult<T> = Result<T, CollaboratorError>;

/// Failure reported by the modal presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModalError {
    /// Generic failure: closed window, dismissed prompt, anything unnamed
    #[error("modal dismissed: {0}")]
    Dismissed(String),

    /// The presenter found no user session bound to the caller
    #[error("no active user session")]
    NoActiveSession,

    /// A narrowly typed failure that must reach the caller unchanged
    #[error("{name}: {message}")]
    Specific { name: String, message: String },
}

/// Bridge errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// Malformed caller input, raised before any collaborator is touched
    #[error("{0}")]
    Validation(String),

    /// Session-bound operation called without an authenticated user
    #[error("No active user session")]
    NoActiveSession,

    /// Capability grant missing or lacking the requested action
    #[error("Permission denied: {origin} may not {action} {capability}")]
    PermissionDenied {
        origin: String,
        capability: String,
        action: Action,
    },

    /// Target resolves into a namespace the session does not own
    #[error("Cannot mutate resources on a different owner's namespace")]
    ForbiddenCrossOrigin,

    /// Reference could not be resolved to an owner key and path
    #[error("Invalid resource reference: {0}")]
    InvalidReference(String),

    /// Interactive consent declined, or the dialog produced no usable result
    #[error("User denied permission")]
    UserDenied,

    /// Unexpected collaborator failure, propagated unchanged
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

impl BridgeError {
    pub fn validation(message: impl Into<String>) -> Self {
        BridgeError::Validation(message.into())
    }

    /// Stable error name exposed to callers
    pub fn name(&self) -> &str {
        match self {
            BridgeError::Validation(_) => "ValidationError",
            BridgeError::NoActiveSession => "NoActiveSessionError",
            BridgeError::PermissionDenied { .. } => "PermissionsError",
            BridgeError::ForbiddenCrossOrigin => "ForbiddenCrossOriginError",
            BridgeError::InvalidReference(_) => "InvalidReferenceError",
            BridgeError::UserDenied => "UserDeniedError",
            BridgeError::Collaborator(e) => &e.kind,
        }
    }

    /// RPC error code for this error
    pub fn code(&self) -> i32 {
        match self {
            BridgeError::Validation(_) => codes::INVALID_PARAMS,
            BridgeError::NoActiveSession => codes::NO_ACTIVE_SESSION,
            BridgeError::PermissionDenied { .. } => codes::PERMISSION_DENIED,
            BridgeError::ForbiddenCrossOrigin => codes::FORBIDDEN_CROSS_ORIGIN,
            BridgeError::InvalidReference(_) => codes::INVALID_REFERENCE,
            BridgeError::UserDenied => codes::USER_DENIED,
            BridgeError::Collaborator(_) => codes::COLLABORATOR_ERROR,
        }
    }

    /// True for failures that reflect a deliberate refusal rather than bad input
    pub fn is_denial(&self) -> bool {
        matches!(
            self,
            BridgeError::PermissionDenied { .. }
                | BridgeError::ForbiddenCrossOrigin
                | BridgeError::UserDenied
        )
    }
}

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Error as it crosses the RPC boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    /// Numeric error code
    pub code: i32,
    /// Error name callers match on
    pub name: String,
    /// Human-readable message
    pub message: String,
}

impl RpcError {
    pub fn new(code: i32, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            name: name.into(),
            message: message.into(),
        }
    }

    /// Method not found
    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            codes::METHOD_NOT_FOUND,
            "MethodNotFoundError",
            format!("Method not found: {}", method),
        )
    }

    /// Failed to encode a successful result
    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(
            codes::INTERNAL_ERROR,
            "InternalError",
            format!("Internal error: {}", details.into()),
        )
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.name, self.message)
    }
}

impl std::error::Error for RpcError {}

impl From<BridgeError> for RpcError {
    fn from(e: BridgeError) -> Self {
        let message = match &e {
            BridgeError::Collaborator(inner) => inner.message.clone(),
            other => other.to_string(),
        };
        RpcError::new(e.code(), e.name(), message)
    }
}
