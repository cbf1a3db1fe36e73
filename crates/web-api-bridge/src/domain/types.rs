//! Core types shared by the guarded operations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// Capability id guarding the statuses family
pub const STATUSES_CAPABILITY: &str = "unwalled.garden/api/statuses";

/// Opaque handle of the transport channel a call arrived on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SenderId(pub Uuid);

impl SenderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SenderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of the invoking side, immutable for the duration of one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    origin: String,
    sender: SenderId,
}

impl CallerContext {
    pub fn new(origin: impl Into<String>, sender: SenderId) -> Self {
        Self {
            origin: origin.into(),
            sender,
        }
    }

    /// Caller page URL or origin as reported by the transport
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn sender(&self) -> SenderId {
        self.sender
    }
}

/// Active user session bound to a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: i64,
    /// The resource (archive) the session owns
    pub primary_resource_url: String,
}

/// Action a capability grant may allow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Read,
    Write,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Read => write!(f, "read"),
            Action::Write => write!(f, "write"),
        }
    }
}

/// Stored permission allowing an origin to act under a named capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityGrant {
    pub origin: String,
    pub capability_id: String,
    pub allowed_actions: BTreeSet<Action>,
}

impl CapabilityGrant {
    pub fn new(
        origin: impl Into<String>,
        capability_id: impl Into<String>,
        actions: impl IntoIterator<Item = Action>,
    ) -> Self {
        Self {
            origin: origin.into(),
            capability_id: capability_id.into(),
            allowed_actions: actions.into_iter().collect(),
        }
    }

    pub fn allows(&self, action: Action) -> bool {
        self.allowed_actions.contains(&action)
    }
}
