//! Driven Ports (SPI - Outbound Dependencies)
//!
//! Everything the bridge needs from the host. The bridge never persists,
//! caches, or locks on behalf of these collaborators; ordering and
//! last-writer-wins semantics per path belong to the implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::error::{CollaboratorResult, ModalError};
use crate::domain::options::{ListStatusesQuery, StatusPatch};
use crate::domain::records::{
    ArchiveInfo, InstalledApplication, PermissionMap, StoredStatus,
};
use crate::domain::types::{CallerContext, CapabilityGrant, Session};

/// DNS-style name resolution
///
/// Maps a hostname (alias or raw key) to the canonical owner key. Used for
/// every identity comparison; raw hostnames are never compared.
#[async_trait]
pub trait NameResolver: Send + Sync {
    async fn resolve_name(&self, hostname: &str) -> CollaboratorResult<String>;
}

/// Capability grant store
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// Grant held by `origin` under `capability_id`, if any
    async fn get_grant(
        &self,
        origin: &str,
        capability_id: &str,
    ) -> CollaboratorResult<Option<CapabilityGrant>>;

    /// Capabilities granted to an application, in the store's order
    async fn get_app_permissions(&self, url: &str) -> CollaboratorResult<PermissionMap>;

    /// Human-readable description of one granted capability
    fn describe_perm(&self, id: &str, caps: &[String]) -> String;
}

/// Session lookup for a caller
#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// `None` when no user session is bound to the caller
    async fn session_for(&self, caller: &CallerContext) -> CollaboratorResult<Option<Session>>;
}

/// A status ready to be written, defaults applied
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDraft {
    pub body: String,
    pub visibility: String,
}

/// Content store over path-addressed records in owned archives
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn list_statuses(&self, query: &ListStatusesQuery)
        -> CollaboratorResult<Vec<StoredStatus>>;

    async fn get_status(&self, url: &str) -> CollaboratorResult<Option<StoredStatus>>;

    /// Write a new status into `archive_url`; returns the new record's url
    async fn add_status(&self, archive_url: &str, draft: &StatusDraft)
        -> CollaboratorResult<String>;

    async fn edit_status(
        &self,
        archive_url: &str,
        path: &str,
        patch: &StatusPatch,
    ) -> CollaboratorResult<()>;

    async fn remove_status(&self, archive_url: &str, path: &str) -> CollaboratorResult<()>;

    async fn get_archive_info(&self, url: &str) -> CollaboratorResult<ArchiveInfo>;
}

/// Installed-applications registry of the user profile
#[async_trait]
pub trait ApplicationRegistry: Send + Sync {
    async fn get_installed_application(
        &self,
        user_id: i64,
        url: &str,
    ) -> CollaboratorResult<Option<InstalledApplication>>;
}

/// UI modal subsystem
///
/// Suspends until the user confirms or cancels. `Ok(None)` is a cancel.
#[async_trait]
pub trait ModalPresenter: Send + Sync {
    async fn show_modal(
        &self,
        caller: &CallerContext,
        modal: &str,
        options: Value,
    ) -> Result<Option<Value>, ModalError>;
}
