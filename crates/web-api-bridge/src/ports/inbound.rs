//! Driving Ports (API - Inbound)

use async_trait::async_trait;

use crate::domain::error::BridgeResult;
use crate::domain::options::{
    ListStatusesQuery, NewStatus, SaveFileOptions, SelectFileOptions, SelectResourceOptions,
    StatusPatch,
};
use crate::domain::records::{ApplicationState, StatusRecord};
use crate::domain::types::CallerContext;

/// Interactive dialogs. The user's confirmation is the authorization.
#[async_trait]
pub trait DialogApi: Send + Sync {
    /// Paths the user picked
    async fn select_file(
        &self,
        caller: &CallerContext,
        opts: SelectFileOptions,
    ) -> BridgeResult<Vec<String>>;

    /// Path the user chose to save at
    async fn save_file(&self, caller: &CallerContext, opts: SaveFileOptions)
        -> BridgeResult<String>;

    /// Url of the archive the user picked
    async fn select_resource(
        &self,
        caller: &CallerContext,
        opts: SelectResourceOptions,
    ) -> BridgeResult<String>;
}

/// State of the calling application
#[async_trait]
pub trait ApplicationApi: Send + Sync {
    async fn get_application_state(&self, caller: &CallerContext)
        -> BridgeResult<ApplicationState>;
}

/// Capability-gated CRUD over statuses
#[async_trait]
pub trait StatusesApi: Send + Sync {
    async fn list(
        &self,
        caller: &CallerContext,
        query: ListStatusesQuery,
    ) -> BridgeResult<Vec<StatusRecord>>;

    /// `None` when no status lives at `url`
    async fn get(&self, caller: &CallerContext, url: &str) -> BridgeResult<Option<StatusRecord>>;

    async fn add(&self, caller: &CallerContext, status: NewStatus) -> BridgeResult<StatusRecord>;

    /// `url` may be absolute or a path inside the session's archive
    async fn edit(
        &self,
        caller: &CallerContext,
        url: &str,
        patch: StatusPatch,
    ) -> BridgeResult<StatusRecord>;

    async fn remove(&self, caller: &CallerContext, url: &str) -> BridgeResult<()>;
}
