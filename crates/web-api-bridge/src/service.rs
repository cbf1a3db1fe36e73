//! Web API bridge service - orchestration of every guarded entry point.
//!
//! Each call walks the same gated sequence and stops at the first failure:
//!
//! ```text
//! validate ─→ session ─→ authorize ─→ verify ownership ─→ apply ─→ shape
//!                          (gate)       (mutations on a
//!                                        caller-named target)
//! ```
//!
//! Dialogs replace the gate with the user's consent. No step runs before its
//! predecessor has completed, and no state is kept between calls.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::dialogs::{DialogRequest, InteractiveDialogBridge, UserResult};
use crate::domain::config::BridgeConfig;
use crate::domain::error::{BridgeError, BridgeResult, CollaboratorError};
use crate::domain::options::{
    ListStatusesQuery, NewStatus, SaveFileOptions, SelectFileOptions, SelectResourceOptions,
    StatusPatch,
};
use crate::domain::records::{ApplicationState, StatusRecord};
use crate::domain::shaper;
use crate::domain::types::{Action, CallerContext, Session};
use crate::gate::AuthorizationGate;
use crate::ownership::OwnershipVerifier;
use crate::ports::inbound::{ApplicationApi, DialogApi, StatusesApi};
use crate::ports::outbound::{
    ApplicationRegistry, ContentStore, ModalPresenter, NameResolver, PermissionStore,
    SessionResolver, StatusDraft,
};

/// Every external collaborator the bridge talks to
#[derive(Clone)]
pub struct Collaborators {
    pub names: Arc<dyn NameResolver>,
    pub permissions: Arc<dyn PermissionStore>,
    pub sessions: Arc<dyn SessionResolver>,
    pub content: Arc<dyn ContentStore>,
    pub applications: Arc<dyn ApplicationRegistry>,
    pub modals: Arc<dyn ModalPresenter>,
}

/// `archive` + `path` with exactly one separator
pub fn join_archive_path(archive: &str, path: &str) -> String {
    format!(
        "{}/{}",
        archive.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Bridge service implementation
pub struct WebApiService {
    config: BridgeConfig,
    gate: AuthorizationGate,
    ownership: OwnershipVerifier,
    dialogs: InteractiveDialogBridge,
    permissions: Arc<dyn PermissionStore>,
    sessions: Arc<dyn SessionResolver>,
    content: Arc<dyn ContentStore>,
    applications: Arc<dyn ApplicationRegistry>,
}

impl WebApiService {
    pub fn new(config: BridgeConfig, collaborators: Collaborators) -> Self {
        info!(
            statuses_capability = %config.capabilities.statuses,
            "Creating web API bridge"
        );
        Self {
            gate: AuthorizationGate::new(collaborators.permissions.clone()),
            ownership: OwnershipVerifier::new(collaborators.names),
            dialogs: InteractiveDialogBridge::new(
                collaborators.modals,
                collaborators.sessions.clone(),
                config.dialogs.clone(),
            ),
            permissions: collaborators.permissions,
            sessions: collaborators.sessions,
            content: collaborators.content,
            applications: collaborators.applications,
            config,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    async fn require_session(&self, caller: &CallerContext) -> BridgeResult<Session> {
        self.sessions
            .session_for(caller)
            .await?
            .ok_or(BridgeError::NoActiveSession)
    }

    async fn authorize(&self, caller: &CallerContext, action: Action) -> BridgeResult<()> {
        self.gate
            .assert_can(caller, &self.config.capabilities.statuses, action)
            .await
    }

    /// Re-read a record that was just written and shape it
    async fn refetch(&self, url: &str) -> BridgeResult<StatusRecord> {
        let stored = self.content.get_status(url).await?;
        shaper::shape_status(stored.as_ref()).ok_or_else(|| {
            CollaboratorError::new(
                "NotFoundError",
                format!("status {} missing after write", url),
            )
            .into()
        })
    }

    fn require_url(url: &str) -> BridgeResult<()> {
        if url.is_empty() {
            return Err(BridgeError::validation(
                "The `url` parameter must be a valid URL",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl DialogApi for WebApiService {
    #[instrument(skip(self, caller, opts), fields(origin = %caller.origin()))]
    async fn select_file(
        &self,
        caller: &CallerContext,
        opts: SelectFileOptions,
    ) -> BridgeResult<Vec<String>> {
        match self
            .dialogs
            .present(caller, DialogRequest::SelectFile(opts))
            .await?
        {
            UserResult::Paths(paths) => Ok(paths),
            _ => Err(BridgeError::UserDenied),
        }
    }

    #[instrument(skip(self, caller, opts), fields(origin = %caller.origin()))]
    async fn save_file(
        &self,
        caller: &CallerContext,
        opts: SaveFileOptions,
    ) -> BridgeResult<String> {
        match self
            .dialogs
            .present(caller, DialogRequest::SaveFile(opts))
            .await?
        {
            UserResult::Path(path) => Ok(path),
            _ => Err(BridgeError::UserDenied),
        }
    }

    #[instrument(skip(self, caller, opts), fields(origin = %caller.origin()))]
    async fn select_resource(
        &self,
        caller: &CallerContext,
        opts: SelectResourceOptions,
    ) -> BridgeResult<String> {
        match self
            .dialogs
            .present(caller, DialogRequest::SelectResource(opts))
            .await?
        {
            UserResult::Url(url) => Ok(url),
            _ => Err(BridgeError::UserDenied),
        }
    }
}

#[async_trait]
impl ApplicationApi for WebApiService {
    #[instrument(skip(self, caller), fields(origin = %caller.origin()))]
    async fn get_application_state(
        &self,
        caller: &CallerContext,
    ) -> BridgeResult<ApplicationState> {
        let url = self.ownership.canonical_origin(caller.origin()).await?;
        let session = self.require_session(caller).await?;

        let info = self.content.get_archive_info(&url).await?;
        let installation = self
            .applications
            .get_installed_application(session.user_id, &url)
            .await?;
        let permissions = self.permissions.get_app_permissions(&url).await?;

        debug!(url = %url, installed = installation.is_some(), "Shaping application state");
        Ok(shaper::shape_application(
            &url,
            &info,
            installation.as_ref(),
            &permissions,
            |id, caps| self.permissions.describe_perm(id, caps),
        ))
    }
}

#[async_trait]
impl StatusesApi for WebApiService {
    #[instrument(skip(self, caller), fields(origin = %caller.origin()))]
    async fn list(
        &self,
        caller: &CallerContext,
        query: ListStatusesQuery,
    ) -> BridgeResult<Vec<StatusRecord>> {
        self.authorize(caller, Action::Read).await?;

        let stored = self.content.list_statuses(&query).await?;
        Ok(stored
            .iter()
            .filter_map(|s| shaper::shape_status(Some(s)))
            .collect())
    }

    #[instrument(skip(self, caller), fields(origin = %caller.origin()))]
    async fn get(&self, caller: &CallerContext, url: &str) -> BridgeResult<Option<StatusRecord>> {
        Self::require_url(url)?;
        self.authorize(caller, Action::Read).await?;

        let stored = self.content.get_status(url).await?;
        Ok(shaper::shape_status(stored.as_ref()))
    }

    #[instrument(skip(self, caller, status), fields(origin = %caller.origin()))]
    async fn add(&self, caller: &CallerContext, status: NewStatus) -> BridgeResult<StatusRecord> {
        status.validate()?;
        self.authorize(caller, Action::Write).await?;
        let session = self.require_session(caller).await?;

        let draft = StatusDraft {
            body: status.body,
            visibility: status
                .visibility
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| self.config.statuses.default_visibility.clone()),
        };

        let url = self
            .content
            .add_status(&session.primary_resource_url, &draft)
            .await?;
        debug!(url = %url, visibility = %draft.visibility, "Status added");
        self.refetch(&url).await
    }

    #[instrument(skip(self, caller, patch), fields(origin = %caller.origin()))]
    async fn edit(
        &self,
        caller: &CallerContext,
        url: &str,
        patch: StatusPatch,
    ) -> BridgeResult<StatusRecord> {
        Self::require_url(url)?;
        self.authorize(caller, Action::Write).await?;
        let session = self.require_session(caller).await?;

        let path = self.ownership.verify_owned(url, &session).await?;
        self.content
            .edit_status(&session.primary_resource_url, &path, &patch)
            .await?;
        debug!(path = %path, "Status edited");

        self.refetch(&join_archive_path(&session.primary_resource_url, &path))
            .await
    }

    #[instrument(skip(self, caller), fields(origin = %caller.origin()))]
    async fn remove(&self, caller: &CallerContext, url: &str) -> BridgeResult<()> {
        Self::require_url(url)?;
        self.authorize(caller, Action::Write).await?;
        let session = self.require_session(caller).await?;

        let path = self.ownership.verify_owned(url, &session).await?;
        self.content
            .remove_status(&session.primary_resource_url, &path)
            .await?;
        debug!(path = %path, "Status removed");
        Ok(())
    }
}
