//! Interactive dialog bridge.
//!
//! Wraps a user-facing modal as one awaitable step. Either the user confirms
//! and the expected field is present in the modal's answer, or the call fails
//! with `UserDenied`. Nothing is written on either path, so a cancelled dialog
//! leaves no trace in the permission or content stores.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::config::DialogsConfig;
use crate::domain::error::{BridgeError, BridgeResult, CollaboratorError, ModalError};
use crate::domain::options::{SaveFileOptions, SelectFileOptions, SelectResourceOptions};
use crate::domain::types::CallerContext;
use crate::ports::outbound::{ModalPresenter, SessionResolver};

/// Closed set of dialog variants, each with its own options
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogRequest {
    SelectFile(SelectFileOptions),
    SaveFile(SaveFileOptions),
    SelectResource(SelectResourceOptions),
}

impl DialogRequest {
    /// Field the modal's answer must carry
    fn expected_field(&self) -> &'static str {
        match self {
            DialogRequest::SelectFile(_) => "paths",
            DialogRequest::SaveFile(_) => "path",
            DialogRequest::SelectResource(_) => "url",
        }
    }
}

/// What the user confirmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserResult {
    Paths(Vec<String>),
    Path(String),
    Url(String),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveModalOptions<'a> {
    #[serde(flatten)]
    opts: &'a SaveFileOptions,
    save_mode: bool,
}

fn encode<T: Serialize>(opts: &T) -> BridgeResult<Value> {
    serde_json::to_value(opts)
        .map_err(|e| CollaboratorError::new("SerializationError", e.to_string()).into())
}

/// Presents dialogs and normalizes their outcome
#[derive(Clone)]
pub struct InteractiveDialogBridge {
    presenter: Arc<dyn ModalPresenter>,
    sessions: Arc<dyn SessionResolver>,
    config: DialogsConfig,
}

impl InteractiveDialogBridge {
    pub fn new(
        presenter: Arc<dyn ModalPresenter>,
        sessions: Arc<dyn SessionResolver>,
        config: DialogsConfig,
    ) -> Self {
        Self {
            presenter,
            sessions,
            config,
        }
    }

    /// Show the dialog and wait for the user.
    ///
    /// File dialogs need an active session and browse the session's own
    /// archive unless the options name another one.
    pub async fn present(
        &self,
        caller: &CallerContext,
        request: DialogRequest,
    ) -> BridgeResult<UserResult> {
        let (modal, options) = match &request {
            DialogRequest::SelectFile(opts) => {
                let mut opts = opts.clone();
                opts.archive = Some(self.default_archive(caller, opts.archive.take()).await?);
                (self.config.select_file_modal.as_str(), encode(&opts)?)
            }
            DialogRequest::SaveFile(opts) => {
                let mut opts = opts.clone();
                opts.archive = Some(self.default_archive(caller, opts.archive.take()).await?);
                let modal_opts = SaveModalOptions {
                    opts: &opts,
                    save_mode: true,
                };
                (self.config.select_file_modal.as_str(), encode(&modal_opts)?)
            }
            DialogRequest::SelectResource(opts) => {
                (self.config.select_resource_modal.as_str(), encode(opts)?)
            }
        };

        debug!(modal, sender = %caller.sender(), "Presenting dialog");
        let answer = match self.presenter.show_modal(caller, modal, options).await {
            Ok(answer) => answer,
            Err(ModalError::NoActiveSession) => return Err(BridgeError::NoActiveSession),
            Err(ModalError::Specific { name, message }) => {
                warn!(modal, error = %name, "Dialog failed");
                return Err(CollaboratorError::new(name, message).into());
            }
            Err(ModalError::Dismissed(reason)) => {
                debug!(modal, reason = %reason, "Dialog dismissed");
                None
            }
        };

        let field = request.expected_field();
        let result = answer
            .as_ref()
            .and_then(|v| v.get(field))
            .and_then(|v| Self::extract(&request, v));

        match result {
            Some(result) => Ok(result),
            None => {
                debug!(modal, field, "Dialog returned no usable result");
                Err(BridgeError::UserDenied)
            }
        }
    }

    async fn default_archive(
        &self,
        caller: &CallerContext,
        archive: Option<String>,
    ) -> BridgeResult<String> {
        let session = self
            .sessions
            .session_for(caller)
            .await?
            .ok_or(BridgeError::NoActiveSession)?;
        Ok(archive
            .filter(|a| !a.is_empty())
            .unwrap_or(session.primary_resource_url))
    }

    fn extract(request: &DialogRequest, value: &Value) -> Option<UserResult> {
        let non_empty = |v: &Value| v.as_str().filter(|s| !s.is_empty()).map(str::to_string);
        match request {
            DialogRequest::SelectFile(_) => value
                .as_array()?
                .iter()
                .map(|p| p.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(UserResult::Paths),
            DialogRequest::SaveFile(_) => non_empty(value).map(UserResult::Path),
            DialogRequest::SelectResource(_) => non_empty(value).map(UserResult::Url),
        }
    }
}
