//! Guarded method table.
//!
//! Dialog methods are authorized by the user's consent in the dialog itself.
//! Query and mutation methods are authorized against a capability grant.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::domain::types::Action;

pub const SELECT_FILE_DIALOG: &str = "selectFileDialog";
pub const SAVE_FILE_DIALOG: &str = "saveFileDialog";
pub const SELECT_RESOURCE_DIALOG: &str = "selectResourceDialog";
pub const GET_APPLICATION_STATE: &str = "getApplicationState";
pub const STATUSES_LIST: &str = "statuses.list";
pub const STATUSES_GET: &str = "statuses.get";
pub const STATUSES_ADD: &str = "statuses.add";
pub const STATUSES_EDIT: &str = "statuses.edit";
pub const STATUSES_REMOVE: &str = "statuses.remove";

/// How a method is authorized and what it touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    /// Interactive consent; the dialog is the authorization
    Dialog,
    /// Read-only, no capability gate
    Query,
    /// Capability-gated read
    GuardedRead,
    /// Capability-gated write, ownership-verified when it names a target
    GuardedWrite,
}

/// Method metadata
#[derive(Debug, Clone)]
pub struct MethodInfo {
    /// Full method name (e.g., "statuses.add")
    pub name: &'static str,
    pub kind: MethodKind,
    /// Requires an active user session
    pub needs_session: bool,
    /// Verifies the caller owns the target before mutating
    pub verifies_ownership: bool,
    pub description: &'static str,
}

impl MethodInfo {
    const fn new(
        name: &'static str,
        kind: MethodKind,
        needs_session: bool,
        verifies_ownership: bool,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            needs_session,
            verifies_ownership,
            description,
        }
    }

    /// Action checked against the capability grant, if gated
    pub const fn required_action(&self) -> Option<Action> {
        match self.kind {
            MethodKind::GuardedRead => Some(Action::Read),
            MethodKind::GuardedWrite => Some(Action::Write),
            MethodKind::Dialog | MethodKind::Query => None,
        }
    }

    pub const fn is_write(&self) -> bool {
        matches!(self.kind, MethodKind::GuardedWrite)
    }
}

/// Method registry - all supported methods with metadata
pub static METHOD_REGISTRY: LazyLock<HashMap<&'static str, MethodInfo>> = LazyLock::new(|| {
    let methods = [
        // --- Dialogs ---
        MethodInfo::new(
            SELECT_FILE_DIALOG,
            MethodKind::Dialog,
            true,
            false,
            "Ask the user to pick one or more files",
        ),
        MethodInfo::new(
            SAVE_FILE_DIALOG,
            MethodKind::Dialog,
            true,
            false,
            "Ask the user where to save a file",
        ),
        MethodInfo::new(
            SELECT_RESOURCE_DIALOG,
            MethodKind::Dialog,
            false,
            false,
            "Ask the user to pick an archive",
        ),
        // --- Application ---
        MethodInfo::new(
            GET_APPLICATION_STATE,
            MethodKind::Query,
            true,
            false,
            "Installation and permission state of the calling app",
        ),
        // --- Statuses ---
        MethodInfo::new(
            STATUSES_LIST,
            MethodKind::GuardedRead,
            false,
            false,
            "Query statuses",
        ),
        MethodInfo::new(
            STATUSES_GET,
            MethodKind::GuardedRead,
            false,
            false,
            "Fetch one status",
        ),
        MethodInfo::new(
            STATUSES_ADD,
            MethodKind::GuardedWrite,
            true,
            false,
            "Publish a status in the session's archive",
        ),
        MethodInfo::new(
            STATUSES_EDIT,
            MethodKind::GuardedWrite,
            true,
            true,
            "Edit a status the session owns",
        ),
        MethodInfo::new(
            STATUSES_REMOVE,
            MethodKind::GuardedWrite,
            true,
            true,
            "Delete a status the session owns",
        ),
    ];
    methods.into_iter().map(|m| (m.name, m)).collect()
});

/// Get method info
pub fn get_method_info(method: &str) -> Option<&'static MethodInfo> {
    METHOD_REGISTRY.get(method)
}

/// Check if method is supported
pub fn is_method_supported(method: &str) -> bool {
    METHOD_REGISTRY.contains_key(method)
}

/// All methods of one kind
pub fn get_methods_by_kind(kind: MethodKind) -> Vec<&'static str> {
    let mut names: Vec<_> = METHOD_REGISTRY
        .values()
        .filter(|m| m.kind == kind)
        .map(|m| m.name)
        .collect();
    names.sort_unstable();
    names
}
