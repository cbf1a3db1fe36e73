//! In-memory adapters for every driven port.
//!
//! Backed by `parking_lot` locks; each store counts the calls made against it
//! so callers can assert that a rejected request never reached storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use tracing::debug;

use crate::domain::error::{CollaboratorError, CollaboratorResult, ModalError};
use crate::domain::options::{ListStatusesQuery, StatusPatch};
use crate::domain::records::{
    ArchiveInfo, InstalledApplication, PermissionMap, StoredAuthor, StoredStatus, StoredTimestamp,
};
use crate::domain::types::{CallerContext, CapabilityGrant, SenderId, Session};
use crate::ports::outbound::{
    ApplicationRegistry, ContentStore, ModalPresenter, NameResolver, PermissionStore,
    SessionResolver, StatusDraft,
};
use crate::service::join_archive_path;

const STATUSES_FOLDER: &str = "/.data/statuses";

fn not_found(what: impl std::fmt::Display) -> CollaboratorError {
    CollaboratorError::new("NotFoundError", format!("{} not found", what))
}

// =============================================================================
// NAMES
// =============================================================================

/// Alias table; names without an alias are already canonical keys
#[derive(Default)]
pub struct StaticNameResolver {
    aliases: RwLock<HashMap<String, String>>,
}

impl StaticNameResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alias(self, hostname: impl Into<String>, key: impl Into<String>) -> Self {
        self.aliases.write().insert(hostname.into(), key.into());
        self
    }

    /// Point an existing alias somewhere else
    pub fn set_alias(&self, hostname: impl Into<String>, key: impl Into<String>) {
        self.aliases.write().insert(hostname.into(), key.into());
    }
}

#[async_trait]
impl NameResolver for StaticNameResolver {
    async fn resolve_name(&self, hostname: &str) -> CollaboratorResult<String> {
        Ok(self
            .aliases
            .read()
            .get(hostname)
            .cloned()
            .unwrap_or_else(|| hostname.to_string()))
    }
}

// =============================================================================
// PERMISSIONS
// =============================================================================

/// Human-readable label for a known capability id
pub fn describe_capability(id: &str, caps: &[String]) -> String {
    let subject = match id {
        "unwalled.garden/api/statuses" => "your status feed",
        "unwalled.garden/api/follows" => "the users you follow",
        "unwalled.garden/api/bookmarks" => "your bookmarks",
        "unwalled.garden/api/comments" => "your comments",
        other => other,
    };
    let writes = caps.iter().any(|c| c == "write");
    if writes {
        format!("Read and write {}", subject)
    } else {
        format!("Read {}", subject)
    }
}

#[derive(Default)]
pub struct InMemoryPermissionStore {
    grants: RwLock<Vec<CapabilityGrant>>,
    app_permissions: RwLock<HashMap<String, PermissionMap>>,
    queries: AtomicUsize,
}

impl InMemoryPermissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a grant, replacing any earlier one for the same origin and capability
    pub fn grant(&self, grant: CapabilityGrant) {
        let mut grants = self.grants.write();
        grants.retain(|g| !(g.origin == grant.origin && g.capability_id == grant.capability_id));
        grants.push(grant);
    }

    pub fn revoke(&self, origin: &str, capability_id: &str) {
        self.grants
            .write()
            .retain(|g| !(g.origin == origin && g.capability_id == capability_id));
    }

    pub fn set_app_permissions(&self, url: impl Into<String>, permissions: PermissionMap) {
        self.app_permissions.write().insert(url.into(), permissions);
    }

    /// Number of grant lookups served
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PermissionStore for InMemoryPermissionStore {
    async fn get_grant(
        &self,
        origin: &str,
        capability_id: &str,
    ) -> CollaboratorResult<Option<CapabilityGrant>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .grants
            .read()
            .iter()
            .find(|g| g.origin == origin && g.capability_id == capability_id)
            .cloned())
    }

    async fn get_app_permissions(&self, url: &str) -> CollaboratorResult<PermissionMap> {
        Ok(self
            .app_permissions
            .read()
            .get(url)
            .cloned()
            .unwrap_or_default())
    }

    fn describe_perm(&self, id: &str, caps: &[String]) -> String {
        describe_capability(id, caps)
    }
}

// =============================================================================
// SESSIONS
// =============================================================================

/// Sessions keyed by the caller's sender
#[derive(Default)]
pub struct InMemorySessionResolver {
    sessions: RwLock<HashMap<SenderId, Session>>,
}

impl InMemorySessionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&self, sender: SenderId, session: Session) {
        self.sessions.write().insert(sender, session);
    }

    pub fn logout(&self, sender: SenderId) {
        self.sessions.write().remove(&sender);
    }
}

#[async_trait]
impl SessionResolver for InMemorySessionResolver {
    async fn session_for(&self, caller: &CallerContext) -> CollaboratorResult<Option<Session>> {
        Ok(self.sessions.read().get(&caller.sender()).cloned())
    }
}

// =============================================================================
// CONTENT
// =============================================================================

fn sort_millis(ts: Option<&StoredTimestamp>) -> i64 {
    match ts {
        Some(StoredTimestamp::Millis(m)) => *m,
        Some(StoredTimestamp::Text(t)) => DateTime::parse_from_rfc3339(t)
            .map(|dt| dt.timestamp_millis())
            .unwrap_or(0),
        None => 0,
    }
}

/// Status files and archive metadata, keyed by full record url
#[derive(Default)]
pub struct InMemoryContentStore {
    statuses: RwLock<BTreeMap<String, StoredStatus>>,
    authors: RwLock<HashMap<String, StoredAuthor>>,
    archives: RwLock<HashMap<String, ArchiveInfo>>,
    next_row: AtomicI64,
    calls: AtomicUsize,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Author profile used for statuses written into `author.url`
    pub fn set_author(&self, author: StoredAuthor) {
        self.authors.write().insert(author.url.clone(), author);
    }

    pub fn set_archive_info(&self, url: impl Into<String>, info: ArchiveInfo) {
        self.archives.write().insert(url.into(), info);
    }

    /// Seed a stored record directly, bypassing `add_status`
    pub fn insert_status(&self, status: StoredStatus) {
        let url = format!("{}{}", status.author.url, status.pathname);
        self.statuses.write().insert(url, status);
    }

    /// Number of store operations served
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn author_for(&self, archive_url: &str) -> StoredAuthor {
        self.authors
            .read()
            .get(archive_url)
            .cloned()
            .unwrap_or_else(|| StoredAuthor {
                url: archive_url.to_string(),
                title: String::new(),
                description: String::new(),
                kind: vec!["unwalled.garden/person".to_string()],
                is_owner: true,
            })
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn list_statuses(
        &self,
        query: &ListStatusesQuery,
    ) -> CollaboratorResult<Vec<StoredStatus>> {
        self.touch();
        let statuses = self.statuses.read();

        let mut matching: Vec<StoredStatus> = statuses
            .values()
            .filter(|s| match &query.filters.authors {
                Some(authors) => authors.iter().any(|a| a.trim_end_matches('/') == s.author.url),
                None => true,
            })
            .filter(|s| match &query.filters.visibility {
                Some(v) => &s.visibility == v,
                None => true,
            })
            .cloned()
            .collect();

        let by_updated = query.sort_by.as_deref() == Some("updatedAt");
        matching.sort_by_key(|s| {
            let ts = if by_updated {
                s.updated_at.as_ref().or(s.created_at.as_ref())
            } else {
                s.created_at.as_ref()
            };
            (sort_millis(ts), s.row_id)
        });
        if query.reverse.unwrap_or(false) {
            matching.reverse();
        }

        let offset = query.offset.unwrap_or(0) as usize;
        let limit = query.limit.map(|l| l as usize).unwrap_or(usize::MAX);
        Ok(matching.into_iter().skip(offset).take(limit).collect())
    }

    async fn get_status(&self, url: &str) -> CollaboratorResult<Option<StoredStatus>> {
        self.touch();
        Ok(self.statuses.read().get(url).cloned())
    }

    async fn add_status(
        &self,
        archive_url: &str,
        draft: &StatusDraft,
    ) -> CollaboratorResult<String> {
        self.touch();
        let archive_url = archive_url.trim_end_matches('/');
        let row = self.next_row.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();

        let status = StoredStatus {
            pathname: format!("{}/{}-{}.json", STATUSES_FOLDER, now.timestamp_millis(), row),
            body: draft.body.clone(),
            created_at: Some(StoredTimestamp::Millis(now.timestamp_millis())),
            updated_at: None,
            author: self.author_for(archive_url),
            visibility: draft.visibility.clone(),
            row_id: Some(row),
        };
        let url = format!("{}{}", status.author.url, status.pathname);
        debug!(url = %url, "Writing status");
        self.statuses.write().insert(url.clone(), status);
        Ok(url)
    }

    async fn edit_status(
        &self,
        archive_url: &str,
        path: &str,
        patch: &StatusPatch,
    ) -> CollaboratorResult<()> {
        self.touch();
        let url = join_archive_path(archive_url, path);
        let mut statuses = self.statuses.write();
        let status = statuses.get_mut(&url).ok_or_else(|| not_found(&url))?;

        if let Some(body) = &patch.body {
            status.body = body.clone();
        }
        if let Some(visibility) = &patch.visibility {
            status.visibility = visibility.clone();
        }
        status.updated_at = Some(StoredTimestamp::Millis(Utc::now().timestamp_millis()));
        Ok(())
    }

    async fn remove_status(&self, archive_url: &str, path: &str) -> CollaboratorResult<()> {
        self.touch();
        let url = join_archive_path(archive_url, path);
        self.statuses
            .write()
            .remove(&url)
            .map(|_| ())
            .ok_or_else(|| not_found(&url))
    }

    async fn get_archive_info(&self, url: &str) -> CollaboratorResult<ArchiveInfo> {
        self.touch();
        Ok(self.archives.read().get(url).cloned().unwrap_or_default())
    }
}

// =============================================================================
// APPLICATIONS
// =============================================================================

#[derive(Default)]
pub struct InMemoryApplicationRegistry {
    rows: RwLock<HashMap<(i64, String), InstalledApplication>>,
}

impl InMemoryApplicationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&self, app: InstalledApplication) {
        self.rows.write().insert((app.user_id, app.url.clone()), app);
    }

    pub fn uninstall(&self, user_id: i64, url: &str) {
        self.rows.write().remove(&(user_id, url.to_string()));
    }
}

#[async_trait]
impl ApplicationRegistry for InMemoryApplicationRegistry {
    async fn get_installed_application(
        &self,
        user_id: i64,
        url: &str,
    ) -> CollaboratorResult<Option<InstalledApplication>> {
        Ok(self.rows.read().get(&(user_id, url.to_string())).cloned())
    }
}

// =============================================================================
// MODALS
// =============================================================================

/// Plays back queued answers; an empty queue is a cancel
#[derive(Default)]
pub struct ScriptedModalPresenter {
    answers: Mutex<VecDeque<Result<Option<Value>, ModalError>>>,
    shown: Mutex<Vec<(String, Value)>>,
}

impl ScriptedModalPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_answer(&self, answer: Result<Option<Value>, ModalError>) {
        self.answers.lock().push_back(answer);
    }

    /// Modal names and options shown so far, in order
    pub fn shown(&self) -> Vec<(String, Value)> {
        self.shown.lock().clone()
    }
}

#[async_trait]
impl ModalPresenter for ScriptedModalPresenter {
    async fn show_modal(
        &self,
        _caller: &CallerContext,
        modal: &str,
        options: Value,
    ) -> Result<Option<Value>, ModalError> {
        self.shown.lock().push((modal.to_string(), options));
        self.answers.lock().pop_front().unwrap_or(Ok(None))
    }
}
