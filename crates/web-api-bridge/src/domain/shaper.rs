//! Record shaping: storage records in, public records out.
//!
//! Shaping is pure. It never fails; missing optional data becomes `null` and an
//! absent record stays absent so callers can report "not found".

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use tracing::debug;

use crate::domain::records::{
    ApplicationPermission, ApplicationState, ArchiveInfo, InstalledApplication, PermissionMap,
    StatusAuthorRecord, StatusRecord, StoredStatus, StoredTimestamp,
};

/// Canonical textual form of a timestamp: RFC 3339, UTC, millisecond precision.
///
/// Canonical input comes back unchanged. Empty or unparseable input is `None`.
pub fn normalize_timestamp(ts: Option<&StoredTimestamp>) -> Option<String> {
    let parsed = match ts? {
        StoredTimestamp::Millis(millis) => DateTime::<Utc>::from_timestamp_millis(*millis),
        StoredTimestamp::Text(text) => parse_text_timestamp(text.trim()),
    };
    if parsed.is_none() {
        debug!(timestamp = ?ts, "Dropping unparseable timestamp");
    }
    parsed.map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn parse_text_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(millis) = text.parse::<i64>() {
        return DateTime::<Utc>::from_timestamp_millis(millis);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Shape a stored status. `None` in, `None` out.
///
/// `url` is always recomputed from the author's current url and the record
/// pathname; it is never read from storage.
pub fn shape_status(status: Option<&StoredStatus>) -> Option<StatusRecord> {
    let status = status?;
    Some(StatusRecord {
        url: format!("{}{}", status.author.url, status.pathname),
        body: status.body.clone(),
        created_at: normalize_timestamp(status.created_at.as_ref()),
        updated_at: normalize_timestamp(status.updated_at.as_ref()),
        author: StatusAuthorRecord {
            url: status.author.url.clone(),
            title: status.author.title.clone(),
            description: status.author.description.clone(),
            kind: status.author.kind.clone(),
        },
        visibility: status.visibility.clone(),
    })
}

/// Turn an ordered `id -> caps` mapping into a list of permissions.
///
/// Entries keep the mapping's iteration order and `describe` is called exactly
/// once per entry, in that order.
pub fn shape_permissions<F>(permissions: &PermissionMap, mut describe: F) -> Vec<ApplicationPermission>
where
    F: FnMut(&str, &[String]) -> String,
{
    permissions
        .iter()
        .map(|(id, caps)| ApplicationPermission {
            id: id.clone(),
            caps: caps.clone(),
            description: describe(id, caps),
        })
        .collect()
}

/// Shape the calling application's installation state.
///
/// A missing installation row is not an error: the app is reported as not
/// installed, not enabled, with no install time.
pub fn shape_application<F>(
    url: &str,
    info: &ArchiveInfo,
    installation: Option<&InstalledApplication>,
    permissions: &PermissionMap,
    describe: F,
) -> ApplicationState
where
    F: FnMut(&str, &[String]) -> String,
{
    let (installed, enabled, installed_at) = match installation {
        Some(row) => (
            true,
            row.enabled.is_truthy(),
            normalize_timestamp(row.created_at.as_ref()),
        ),
        None => (false, false, None),
    };

    ApplicationState {
        url: url.to_string(),
        title: info.title.clone(),
        description: info.description.clone(),
        permissions: shape_permissions(permissions, describe),
        installed,
        enabled,
        installed_at,
    }
}
