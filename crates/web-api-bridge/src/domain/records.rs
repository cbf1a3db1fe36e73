//! Storage-shaped records and the public shapes returned across the boundary.
//!
//! Internal records mirror what the content store and registries hand back and
//! may carry administrative fields. Public records are what callers see; they
//! are only ever produced by [`crate::domain::shaper`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════
// INTERNAL (STORAGE) SHAPES
// ═══════════════════════════════════════════════════════════════════════════

/// Timestamp as storage holds it: epoch millis or a date string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredTimestamp {
    Millis(i64),
    Text(String),
}

/// Boolean-ish storage column (sqlite integers, strings, real booleans).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum StoredFlag {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl StoredFlag {
    /// Truthiness of the stored value
    pub fn is_truthy(&self) -> bool {
        match self {
            StoredFlag::Null => false,
            StoredFlag::Bool(b) => *b,
            StoredFlag::Int(i) => *i != 0,
            StoredFlag::Float(f) => *f != 0.0 && !f.is_nan(),
            StoredFlag::Text(s) => !s.is_empty(),
        }
    }
}

/// Author of a stored status as the content store indexes it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAuthor {
    pub url: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: Vec<String>,
    /// Whether the author is the local user; internal only
    #[serde(default)]
    pub is_owner: bool,
}

/// Status as the content store returns it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredStatus {
    /// Path of the record file inside the author's archive
    pub pathname: String,
    pub body: String,
    pub created_at: Option<StoredTimestamp>,
    pub updated_at: Option<StoredTimestamp>,
    pub author: StoredAuthor,
    pub visibility: String,
    /// Index row key; internal only
    #[serde(default)]
    pub row_id: Option<i64>,
}

/// Row of the installed-applications table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledApplication {
    pub user_id: i64,
    pub url: String,
    #[serde(default)]
    pub enabled: StoredFlag,
    pub created_at: Option<StoredTimestamp>,
}

/// Title and description of an archive
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArchiveInfo {
    pub title: String,
    pub description: String,
}

/// Capability ids granted to an application, in the store's iteration order
pub type PermissionMap = IndexMap<String, Vec<String>>;

// ═══════════════════════════════════════════════════════════════════════════
// PUBLIC SHAPES
// ═══════════════════════════════════════════════════════════════════════════

/// Status author as callers see it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusAuthorRecord {
    pub url: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: Vec<String>,
}

/// Status as callers see it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRecord {
    pub url: String,
    pub body: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub author: StatusAuthorRecord,
    pub visibility: String,
}

/// One granted capability with its human-readable description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationPermission {
    pub id: String,
    pub caps: Vec<String>,
    pub description: String,
}

/// Installation and permission state of the calling application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationState {
    pub url: String,
    pub title: String,
    pub description: String,
    pub permissions: Vec<ApplicationPermission>,
    pub installed: bool,
    pub enabled: bool,
    pub installed_at: Option<String>,
}
