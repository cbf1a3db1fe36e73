//! Typed option payloads for every guarded operation.
//!
//! Callers hand over loosely typed JSON. Each payload is read in a single pass
//! into an explicit struct; the first violated constraint fails the whole
//! payload and nothing from it is applied.
//!
//! Two field policies exist:
//! - dialog options are lenient: a falsy value of the wrong type (`null`,
//!   `false`, `0`, `""`) counts as absent;
//! - statuses options are strict: a present key must hold the right type,
//!   `null` included.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::error::{BridgeError, BridgeResult};

// ═══════════════════════════════════════════════════════════════════════════
// FIELD READER
// ═══════════════════════════════════════════════════════════════════════════

/// JavaScript-style falsiness of a JSON value
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map(|f| f == 0.0 || f.is_nan()).unwrap_or(false),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn as_str_array(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Policy {
    Lenient,
    Strict,
}

/// Reads typed fields out of one JSON object under a single policy
struct FieldReader<'a> {
    obj: &'a Map<String, Value>,
    policy: Policy,
}

impl<'a> FieldReader<'a> {
    fn lenient(obj: &'a Map<String, Value>) -> Self {
        Self {
            obj,
            policy: Policy::Lenient,
        }
    }

    fn strict(obj: &'a Map<String, Value>) -> Self {
        Self {
            obj,
            policy: Policy::Strict,
        }
    }

    /// Fetch a field and convert it, or fail with `message`
    fn read<T>(
        &self,
        key: &str,
        message: &str,
        convert: impl Fn(&Value) -> Option<T>,
    ) -> BridgeResult<Option<T>> {
        let value = match self.obj.get(key) {
            None => return Ok(None),
            Some(v) => v,
        };
        if let Some(converted) = convert(value) {
            return Ok(Some(converted));
        }
        if self.policy == Policy::Lenient && is_falsy(value) {
            return Ok(None);
        }
        Err(BridgeError::validation(message))
    }

    fn string(&self, key: &str, message: &str) -> BridgeResult<Option<String>> {
        self.read(key, message, |v| v.as_str().map(str::to_string))
    }

    fn boolean(&self, key: &str, message: &str) -> BridgeResult<Option<bool>> {
        self.read(key, message, Value::as_bool)
    }

    fn strings(&self, key: &str, message: &str) -> BridgeResult<Option<Vec<String>>> {
        self.read(key, message, as_str_array)
    }

    fn number(&self, key: &str, message: &str) -> BridgeResult<Option<f64>> {
        self.read(key, message, Value::as_f64)
    }

    /// A nested object; `None` when the field is absent (or falsy, when lenient)
    fn object(&self, key: &str, message: &str) -> BridgeResult<Option<&'a Map<String, Value>>> {
        match self.obj.get(key) {
            None => Ok(None),
            Some(v) if self.policy == Policy::Lenient && is_falsy(v) => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map)),
            Some(_) => Err(BridgeError::validation(message)),
        }
    }
}

/// Dialog entry points accept a missing argument as `{}` but nothing else
fn dialog_options_object(opts: Option<&Value>) -> BridgeResult<Map<String, Value>> {
    match opts {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(_) => Err(BridgeError::validation("Must pass an options object")),
    }
}

fn non_negative_integer(value: f64, message: &str) -> BridgeResult<u64> {
    if value < 0.0 || value.fract() != 0.0 || !value.is_finite() {
        return Err(BridgeError::validation(message));
    }
    Ok(value as u64)
}

// ═══════════════════════════════════════════════════════════════════════════
// DIALOG OPTIONS
// ═══════════════════════════════════════════════════════════════════════════

/// Filters for the file picker
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub writable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub networked: Option<bool>,
}

/// Options of the select-file dialog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectFileOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_label: Option<String>,
    /// Archive to browse; defaults to the session's own
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<FileFilters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_multiple: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disallow_create: Option<bool>,
}

impl SelectFileOptions {
    pub fn from_value(opts: Option<&Value>) -> BridgeResult<Self> {
        let obj = dialog_options_object(opts)?;
        let r = FieldReader::lenient(&obj);

        let title = r.string("title", ".title must be a string")?;
        let button_label = r.string("buttonLabel", ".buttonLabel must be a string")?;
        let archive = r.string("archive", ".archive must be a string")?;
        let default_path = r.string("defaultPath", ".defaultPath must be a string")?;
        let select = r.strings("select", ".select must be an array of strings")?;

        let filters = match r.object("filters", ".filters must be an object")? {
            None => None,
            Some(f) => {
                let f = FieldReader::lenient(f);
                Some(FileFilters {
                    extensions: f.strings(
                        "extensions",
                        ".filters.extensions must be an array of strings",
                    )?,
                    writable: f.boolean("writable", ".filters.writable must be a boolean")?,
                    networked: f.boolean("networked", ".filters.networked must be a boolean")?,
                })
            }
        };

        let allow_multiple = r.boolean("allowMultiple", ".allowMultiple must be a boolean")?;
        let disallow_create = r.boolean("disallowCreate", ".disallowCreate must be a boolean")?;

        Ok(Self {
            title,
            button_label,
            archive,
            default_path,
            select,
            filters,
            allow_multiple,
            disallow_create,
        })
    }
}

/// Options of the save-file dialog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveFileOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_label: Option<String>,
    /// Archive to save into; defaults to the session's own
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<FileFilters>,
}

impl SaveFileOptions {
    pub fn from_value(opts: Option<&Value>) -> BridgeResult<Self> {
        let obj = dialog_options_object(opts)?;
        let r = FieldReader::lenient(&obj);

        let title = r.string("title", ".title must be a string")?;
        let button_label = r.string("buttonLabel", ".buttonLabel must be a string")?;
        let archive = r.string("archive", ".archive must be a string")?;
        let default_path = r.string("defaultPath", ".defaultPath must be a string")?;
        let default_filename = r.string("defaultFilename", ".defaultFilename must be a string")?;
        let extension = r.string("extension", ".extension must be a string")?;

        let filters = match r.object("filters", ".filters must be an object")? {
            None => None,
            Some(f) => {
                let f = FieldReader::lenient(f);
                Some(FileFilters {
                    extensions: f.strings(
                        "extensions",
                        ".filters.extensions must be an array of strings",
                    )?,
                    writable: None,
                    networked: f.boolean("networked", ".filters.networked must be a boolean")?,
                })
            }
        };

        Ok(Self {
            title,
            button_label,
            archive,
            default_path,
            default_filename,
            extension,
            filters,
        })
    }
}

/// Filters for the resource picker
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceFilters {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub writable: Option<bool>,
}

/// Options of the select-resource dialog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectResourceOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<ResourceFilters>,
}

impl SelectResourceOptions {
    pub fn from_value(opts: Option<&Value>) -> BridgeResult<Self> {
        let obj = dialog_options_object(opts)?;
        let r = FieldReader::lenient(&obj);

        let title = r.string("title", ".title must be a string")?;
        let button_label = r.string("buttonLabel", ".buttonLabel must be a string")?;
        let filters = match r.object("filters", ".filters must be an object")? {
            None => None,
            Some(f) => {
                let f = FieldReader::lenient(f);
                Some(ResourceFilters {
                    kind: f.string("type", ".filters.type must be a string")?,
                    writable: f.boolean("writable", ".filters.writable must be a boolean")?,
                })
            }
        };

        Ok(Self {
            title,
            button_label,
            filters,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// STATUSES OPTIONS
// ═══════════════════════════════════════════════════════════════════════════

/// Filters of a statuses query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusFilters {
    /// Author urls; a single string is normalized to one entry
    pub authors: Option<Vec<String>>,
    pub visibility: Option<String>,
}

/// Statuses query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStatusesQuery {
    pub filters: StatusFilters,
    pub sort_by: Option<String>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
    pub reverse: Option<bool>,
}

impl ListStatusesQuery {
    /// Anything other than an object is read as an empty query
    pub fn from_value(opts: Option<&Value>) -> BridgeResult<Self> {
        let obj = match opts {
            Some(Value::Object(map)) => map,
            _ => return Ok(Self::default()),
        };
        let r = FieldReader::strict(obj);

        let sort_by = r.string("sortBy", "SortBy must be a string")?;
        let offset = r
            .number("offset", "Offset must be a number")?
            .map(|n| non_negative_integer(n, "Offset must be a non-negative integer"))
            .transpose()?;
        let limit = r
            .number("limit", "Limit must be a number")?
            .map(|n| non_negative_integer(n, "Limit must be a non-negative integer"))
            .transpose()?;
        let reverse = r.boolean("reverse", "Reverse must be a boolean")?;

        let mut filters = StatusFilters::default();
        match obj.get("filters") {
            None => {}
            Some(v) if is_falsy(v) => {}
            Some(Value::Object(f)) => {
                if let Some(authors) = f.get("authors") {
                    let normalized = match authors {
                        Value::String(s) => Some(vec![s.clone()]),
                        other => as_str_array(other),
                    };
                    filters.authors = Some(normalized.ok_or_else(|| {
                        BridgeError::validation("Authors filter must be a string or array of strings")
                    })?);
                }
                filters.visibility = FieldReader::strict(f)
                    .string("visibility", "Visibility filter must be a string")?;
            }
            Some(_) => return Err(BridgeError::validation("Filters must be an object")),
        }

        Ok(Self {
            filters,
            sort_by,
            offset,
            limit,
            reverse,
        })
    }
}

/// A status to create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStatus {
    pub body: String,
    pub visibility: Option<String>,
}

impl NewStatus {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            visibility: None,
        }
    }

    /// Accepts a bare string (the body) or `{body, visibility?}`
    pub fn from_value(status: Option<&Value>) -> BridgeResult<Self> {
        let obj = match status {
            Some(Value::String(body)) => {
                let status = Self::new(body.clone());
                status.validate()?;
                return Ok(status);
            }
            Some(Value::Object(map)) => map,
            _ => {
                return Err(BridgeError::validation(
                    "The `status` parameter must be a string or object",
                ))
            }
        };

        let body = match obj.get("body") {
            Some(Value::String(body)) => body.clone(),
            _ => String::new(),
        };
        let visibility = FieldReader::strict(obj).string(
            "visibility",
            "The `status.visibility` parameter must be \"public\" or \"private\"",
        )?;

        let status = Self { body, visibility };
        status.validate()?;
        Ok(status)
    }

    pub fn validate(&self) -> BridgeResult<()> {
        if self.body.is_empty() {
            return Err(BridgeError::validation(
                "The `status.body` parameter must be a non-empty string",
            ));
        }
        Ok(())
    }
}

impl From<&str> for NewStatus {
    fn from(body: &str) -> Self {
        Self::new(body)
    }
}

/// Changes to an existing status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPatch {
    pub body: Option<String>,
    pub visibility: Option<String>,
}

impl StatusPatch {
    /// Accepts a bare string (the new body) or `{body?, visibility?}`
    pub fn from_value(status: Option<&Value>) -> BridgeResult<Self> {
        let obj = match status {
            Some(Value::String(body)) => {
                return Ok(Self {
                    body: Some(body.clone()),
                    visibility: None,
                })
            }
            Some(Value::Object(map)) => map,
            _ => {
                return Err(BridgeError::validation(
                    "The `status` parameter must be a string or object",
                ))
            }
        };
        let r = FieldReader::strict(obj);

        Ok(Self {
            body: r.string(
                "body",
                "The `status.body` parameter must be a non-empty string",
            )?,
            visibility: r.string(
                "visibility",
                "The `status.visibility` parameter must be \"public\" or \"private\"",
            )?,
        })
    }
}

/// A required, non-empty resource url parameter
pub fn required_url(url: Option<&Value>) -> BridgeResult<String> {
    match url {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        _ => Err(BridgeError::validation(
            "The `url` parameter must be a valid URL",
        )),
    }
}
