//! Bridge configuration with validation.

use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

use crate::domain::types::STATUSES_CAPABILITY;

/// Main bridge configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Capability ids guarding each operation family
    pub capabilities: CapabilitiesConfig,
    /// Statuses family behaviour
    pub statuses: StatusesConfig,
    /// Modal names handed to the presenter
    pub dialogs: DialogsConfig,
}

impl BridgeConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capabilities.statuses.trim().is_empty() {
            return Err(ConfigError::Empty("capabilities.statuses"));
        }
        if self.statuses.default_visibility.trim().is_empty() {
            return Err(ConfigError::Empty("statuses.default_visibility"));
        }
        if self.dialogs.select_file_modal.trim().is_empty() {
            return Err(ConfigError::Empty("dialogs.select_file_modal"));
        }
        if self.dialogs.select_resource_modal.trim().is_empty() {
            return Err(ConfigError::Empty("dialogs.select_resource_modal"));
        }
        Ok(())
    }

    /// Defaults overridden from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `BRIDGE_STATUSES_CAPABILITY`: statuses capability id
    /// - `BRIDGE_DEFAULT_VISIBILITY`: visibility applied by `statuses.add`
    /// - `BRIDGE_SELECT_FILE_MODAL`: modal used by the file dialogs
    /// - `BRIDGE_SELECT_RESOURCE_MODAL`: modal used by the resource dialog
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(v) = env::var("BRIDGE_STATUSES_CAPABILITY") {
            config.capabilities.statuses = v;
        }
        if let Ok(v) = env::var("BRIDGE_DEFAULT_VISIBILITY") {
            config.statuses.default_visibility = v;
        }
        if let Ok(v) = env::var("BRIDGE_SELECT_FILE_MODAL") {
            config.dialogs.select_file_modal = v;
        }
        if let Ok(v) = env::var("BRIDGE_SELECT_RESOURCE_MODAL") {
            config.dialogs.select_resource_modal = v;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Capability ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilitiesConfig {
    /// Capability guarding `statuses.*` (default: unwalled.garden/api/statuses)
    pub statuses: String,
}

impl Default for CapabilitiesConfig {
    fn default() -> Self {
        Self {
            statuses: STATUSES_CAPABILITY.to_string(),
        }
    }
}

/// Statuses family configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusesConfig {
    /// Visibility applied when `add` receives none (default: public)
    pub default_visibility: String,
}

impl Default for StatusesConfig {
    fn default() -> Self {
        Self {
            default_visibility: "public".to_string(),
        }
    }
}

/// Dialog configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogsConfig {
    /// Modal for select-file and save-file (default: select-file)
    pub select_file_modal: String,
    /// Modal for select-resource (default: select-archive)
    pub select_resource_modal: String,
}

impl Default for DialogsConfig {
    fn default() -> Self {
        Self {
            select_file_modal: "select-file".to_string(),
            select_resource_modal: "select-archive".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("configuration value {0} cannot be empty")]
    Empty(&'static str),
}
