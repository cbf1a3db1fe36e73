//! # Bridge Telemetry
//!
//! Structured logging for the web API bridge and its hosts.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bridge_telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_logging(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `BRIDGE_SERVICE_NAME` | `web-api-bridge` | Service name attached to the startup event |
//! | `BRIDGE_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `BRIDGE_JSON_LOGS` | `false` | Emit JSON lines instead of plain text |
//! | `BRIDGE_CONSOLE_OUTPUT` | `true` | Write log lines to stdout at all |

#![allow(missing_docs)]

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("A global subscriber is already installed: {0}")]
    AlreadyInitialized(String),
}
