//! Domain types for the bridge.
//!
//! Pure data and pure functions: option validation, record shaping, the
//! method table, configuration, and the error taxonomy. Nothing here talks to
//! a collaborator.

pub mod config;
pub mod error;
pub mod methods;
pub mod options;
pub mod records;
pub mod shaper;
pub mod types;

// Re-exports for convenience
pub use config::{BridgeConfig, ConfigError};
pub use error::{
    BridgeError, BridgeResult, CollaboratorError, CollaboratorResult, ModalError, RpcError,
};
pub use methods::{get_method_info, is_method_supported, MethodInfo, MethodKind};
pub use options::{
    FileFilters, ListStatusesQuery, NewStatus, ResourceFilters, SaveFileOptions,
    SelectFileOptions, SelectResourceOptions, StatusFilters, StatusPatch,
};
pub use records::*;
pub use types::*;
