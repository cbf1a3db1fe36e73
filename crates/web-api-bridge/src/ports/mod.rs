//! Ports module for the bridge

pub mod inbound;
pub mod outbound;

pub use inbound::{ApplicationApi, DialogApi, StatusesApi};
pub use outbound::{
    ApplicationRegistry, ContentStore, ModalPresenter, NameResolver, PermissionStore,
    SessionResolver, StatusDraft,
};
