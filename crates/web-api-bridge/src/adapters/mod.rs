//! Adapters for the driven ports.

pub mod memory;

pub use memory::{
    describe_capability, InMemoryApplicationRegistry, InMemoryContentStore,
    InMemoryPermissionStore, InMemorySessionResolver, ScriptedModalPresenter, StaticNameResolver,
};
