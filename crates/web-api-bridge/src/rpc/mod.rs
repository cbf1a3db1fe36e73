//! RPC surface of the bridge.

pub mod dispatch;

pub use dispatch::RpcDispatcher;
