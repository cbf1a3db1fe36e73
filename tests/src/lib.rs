//! # Web API Bridge Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Fully wired bridge over in-memory adapters
//! │
//! └── integration/      # End-to-end call flows through RpcDispatcher
//!     ├── statuses_flow.rs
//!     ├── ownership.rs
//!     ├── dialogs_flow.rs
//!     └── application_state.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p bridge-tests
//! cargo test -p bridge-tests integration::ownership
//! ```

pub mod fixtures;
