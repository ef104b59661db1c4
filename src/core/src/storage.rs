//! Client-side storage model
//!
//! The browser keeps the actual data; this module describes what the client shim expects from
//! its storage library, so the protocol can be exercised without a browser.
//!
//! Components:
//! - `storage_trait`: the `ClientStore` trait, namespaced key-value operations.
//! - `memory_storage`: an in-memory implementation with an optional entry quota.

pub mod memory_storage;
pub mod storage_trait;

pub use memory_storage::MemoryClientStore;
pub use storage_trait::{ClientStore, DEFAULT_INSTANCE};
