pub mod assets;
pub mod configuration;
pub mod controller;
pub mod dispatcher;
pub mod error_handling;
pub mod protocol;
pub mod session_management;
pub mod storage;
pub mod transport;
pub mod web_interface;

pub use dispatcher::{clear, configure, remove, request, retrieve, store};
pub use session_management::{SessionHandle, SessionManager, StorageSession};
