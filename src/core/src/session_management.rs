//! Session management core module.
//!
//! One [`session::StorageSession`] exists per connected client. It is the explicit context
//! every dispatcher operation receives: it owns the namespace prefix, the reactive input slots
//! fed by client replies, and the table of retrieves still waiting for their reply.

use serde::{Deserialize, Serialize};

/// Submodule for the shared, lockable handle to a session.
pub mod active_session;
/// Submodule for callbacks run when sessions open.
pub mod hooks;
/// Submodule for the reactive input slots.
pub mod input_slots;
/// Submodule for namespace prefix generation.
pub mod prefix;
/// Submodule for session data structures and utilities.
pub mod session;
/// Submodule for session manager implementation.
pub mod session_manager;

pub use active_session::SessionHandle;
pub use hooks::SessionHooks;
pub use input_slots::InputSlots;
pub use session::StorageSession;
pub use session_manager::SessionManager;

/// Represents the current status of a session.
///
/// Variants:
/// - `Unconfigured`: no prefix yet, retrieve targets are bare keys.
/// - `Configured`: a prefix and app name are set.
/// - `Closed`: the client went away; pending retrieves were failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Unconfigured,
    Configured,
    Closed,
}
