//! Wire format exchanged with the client shim.
//!
//! Server to client messages are [`Command`]s, encoded as `{"type": ..., "message": {...}}`.
//! Client to server messages are [`ClientMessage`]s, encoded as `{"type": ..., ...}`.

pub mod command;
pub mod reply;

pub use command::Command;
pub use reply::{ClientFailure, ClientMessage, ClientReply};
