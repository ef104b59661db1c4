//! Outbound channel from a session to its client.
//!
//! Components:
//! - [`Transport`]: the seam every dispatcher operation sends through.
//! - `channel_transport`: queues encoded commands for the websocket writer task.
//! - `loopback`: an in-process client emulating the browser shim, used by tests and demos.

pub mod channel_transport;
pub mod loopback;

use crate::error_handling::types::TransportError;
use crate::protocol::Command;

/// Delivers commands to the client of one session, preserving their order.
pub trait Transport: Send + Sync {
    fn send(&self, command: &Command) -> Result<(), TransportError>;
}

pub use channel_transport::ChannelTransport;
pub use loopback::LoopbackClient;
