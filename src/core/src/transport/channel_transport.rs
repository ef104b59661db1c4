use log::trace;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use super::Transport;
use crate::error_handling::types::TransportError;
use crate::protocol::Command;

/// A [`Transport`] queuing JSON-encoded commands on an unbounded channel.
///
/// The receiving half is drained by whoever owns the wire, usually the websocket writer task.
#[derive(Clone)]
pub struct ChannelTransport {
    outbound: UnboundedSender<String>,
}

impl ChannelTransport {
    pub fn new() -> (Self, UnboundedReceiver<String>) {
        let (outbound, rx) = unbounded_channel();
        (Self { outbound }, rx)
    }
}

impl Transport for ChannelTransport {
    fn send(&self, command: &Command) -> Result<(), TransportError> {
        let encoded = command.encode()?;
        trace!("queueing {}", encoded);
        self.outbound
            .send(encoded)
            .map_err(|_| TransportError::Closed)
    }
}
