//! In-process stand-in for the browser shim.
//!
//! [`LoopbackClient`] executes commands against a [`ClientStore`] exactly as
//! `xlocalstorage.js` does against the bundled storage library, and produces the same replies.

use std::sync::Arc;

use log::{debug, warn};
use serde_json::Value;
use tokio::sync::mpsc::UnboundedReceiver;
use uuid::Uuid;

use crate::error_handling::types::{ProtocolError, StorageError};
use crate::protocol::{ClientFailure, ClientMessage, ClientReply, Command};
use crate::session_management::active_session::SessionHandle;
use crate::session_management::session_manager::SessionManager;
use crate::storage::{ClientStore, DEFAULT_INSTANCE};

pub struct LoopbackClient {
    store: Arc<dyn ClientStore>,
    instance: String,
}

impl LoopbackClient {
    pub fn new(store: Arc<dyn ClientStore>) -> Self {
        Self {
            store,
            instance: DEFAULT_INSTANCE.to_string(),
        }
    }

    /// Storage instance commands currently apply to.
    pub fn instance(&self) -> &str {
        &self.instance
    }

    /// Executes one command, returning the message the client would send back.
    pub fn handle(&mut self, command: Command) -> Option<ClientMessage> {
        let kind = command.kind();
        match command {
            Command::Configure { app_name } => {
                debug!("loopback: instance {} -> {}", self.instance, app_name);
                self.instance = app_name;
                None
            }
            Command::Store { key, value } => {
                let result = self.store.set(&self.instance, &key, value);
                Self::failure_of(kind, None, result)
            }
            Command::Remove { key } => {
                let result = self.store.remove(&self.instance, &key);
                Self::failure_of(kind, None, result)
            }
            Command::Clear {} => {
                let result = self.store.clear(&self.instance).map(|_| ());
                Self::failure_of(kind, None, result)
            }
            Command::Retrieve {
                key,
                target,
                request_id,
            } => match self.store.get(&self.instance, &key) {
                Ok(value) => Some(ClientMessage::Retrieved(ClientReply {
                    target,
                    request_id,
                    value: value.unwrap_or(Value::Null),
                })),
                Err(e) => Self::failure_of(kind, request_id, Err(e)),
            },
        }
    }

    /// Decodes and executes one raw command.
    pub fn handle_raw(&mut self, raw: &str) -> Result<Option<ClientMessage>, ProtocolError> {
        let command: Command = serde_json::from_str(raw).map_err(ProtocolError::Decode)?;
        Ok(self.handle(command))
    }

    /// Executes every command already queued and delivers the replies to `session`.
    ///
    /// Returns the number of commands processed.
    pub fn drain(&mut self, outbound: &mut UnboundedReceiver<String>, session: &SessionHandle) -> usize {
        let mut processed = 0;
        while let Ok(raw) = outbound.try_recv() {
            processed += 1;
            match self.handle_raw(&raw) {
                Ok(Some(reply)) => session.lock().deliver(reply),
                Ok(None) => {}
                Err(e) => warn!("loopback: {}", e),
            }
        }
        processed
    }

    /// Serves session `session_id` until its outbound channel closes.
    ///
    /// Replies go through [`SessionManager::handle_client_message`], the same path as
    /// websocket traffic.
    pub async fn run(
        mut self,
        mut outbound: UnboundedReceiver<String>,
        manager: Arc<SessionManager>,
        session_id: Uuid,
    ) {
        while let Some(raw) = outbound.recv().await {
            let reply = match self.handle_raw(&raw) {
                Ok(Some(reply)) => reply,
                Ok(None) => continue,
                Err(e) => {
                    warn!("loopback: {}", e);
                    continue;
                }
            };
            let encoded = match reply.encode() {
                Ok(encoded) => encoded,
                Err(e) => {
                    warn!("loopback: cannot encode reply: {}", e);
                    continue;
                }
            };
            if let Err(e) = manager.handle_client_message(session_id, &encoded) {
                debug!("loopback: session {} gone: {}", session_id, e);
                break;
            }
        }
    }

    fn failure_of(
        kind: &str,
        request_id: Option<Uuid>,
        result: Result<(), StorageError>,
    ) -> Option<ClientMessage> {
        result.err().map(|e| {
            ClientMessage::Failed(ClientFailure {
                request_id,
                command: kind.to_string(),
                message: e.to_string(),
            })
        })
    }
}
