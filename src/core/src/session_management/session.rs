use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde_json::Value;
use uuid::Uuid;

use crate::configuration::types::PrefixPolicy;
use crate::dispatcher::pending::{PendingRetrieve, PendingTable};
use crate::error_handling::types::{RetrieveError, TransportError};
use crate::protocol::{ClientMessage, Command};
use crate::session_management::input_slots::InputSlots;
use crate::session_management::prefix::namespaced_key;
use crate::session_management::SessionStatus;
use crate::transport::Transport;

/// Server-side context of one client connection.
///
/// Passed to every dispatcher call. Everything here is confined to its session: two sessions
/// never share a prefix, a slot or a pending retrieve.
pub struct StorageSession {
    id: Uuid,
    created_at: DateTime<Utc>,
    policy: PrefixPolicy,
    prefix: Option<String>,
    app_name: Option<String>,
    status: SessionStatus,
    inputs: InputSlots,
    pending: PendingTable,
    transport: Arc<dyn Transport>,
}

impl StorageSession {
    pub fn new(transport: Arc<dyn Transport>, policy: PrefixPolicy) -> Self {
        let id = Uuid::new_v4();
        debug!("[{}] session created", id);
        Self {
            id,
            created_at: Utc::now(),
            policy,
            prefix: None,
            app_name: None,
            status: SessionStatus::Unconfigured,
            inputs: InputSlots::new(),
            pending: PendingTable::new(),
            transport,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn policy(&self) -> &PrefixPolicy {
        &self.policy
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn app_name(&self) -> Option<&str> {
        self.app_name.as_deref()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn inputs(&self) -> &InputSlots {
        &self.inputs
    }

    pub fn inputs_mut(&mut self) -> &mut InputSlots {
        &mut self.inputs
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Input slot a retrieve for `key` is answered in.
    pub fn target_for(&self, key: &str) -> String {
        namespaced_key(self.prefix(), key)
    }

    /// Installs a new prefix. Retrieves still in flight under the previous one are failed
    /// with [`RetrieveError::Superseded`] and its input slots are dropped; the number of
    /// failed retrieves is returned.
    pub(crate) fn apply_configuration(&mut self, prefix: String, app_name: &str) -> usize {
        let superseded = self.pending.fail_all(RetrieveError::Superseded);
        if let Some(previous) = self.prefix.take() {
            let evicted = self.inputs.evict_namespace(&previous);
            debug!("[{}] dropped {} slot(s) under {}", self.id, evicted, previous);
        }
        self.prefix = Some(prefix);
        self.app_name = Some(app_name.to_string());
        if self.status != SessionStatus::Closed {
            self.status = SessionStatus::Configured;
        }
        superseded
    }

    pub(crate) fn send(&self, command: &Command) -> Result<(), TransportError> {
        if self.status == SessionStatus::Closed {
            return Err(TransportError::Closed);
        }
        debug!("[{}] -> {}", self.id, command.kind());
        self.transport.send(command)
    }

    /// Sends a fire-and-forget command. Failures are logged, never returned.
    pub(crate) fn send_or_log(&self, command: &Command) {
        if let Err(e) = self.send(command) {
            warn!("[{}] dropped {} command: {}", self.id, command.kind(), e);
        }
    }

    pub(crate) fn register_pending(&mut self, request_id: Uuid, target: String) -> PendingRetrieve {
        self.pending.register(request_id, target)
    }

    /// Applies a message from the client.
    ///
    /// A retrieve reply is written to its input slot first, then settles the pending retrieve
    /// carrying the same request id, if any.
    pub fn deliver(&mut self, message: ClientMessage) {
        match message {
            ClientMessage::Retrieved(reply) => {
                debug!("[{}] <- retrieved {}", self.id, reply.target);
                if !self.owns_target(&reply.target) {
                    debug!("[{}] reply for superseded slot {} dropped", self.id, reply.target);
                    return;
                }
                let value = match reply.value {
                    Value::Null => None,
                    other => Some(other),
                };
                self.inputs.set(&reply.target, value.clone());
                if let Some(request_id) = reply.request_id {
                    if !self.pending.resolve(request_id, value) {
                        debug!("[{}] no waiter for request {}", self.id, request_id);
                    }
                }
            }
            ClientMessage::Failed(failure) => {
                warn!(
                    "[{}] client {} failed: {}",
                    self.id, failure.command, failure.message
                );
                if let Some(request_id) = failure.request_id {
                    self.pending
                        .fail(request_id, RetrieveError::ClientFailure(failure.message));
                }
            }
        }
    }

    // Once configured, only slots under the current prefix accept replies.
    fn owns_target(&self, target: &str) -> bool {
        match self.prefix() {
            Some(prefix) => target
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('_')),
            None => true,
        }
    }

    /// Marks the session closed and fails every pending retrieve.
    pub fn close(&mut self) -> usize {
        self.status = SessionStatus::Closed;
        self.pending.fail_all(RetrieveError::Disconnected)
    }
}
