use log::{info, warn};
use serde_json::Value;
use uuid::Uuid;

use crate::dispatcher::pending::PendingRetrieve;
use crate::error_handling::types::RetrieveError;
use crate::protocol::Command;
use crate::session_management::prefix::generate_prefix;
use crate::session_management::session::StorageSession;

/// Gives the session a fresh random prefix and scopes the client's storage to `app_name`.
///
/// Calling it again regenerates the prefix; retrieves still pending under the old one fail
/// with [`RetrieveError::Superseded`]. Returns the new prefix.
pub fn configure(session: &mut StorageSession, app_name: &str) -> String {
    let prefix = generate_prefix(session.policy());
    let superseded = session.apply_configuration(prefix.clone(), app_name);
    if superseded > 0 {
        warn!(
            "[{}] reconfiguration superseded {} pending retrieve(s)",
            session.id(),
            superseded
        );
    }
    session.send_or_log(&Command::Configure {
        app_name: app_name.to_string(),
    });
    info!(
        "[{}] configured for app '{}' with prefix {}",
        session.id(),
        app_name,
        prefix
    );
    prefix
}

/// Asks the client to store `value` under `key`. Fire-and-forget.
pub fn store(session: &StorageSession, key: &str, value: Value) {
    session.send_or_log(&Command::Store {
        key: key.to_string(),
        value,
    });
}

/// Asks the client to remove `key`. Fire-and-forget.
pub fn remove(session: &StorageSession, key: &str) {
    session.send_or_log(&Command::Remove {
        key: key.to_string(),
    });
}

/// Asks the client to drop every key of its configured instance. Fire-and-forget.
pub fn clear(session: &StorageSession) {
    session.send_or_log(&Command::Clear {});
}

/// Requests `key` and returns what its input slot holds right now.
///
/// The reply arrives asynchronously, so this is the value from the previous round trip (or
/// `None` before the first one). Observe the slot through
/// [`crate::session_management::InputSlots::subscribe`], or use [`request`] to wait for this
/// particular answer.
pub fn retrieve(session: &StorageSession, key: &str) -> Option<Value> {
    let target = session.target_for(key);
    session.send_or_log(&Command::Retrieve {
        key: key.to_string(),
        target: target.clone(),
        request_id: None,
    });
    session.inputs().get(&target)
}

/// Requests `key` and returns a handle settled by the reply to this very request.
///
/// The reply also lands in the input slot, like [`retrieve`]. If the command cannot be sent
/// the handle is already failed with [`RetrieveError::Disconnected`].
pub fn request(session: &mut StorageSession, key: &str) -> PendingRetrieve {
    let target = session.target_for(key);
    let request_id = Uuid::new_v4();
    let command = Command::Retrieve {
        key: key.to_string(),
        target: target.clone(),
        request_id: Some(request_id),
    };
    if let Err(e) = session.send(&command) {
        warn!("[{}] retrieve of '{}' not sent: {}", session.id(), key, e);
        return PendingRetrieve::failed(request_id, target, RetrieveError::Disconnected);
    }
    session.register_pending(request_id, target)
}
