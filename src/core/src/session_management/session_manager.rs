use crate::configuration::config::Config;
use crate::configuration::types::PrefixPolicy;
use crate::error_handling::types::SessionError;
use crate::protocol::ClientMessage;
use crate::session_management::active_session::SessionHandle;
use crate::session_management::session::StorageSession;
use crate::transport::Transport;
use crate::web_interface::types::SessionResponse;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

/// The structure related to session management
///
/// This structure tracks every connected client and routes the messages read from its
/// connection to the matching [`StorageSession`].
///
/// # Fields Overview
///
/// - `active_sessions`: the live sessions, by id
/// - `policy`: how prefixes are generated for new sessions
/// - `max_sessions`: the maximum number of concurrent sessions
pub struct SessionManager {
    active_sessions: Mutex<HashMap<Uuid, SessionHandle>>,
    policy: PrefixPolicy,
    max_sessions: usize,
}

impl SessionManager {
    pub fn new(policy: PrefixPolicy, max_sessions: usize) -> Self {
        Self {
            active_sessions: Mutex::new(HashMap::new()),
            policy,
            max_sessions,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.prefix_policy(), config.max_sessions)
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<Uuid, SessionHandle>> {
        self.active_sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registers a new session talking through `transport`.
    pub fn create_session(
        &self,
        transport: Arc<dyn Transport>,
    ) -> Result<SessionHandle, SessionError> {
        let mut sessions = self.sessions();
        if sessions.len() >= self.max_sessions {
            warn!("refusing session: limit of {} reached", self.max_sessions);
            return Err(SessionError::SessionLimitReached);
        }
        let handle = SessionHandle::new(StorageSession::new(transport, self.policy.clone()));
        sessions.insert(handle.id(), handle.clone());
        info!("[{}] session opened ({} active)", handle.id(), sessions.len());
        Ok(handle)
    }

    pub fn get(&self, id: Uuid) -> Result<SessionHandle, SessionError> {
        self.sessions().get(&id).cloned().ok_or(SessionError::NotFound)
    }

    /// Decodes a raw client message and delivers it to session `id`.
    pub fn handle_client_message(&self, id: Uuid, raw: &str) -> Result<(), SessionError> {
        let handle = self.get(id)?;
        let message = ClientMessage::decode(raw)?;
        handle.lock().deliver(message);
        Ok(())
    }

    /// Removes session `id`, failing its pending retrieves.
    pub fn close_session(&self, id: Uuid) -> Result<(), SessionError> {
        let handle = self.sessions().remove(&id).ok_or(SessionError::NotFound)?;
        let failed = handle.lock().close();
        info!("[{}] session closed, {} pending retrieve(s) failed", id, failed);
        Ok(())
    }

    pub fn get_active_session_count(&self) -> usize {
        self.sessions().len()
    }

    pub fn list_sessions(&self) -> Vec<SessionResponse> {
        let handles: Vec<SessionHandle> = self.sessions().values().cloned().collect();
        let mut list: Vec<SessionResponse> = handles
            .iter()
            .map(|h| SessionResponse::from(&*h.lock()))
            .collect();
        list.sort_by_key(|s| s.created_at);
        list
    }

    pub fn shutdown_all_sessions(&self) {
        let drained: Vec<SessionHandle> = self.sessions().drain().map(|(_, h)| h).collect();
        for handle in drained {
            handle.lock().close();
        }
        debug!("all sessions shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher;
    use crate::session_management::SessionStatus;
    use crate::error_handling::types::TransportError;
    use crate::protocol::Command;
    use serde_json::json;

    fn manager(max_sessions: usize) -> SessionManager {
        SessionManager::new(PrefixPolicy::default(), max_sessions)
    }

    struct Discard;

    impl Transport for Discard {
        fn send(&self, _command: &Command) -> Result<(), TransportError> {
            Ok(())
        }
    }

    fn transport() -> Arc<dyn Transport> {
        Arc::new(Discard)
    }

    #[test]
    fn test_create_and_close_sessions() {
        let manager = manager(4);
        let a = manager.create_session(transport()).unwrap();
        let b = manager.create_session(transport()).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(manager.get_active_session_count(), 2);

        manager.close_session(a.id()).unwrap();
        assert_eq!(manager.get_active_session_count(), 1);
        assert_eq!(a.lock().status(), SessionStatus::Closed);
        assert!(matches!(manager.get(a.id()), Err(SessionError::NotFound)));
        assert!(matches!(
            manager.close_session(a.id()),
            Err(SessionError::NotFound)
        ));
    }

    #[test]
    fn test_session_limit() {
        let manager = manager(1);
        let _a = manager.create_session(transport()).unwrap();
        assert!(matches!(
            manager.create_session(transport()),
            Err(SessionError::SessionLimitReached)
        ));
    }

    #[test]
    fn test_handle_client_message_routes_by_session() {
        let manager = manager(4);
        let a = manager.create_session(transport()).unwrap();
        let b = manager.create_session(transport()).unwrap();

        manager
            .handle_client_message(a.id(), r#"{"type":"retrieved","target":"k","value":1}"#)
            .unwrap();
        assert_eq!(a.lock().inputs().get("k"), Some(json!(1)));
        assert_eq!(b.lock().inputs().get("k"), None);

        assert!(matches!(
            manager.handle_client_message(a.id(), "{"),
            Err(SessionError::Protocol(_))
        ));
        assert!(matches!(
            manager.handle_client_message(Uuid::new_v4(), "{}"),
            Err(SessionError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_shutdown_disconnects_pending_retrieves() {
        let manager = manager(4);
        let handle = manager.create_session(transport()).unwrap();
        let pending = dispatcher::request(&mut handle.lock(), "k");

        manager.shutdown_all_sessions();
        assert_eq!(manager.get_active_session_count(), 0);
        assert_eq!(
            pending.await,
            Err(crate::error_handling::types::RetrieveError::Disconnected)
        );
    }

    #[test]
    fn test_list_sessions_reports_configuration() {
        let manager = manager(4);
        let handle = manager.create_session(transport()).unwrap();
        dispatcher::configure(&mut handle.lock(), "notes");

        let list = manager.list_sessions();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, handle.id());
        assert_eq!(list[0].app_name.as_deref(), Some("notes"));
        assert_eq!(list[0].status, SessionStatus::Configured);
    }
}
