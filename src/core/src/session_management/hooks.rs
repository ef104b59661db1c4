use crate::session_management::active_session::SessionHandle;

/// Application logic run against each new session.
///
/// Called from the connection task right after the session is registered; implementations
/// that need to wait on the client should spawn their own task.
pub trait SessionHooks: Send + Sync {
    fn on_session_start(&self, session: SessionHandle);

    fn on_session_end(&self, _session: &SessionHandle) {}
}

/// Hooks that do nothing.
pub struct NoHooks;

impl SessionHooks for NoHooks {
    fn on_session_start(&self, _session: SessionHandle) {}
}
