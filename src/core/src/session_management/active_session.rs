use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use crate::session_management::session::StorageSession;

/// Shared handle to a [`StorageSession`].
///
/// The websocket reader, the application logic and the session manager all hold one. Locks
/// are short and never held across an `.await`.
#[derive(Clone)]
pub struct SessionHandle {
    id: Uuid,
    inner: Arc<Mutex<StorageSession>>,
}

impl SessionHandle {
    pub fn new(session: StorageSession) -> Self {
        Self {
            id: session.id(),
            inner: Arc::new(Mutex::new(session)),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Locks the session. A panic in another holder does not make the session unusable.
    pub fn lock(&self) -> MutexGuard<'_, StorageSession> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
