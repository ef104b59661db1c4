use std::time::Duration;

use log::{debug, info, warn};
use serde_json::json;

use crate::dispatcher;
use crate::session_management::{SessionHandle, SessionHooks};

pub const VISITS_KEY: &str = "visits";

/// Demo application: counts how many times this browser opened the page.
///
/// Each new session is configured for `app_name`, then the stored count is read back and
/// stored again incremented.
pub struct VisitCounter {
    app_name: String,
    timeout: Duration,
}

impl VisitCounter {
    pub fn new(app_name: String, timeout: Duration) -> Self {
        Self { app_name, timeout }
    }

    pub async fn count_visit(session: SessionHandle, app_name: String, timeout: Duration) -> Option<u64> {
        let pending = {
            let mut session = session.lock();
            dispatcher::configure(&mut session, &app_name);
            dispatcher::request(&mut session, VISITS_KEY)
        };

        let previous = match pending.with_timeout(timeout).await {
            Ok(value) => value.and_then(|v| v.as_u64()).unwrap_or(0),
            Err(e) => {
                warn!("[{}] visit count unavailable: {}", session.id(), e);
                return None;
            }
        };

        let visits = previous + 1;
        dispatcher::store(&session.lock(), VISITS_KEY, json!(visits));
        info!("[{}] visit #{}", session.id(), visits);
        Some(visits)
    }
}

impl SessionHooks for VisitCounter {
    fn on_session_start(&self, session: SessionHandle) {
        tokio::spawn(Self::count_visit(session, self.app_name.clone(), self.timeout));
    }

    fn on_session_end(&self, session: &SessionHandle) {
        debug!("[{}] visit over", session.id());
    }
}
