use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::session_management::{SessionStatus, StorageSession};

/// API error payload
#[derive(Serialize)]
pub struct ApiError {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub status: SessionStatus,
    pub app_name: Option<String>,
    pub prefix: Option<String>,
    pub pending_retrieves: usize,
    pub input_slots: usize,
}

impl From<&StorageSession> for SessionResponse {
    fn from(session: &StorageSession) -> Self {
        Self {
            id: session.id(),
            created_at: session.created_at(),
            status: session.status(),
            app_name: session.app_name().map(str::to_string),
            prefix: session.prefix().map(str::to_string),
            pending_retrieves: session.pending_count(),
            input_slots: session.inputs().len(),
        }
    }
}
