use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error_handling::types::TransportError;

/// A storage command sent to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum Command {
    /// Scope the client's storage instance to `app_name`.
    #[serde(rename = "configureXLocalStore", rename_all = "camelCase")]
    Configure { app_name: String },
    #[serde(rename = "store")]
    Store { key: String, value: Value },
    /// Look `key` up and write the result into the input slot `target`.
    #[serde(rename = "retrieve", rename_all = "camelCase")]
    Retrieve {
        key: String,
        target: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<Uuid>,
    },
    #[serde(rename = "remove")]
    Remove { key: String },
    #[serde(rename = "clear")]
    Clear {},
}

impl Command {
    /// The message kind as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Configure { .. } => "configureXLocalStore",
            Command::Store { .. } => "store",
            Command::Retrieve { .. } => "retrieve",
            Command::Remove { .. } => "remove",
            Command::Clear {} => "clear",
        }
    }

    pub fn encode(&self) -> Result<String, TransportError> {
        serde_json::to_string(self).map_err(TransportError::Encode)
    }
}
