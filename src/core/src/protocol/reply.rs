use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error_handling::types::ProtocolError;

/// A message written back by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Result of a `retrieve` command.
    Retrieved(ClientReply),
    /// A client-side storage operation failed.
    Failed(ClientFailure),
}

/// The value found for a retrieve, addressed to the input slot `target`.
///
/// `value` is `null` when the key is absent from the client's storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientReply {
    pub target: String,
    #[serde(default)]
    pub request_id: Option<Uuid>,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientFailure {
    #[serde(default)]
    pub request_id: Option<Uuid>,
    /// Kind of the command that failed, e.g. `store`.
    pub command: String,
    pub message: String,
}

impl ClientMessage {
    pub fn decode(raw: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(raw).map_err(ProtocolError::Decode)
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
