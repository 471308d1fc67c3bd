//! RPC request types.

use serde::{Deserialize, Serialize};

/// RPC request envelope.
///
/// The coordinator accepts one JSON request per input line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    /// Protocol version (selected by client after probe).
    /// For probe requests, this MUST be 0.
    pub protocol_version: i32,
    /// Operation name.
    pub op: String,
    /// Caller-chosen request ID for correlation.
    pub request_id: String,
    /// Opaque owner identifier supplied by the authentication layer.
    /// Required by owner-scoped operations; the coordinator trusts it as given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    /// Operation-specific payload.
    pub payload: serde_json::Value,
}

impl RpcRequest {
    /// The owner id, or an INVALID_REQUEST error if the caller omitted it.
    pub fn require_owner(&self) -> Result<&str, crate::RpcError> {
        self.owner_id
            .as_deref()
            .ok_or_else(|| crate::RpcError::invalid_request("missing owner_id"))
    }
}
