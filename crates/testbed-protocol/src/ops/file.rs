//! File reference operation types.
//!
//! Byte storage lives in an external service; the coordinator only tracks
//! references.

use serde::{Deserialize, Serialize};

/// File register request payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRegisterRequest {
    /// Filename as reported by the storage service.
    pub filename: String,
}

/// File remove request payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRemoveRequest {
    /// The file reference to drop.
    pub file_id: String,
}

/// File remove response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRemoveResponse {
    /// Echoed file id.
    pub file_id: String,
    /// Always true on success; removal either happens or errors.
    pub removed: bool,
}
