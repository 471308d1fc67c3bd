//! Device operation types.

use serde::{Deserialize, Serialize};

/// Device register request payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceRegisterRequest {
    /// Human-readable device name (unique within its gateway).
    pub name: String,
    /// Owning gateway id.
    pub gateway_id: String,
}

/// Device get request payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceGetRequest {
    /// The device id to fetch.
    pub device_id: String,
}

/// Device remove request payload.
///
/// Removal is blocked while any job, terminal or not, references the
/// device; job rows are the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceRemoveRequest {
    /// The device to remove.
    pub device_id: String,
}

/// Device remove response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceRemoveResponse {
    /// Echoed device id.
    pub device_id: String,
    /// Always true on success; removal either happens or errors.
    pub removed: bool,
}
