//! Probe operation types.
//!
//! Version/feature discovery; the only operation accepted at
//! `protocol_version: 0`.

use serde::{Deserialize, Serialize};

/// Probe response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResponse {
    /// Coordinator version string.
    pub coordinator_version: String,
    /// Minimum supported protocol version.
    pub protocol_min: i32,
    /// Maximum supported protocol version.
    pub protocol_max: i32,
    /// Supported operation names.
    pub features: Vec<String>,
}
