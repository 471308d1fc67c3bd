//! Gateway operation types.
//!
//! Admin-side creation (issues the one-time enrollment token), gateway-side
//! registration (presents the token), and the periodic heartbeat.

use serde::{Deserialize, Serialize};

/// Gateway create request payload (admin).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayCreateRequest {
    /// Human-readable gateway name (unique).
    pub name: String,
}

/// Gateway create response payload.
///
/// `token` is the plaintext enrollment token, returned exactly once;
/// the coordinator stores only its SHA-256 digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayCreateResponse {
    /// The new gateway id.
    pub gateway_id: String,
    /// Echoed gateway name.
    pub name: String,
    /// One-time plaintext enrollment token (base64).
    pub token: String,
}

/// Gateway register request payload (gateway).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayRegisterRequest {
    /// Gateway name chosen at creation.
    pub name: String,
    /// Enrollment token handed out by the admin.
    pub token: String,
}

/// Gateway heartbeat request payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayHeartbeatRequest {
    /// The reporting gateway.
    pub gateway_id: String,
    /// Devices the gateway can currently reach.
    pub active_device_ids: Vec<String>,
}

/// Gateway heartbeat response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayHeartbeatResponse {
    /// Echoed gateway id.
    pub gateway_id: String,
    /// Devices refreshed by this heartbeat.
    pub devices_seen: usize,
    /// Devices newly marked offline.
    pub devices_offline: usize,
}
