//! Gateway table.
//!
//! Enrollment is two-step: an admin creates the gateway and hands the
//! one-time plaintext token to the operator; the gateway later registers
//! by presenting name + token. Only the token's SHA-256 digest is stored.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use testbed_protocol::{DeviceStatus, VerificationStatus};

use super::is_valid_name;

/// Length of the raw enrollment token in bytes.
const TOKEN_BYTES: usize = 32;

/// A registered gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gateway {
    /// Gateway identifier.
    pub id: String,
    /// Human-readable name (unique).
    pub name: String,
    /// Whether the enrollment token has been presented.
    pub verification: VerificationStatus,
    /// Liveness; gateways reuse the device status values.
    pub status: DeviceStatus,
    /// Last heartbeat or registration time.
    pub last_seen: DateTime<Utc>,
    /// SHA-256 hex digest of the enrollment token. Never serialized.
    #[serde(skip)]
    token_hash: String,
}

/// Errors for gateway table operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    #[error("gateway '{0}' not found")]
    NotFound(String),

    #[error("gateway name '{0}' is already registered")]
    DuplicateName(String),

    #[error("enrollment token mismatch for gateway '{0}'")]
    TokenMismatch(String),

    #[error("invalid gateway name '{0}'")]
    InvalidName(String),
}

fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// In-memory gateway table, keyed by gateway id.
#[derive(Debug, Default)]
pub struct GatewayTable {
    gateways: BTreeMap<String, Gateway>,
}

impl GatewayTable {
    /// Create a gateway and issue its enrollment token.
    ///
    /// Returns the gateway and the plaintext token; the token is not
    /// recoverable afterwards.
    pub fn create(
        &mut self,
        id: String,
        name: &str,
        at: DateTime<Utc>,
    ) -> Result<(Gateway, String), GatewayError> {
        if !is_valid_name(name) {
            return Err(GatewayError::InvalidName(name.to_string()));
        }
        if self.gateways.values().any(|g| g.name == name) {
            return Err(GatewayError::DuplicateName(name.to_string()));
        }

        let mut raw = [0u8; TOKEN_BYTES];
        rand::rngs::OsRng.fill_bytes(&mut raw);
        let token = BASE64.encode(raw);

        let gateway = Gateway {
            id: id.clone(),
            name: name.to_string(),
            verification: VerificationStatus::Unverified,
            status: DeviceStatus::Offline,
            last_seen: at,
            token_hash: hash_token(&token),
        };
        self.gateways.insert(id, gateway.clone());
        Ok((gateway, token))
    }

    /// Register a gateway by name + enrollment token. On a digest match
    /// the gateway becomes verified and available.
    pub fn register(
        &mut self,
        name: &str,
        token: &str,
        at: DateTime<Utc>,
    ) -> Result<Gateway, GatewayError> {
        let gateway = self
            .gateways
            .values_mut()
            .find(|g| g.name == name)
            .ok_or_else(|| GatewayError::NotFound(name.to_string()))?;

        if hash_token(token) != gateway.token_hash {
            return Err(GatewayError::TokenMismatch(name.to_string()));
        }

        gateway.verification = VerificationStatus::Verified;
        gateway.status = DeviceStatus::Available;
        gateway.last_seen = at;
        Ok(gateway.clone())
    }

    /// Refresh a gateway's `last_seen` on heartbeat; an offline gateway
    /// comes back available.
    pub fn touch(&mut self, id: &str, at: DateTime<Utc>) -> Result<(), GatewayError> {
        let gateway = self
            .gateways
            .get_mut(id)
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))?;
        gateway.last_seen = at;
        if gateway.status == DeviceStatus::Offline {
            gateway.status = DeviceStatus::Available;
        }
        Ok(())
    }

    /// Get a gateway by id.
    pub fn get(&self, id: &str) -> Result<Gateway, GatewayError> {
        self.gateways
            .get(id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))
    }

    /// List all gateways.
    pub fn list(&self) -> Vec<Gateway> {
        self.gateways.values().cloned().collect()
    }
}
