//! Probe operation handler.
//!
//! Version and feature discovery.

use testbed_protocol::ops::ProbeResponse;
use testbed_protocol::{RpcError, COORDINATOR_VERSION};

use crate::config::CoordinatorConfig;

use super::to_payload;

/// Handle the probe operation.
pub fn handle(config: &CoordinatorConfig) -> Result<serde_json::Value, RpcError> {
    to_payload(&ProbeResponse {
        coordinator_version: COORDINATOR_VERSION.to_string(),
        protocol_min: config.protocol_min,
        protocol_max: config.protocol_max,
        features: config.features.clone(),
    })
}
