//! Operation handlers for the coordinator RPC.
//!
//! Each handler parses its payload, calls into the coordinator, and
//! serializes the result; domain errors convert to wire errors via
//! [`crate::error::CoordinatorError`].

pub mod advance;
pub mod cancel;
pub mod devices;
pub mod files;
pub mod gateways;
pub mod groups;
pub mod jobs;
pub mod probe;
pub mod submit;

use serde::de::DeserializeOwned;
use serde::Serialize;
use testbed_protocol::{RpcError, RpcRequest};

/// Parse an operation payload out of the request envelope.
fn parse<T: DeserializeOwned>(request: &RpcRequest) -> Result<T, RpcError> {
    serde_json::from_value(request.payload.clone())
        .map_err(|e| RpcError::invalid_request(format!("invalid {} request: {}", request.op, e)))
}

/// Serialize a response payload.
fn to_payload<T: Serialize>(value: &T) -> Result<serde_json::Value, RpcError> {
    serde_json::to_value(value)
        .map_err(|e| RpcError::invalid_request(format!("failed to serialize response: {}", e)))
}
