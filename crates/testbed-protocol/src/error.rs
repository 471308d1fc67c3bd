//! Error types for the RPC protocol.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error codes returned in RPC error responses.
///
/// These codes are stable and used for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed JSON, missing required fields, or invalid field values.
    InvalidRequest,
    /// Protocol version is outside the supported range.
    UnsupportedProtocol,
    /// Unknown operation requested.
    UnknownOperation,
    /// Semantically invalid submission (unknown or unavailable reference).
    Validation,
    /// The referenced device, gateway, file, job, or group does not exist.
    NotFound,
    /// Device is already claimed by a non-terminal job.
    DeviceBusy,
    /// Device has not been seen in a recent heartbeat.
    DeviceOffline,
    /// The device is referenced by job history and cannot be removed.
    DeviceInUse,
    /// A device or gateway with this name already exists in its scope.
    DuplicateName,
    /// The same device appears twice in one submission.
    DuplicateDevice,
    /// The execution agent reported an out-of-order or duplicate status.
    InvalidTransition,
    /// The file is referenced by a non-terminal job and cannot be removed.
    FileInUse,
    /// The presented gateway enrollment token does not match.
    TokenMismatch,
    /// The job group is already in a terminal status.
    GroupFinished,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRequest => write!(f, "INVALID_REQUEST"),
            Self::UnsupportedProtocol => write!(f, "UNSUPPORTED_PROTOCOL"),
            Self::UnknownOperation => write!(f, "UNKNOWN_OPERATION"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::DeviceBusy => write!(f, "DEVICE_BUSY"),
            Self::DeviceOffline => write!(f, "DEVICE_OFFLINE"),
            Self::DeviceInUse => write!(f, "DEVICE_IN_USE"),
            Self::DuplicateName => write!(f, "DUPLICATE_NAME"),
            Self::DuplicateDevice => write!(f, "DUPLICATE_DEVICE"),
            Self::InvalidTransition => write!(f, "INVALID_TRANSITION"),
            Self::FileInUse => write!(f, "FILE_IN_USE"),
            Self::TokenMismatch => write!(f, "TOKEN_MISMATCH"),
            Self::GroupFinished => write!(f, "GROUP_FINISHED"),
        }
    }
}

/// RPC error response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError {
    /// Error code from the registry.
    pub code: ErrorCode,
    /// Human-readable, single-line error message.
    pub message: String,
    /// Optional machine-readable details (failing field, offending id).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl RpcError {
    /// Create a new RPC error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Create a new RPC error with additional data.
    pub fn with_data(code: ErrorCode, message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Create an INVALID_REQUEST error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Create an UNSUPPORTED_PROTOCOL error.
    pub fn unsupported_protocol(version: i32, min: i32, max: i32) -> Self {
        Self::with_data(
            ErrorCode::UnsupportedProtocol,
            format!(
                "protocol_version {} is outside supported range [{}, {}]",
                version, min, max
            ),
            serde_json::json!({
                "requested": version,
                "min": min,
                "max": max
            }),
        )
    }

    /// Create an UNKNOWN_OPERATION error.
    pub fn unknown_operation(op: &str) -> Self {
        Self::with_data(
            ErrorCode::UnknownOperation,
            format!("unknown operation: {}", op),
            serde_json::json!({ "op": op }),
        )
    }

    /// Create a NOT_FOUND error for an entity of the given kind.
    pub fn not_found(kind: &str, id: &str) -> Self {
        Self::with_data(
            ErrorCode::NotFound,
            format!("{} '{}' not found", kind, id),
            serde_json::json!({ "kind": kind, "id": id }),
        )
    }

    /// Create a DEVICE_BUSY error.
    pub fn device_busy(device_id: &str) -> Self {
        Self::with_data(
            ErrorCode::DeviceBusy,
            format!("device '{}' is claimed by a non-terminal job", device_id),
            serde_json::json!({ "device_id": device_id }),
        )
    }

    /// Create an INVALID_TRANSITION error.
    pub fn invalid_transition(job_id: &str, from: &str, to: &str) -> Self {
        Self::with_data(
            ErrorCode::InvalidTransition,
            format!("job '{}' cannot transition from {} to {}", job_id, from, to),
            serde_json::json!({ "job_id": job_id, "from": from, "to": to }),
        )
    }

    /// Create a FILE_IN_USE error.
    pub fn file_in_use(file_id: &str) -> Self {
        Self::with_data(
            ErrorCode::FileInUse,
            format!("file '{}' is referenced by a non-terminal job", file_id),
            serde_json::json!({ "file_id": file_id }),
        )
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for RpcError {}
