//! Coordinator error taxonomy.
//!
//! Every mutating operation is atomic, so all errors are local-only:
//! nothing is retried inside the core and there are no partial commits
//! to recover from.

use testbed_protocol::{ErrorCode, JobStatus, RpcError};

use crate::files::FileError;
use crate::registry::{DeviceError, GatewayError};
use crate::state::TransitionError;

/// Errors surfaced by coordinator operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CoordinatorError {
    /// Malformed or semantically invalid submission; no state mutated.
    #[error("{0}")]
    Validation(String),

    /// The same device appears twice in one submission.
    #[error("device '{0}' appears more than once in the submission")]
    DuplicateDevice(String),

    /// Reference to a nonexistent entity.
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    /// Device already claimed by a non-terminal job.
    #[error("device '{0}' is claimed by a non-terminal job")]
    DeviceBusy(String),

    /// Device has not been seen in a recent heartbeat.
    #[error("device '{0}' is offline")]
    DeviceOffline(String),

    /// The device is referenced by job history and cannot be removed.
    #[error("device '{0}' is referenced by job history")]
    DeviceInUse(String),

    /// A device or gateway with this name already exists in its scope.
    #[error("name '{0}' is already registered")]
    DuplicateName(String),

    /// Name fails the naming rule.
    #[error("invalid name '{0}'")]
    InvalidName(String),

    /// Out-of-order or duplicate status report from the execution agent.
    /// Treated as a caller bug and surfaced, never silently corrected.
    #[error("job '{job_id}' cannot transition from {from} to {to}")]
    InvalidTransition {
        job_id: String,
        from: JobStatus,
        to: JobStatus,
    },

    /// The file is referenced by a non-terminal job.
    #[error("file '{0}' is referenced by a non-terminal job")]
    FileInUse(String),

    /// The presented gateway enrollment token does not match.
    #[error("enrollment token mismatch for gateway '{0}'")]
    TokenMismatch(String),

    /// The job group is already in a terminal status.
    #[error("job group '{group_id}' already finished as {status}")]
    GroupFinished { group_id: String, status: JobStatus },
}

impl CoordinatorError {
    /// The stable wire code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::Validation,
            Self::DuplicateDevice(_) => ErrorCode::DuplicateDevice,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::DeviceBusy(_) => ErrorCode::DeviceBusy,
            Self::DeviceOffline(_) => ErrorCode::DeviceOffline,
            Self::DeviceInUse(_) => ErrorCode::DeviceInUse,
            Self::DuplicateName(_) => ErrorCode::DuplicateName,
            Self::InvalidName(_) => ErrorCode::Validation,
            Self::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            Self::FileInUse(_) => ErrorCode::FileInUse,
            Self::TokenMismatch(_) => ErrorCode::TokenMismatch,
            Self::GroupFinished { .. } => ErrorCode::GroupFinished,
        }
    }
}

impl From<CoordinatorError> for RpcError {
    fn from(err: CoordinatorError) -> Self {
        let data = match &err {
            CoordinatorError::NotFound { kind, id } => {
                Some(serde_json::json!({ "kind": kind, "id": id }))
            }
            CoordinatorError::DuplicateDevice(id)
            | CoordinatorError::DeviceBusy(id)
            | CoordinatorError::DeviceOffline(id)
            | CoordinatorError::DeviceInUse(id) => {
                Some(serde_json::json!({ "device_id": id }))
            }
            CoordinatorError::InvalidTransition { job_id, from, to } => Some(serde_json::json!({
                "job_id": job_id,
                "from": from,
                "to": to,
            })),
            CoordinatorError::FileInUse(id) => Some(serde_json::json!({ "file_id": id })),
            CoordinatorError::GroupFinished { group_id, status } => Some(serde_json::json!({
                "group_id": group_id,
                "status": status,
            })),
            _ => None,
        };

        match data {
            Some(data) => RpcError::with_data(err.code(), err.to_string(), data),
            None => RpcError::new(err.code(), err.to_string()),
        }
    }
}

impl From<DeviceError> for CoordinatorError {
    fn from(err: DeviceError) -> Self {
        match err {
            DeviceError::NotFound(id) => Self::NotFound { kind: "device", id },
            DeviceError::AlreadyBusy(id) => Self::DeviceBusy(id),
            DeviceError::Offline(id) => Self::DeviceOffline(id),
            DeviceError::DuplicateName { name, .. } => Self::DuplicateName(name),
            DeviceError::InvalidName(name) => Self::InvalidName(name),
        }
    }
}

impl From<GatewayError> for CoordinatorError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotFound(id) => Self::NotFound { kind: "gateway", id },
            GatewayError::DuplicateName(name) => Self::DuplicateName(name),
            GatewayError::TokenMismatch(name) => Self::TokenMismatch(name),
            GatewayError::InvalidName(name) => Self::InvalidName(name),
        }
    }
}

impl From<FileError> for CoordinatorError {
    fn from(err: FileError) -> Self {
        match err {
            FileError::NotFound(id) => Self::NotFound { kind: "file", id },
        }
    }
}

impl CoordinatorError {
    /// Wrap a transition rejection with the offending job id.
    pub fn from_transition(job_id: &str, err: TransitionError) -> Self {
        Self::InvalidTransition {
            job_id: job_id.to_string(),
            from: err.from,
            to: err.to,
        }
    }
}
