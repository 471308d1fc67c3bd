//! Status enums shared by the coordinator core and its clients.
//!
//! Values serialize as lowercase strings to match what the UI renders
//! (`"pending"`, `"busy"`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Availability of a device or gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    /// Registered and free to take a job.
    Available,
    /// Claimed by a non-terminal job.
    Busy,
    /// Not seen in a recent heartbeat.
    Offline,
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Busy => write!(f, "busy"),
            Self::Offline => write!(f, "offline"),
        }
    }
}

/// Lifecycle status of a job. Job groups reuse the same value set; a
/// group's status is derived from its members, never set directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Created, device reserved, waiting for the execution agent.
    Pending,
    /// The execution agent reported a start.
    Running,
    /// Finished with an output file attached.
    Completed,
    /// Finished unsuccessfully.
    Failed,
    /// Withdrawn by a group cancellation before finishing.
    Cancelled,
}

impl JobStatus {
    /// Check if no further transitions are possible from this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    /// Check if a transition from this status to `target` is valid.
    ///
    /// `cancelled` is reachable only through group cancellation; the
    /// `advance` operation additionally rejects it as a target.
    pub fn can_transition_to(&self, target: JobStatus) -> bool {
        match (self, target) {
            (JobStatus::Pending, JobStatus::Running) => true,
            (JobStatus::Pending, JobStatus::Cancelled) => true,
            (JobStatus::Running, JobStatus::Completed) => true,
            (JobStatus::Running, JobStatus::Failed) => true,
            (JobStatus::Running, JobStatus::Cancelled) => true,
            _ => false,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Whether a gateway has proven possession of its enrollment token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    /// Created by an admin, token not yet presented.
    Unverified,
    /// Token hash matched on register.
    Verified,
}
