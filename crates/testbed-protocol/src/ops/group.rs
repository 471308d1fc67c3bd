//! Job group query types.

use crate::status::{DeviceStatus, JobStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Group get request payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupGetRequest {
    /// The job group to fetch.
    pub group_id: String,
}

/// Group status request payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupStatusRequest {
    /// The job group to report on.
    pub group_id: String,
}

/// Per-status job counts for one group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStats {
    pub total: usize,
    pub pending: usize,
    pub running: usize,
    pub completed: usize,
    pub failed: usize,
    pub cancelled: usize,
}

/// A device as it appears in status and queue reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceBrief {
    pub device_id: String,
    pub name: String,
    pub status: DeviceStatus,
}

/// Group status response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupStatusResponse {
    /// The group's derived status.
    pub group_status: JobStatus,
    /// Member job counts by status.
    pub job_stats: JobStats,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// The member devices with their current statuses.
    pub devices: Vec<DeviceBrief>,
}

/// One entry in the pending-group queue report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueEntry {
    pub group_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// The member devices with their current statuses.
    pub devices: Vec<DeviceBrief>,
    /// True when every member device is reachable (none offline). The
    /// devices themselves are busy with the group's own reservations.
    pub ready_to_run: bool,
}
