//! Advance operation types.
//!
//! Called by the execution agent to report job progress. Valid targets are
//! `running`, `completed`, and `failed`; duplicate or out-of-order reports
//! are rejected rather than absorbed.

use crate::status::JobStatus;
use serde::{Deserialize, Serialize};

/// Advance request payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceRequest {
    /// The job being reported on.
    pub job_id: String,
    /// The status the agent observed.
    pub status: JobStatus,
    /// Output file reference; required when `status` is `completed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file_id: Option<String>,
}

/// Advance response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceResponse {
    /// Echoed job id.
    pub job_id: String,
    /// The job's committed status.
    pub status: JobStatus,
    /// Parent group id.
    pub group_id: String,
    /// The group's recomputed status.
    pub group_status: JobStatus,
}
