//! Cancel operation types.
//!
//! Withdraws a whole job group; individual jobs cannot be cancelled.

use crate::status::JobStatus;
use serde::{Deserialize, Serialize};

/// Cancel request payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelRequest {
    /// The job group to cancel.
    pub group_id: String,
}

/// Cancel response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelResponse {
    /// Echoed group id.
    pub group_id: String,
    /// The group's status after cancellation (`cancelled`, or `failed`
    /// when a member had already failed).
    pub status: JobStatus,
    /// How many member jobs were moved to `cancelled`.
    pub cancelled_jobs: usize,
}
