//! Job group lifecycle record.
//!
//! A group's status is a pure function of its members' statuses,
//! recomputed after every member transition.

use chrono::{DateTime, Utc};
use testbed_protocol::JobStatus;

/// Derive a group status from its members' statuses.
///
/// - all `pending` → `pending`
/// - all terminal → `failed` if any failed, else `cancelled` if any
///   cancelled, else `completed`
/// - anything else → `running`
pub fn derive_group_status(statuses: &[JobStatus]) -> JobStatus {
    if statuses.iter().all(|s| *s == JobStatus::Pending) {
        return JobStatus::Pending;
    }
    if statuses.iter().all(|s| s.is_terminal()) {
        if statuses.iter().any(|s| *s == JobStatus::Failed) {
            return JobStatus::Failed;
        }
        if statuses.iter().any(|s| *s == JobStatus::Cancelled) {
            return JobStatus::Cancelled;
        }
        return JobStatus::Completed;
    }
    JobStatus::Running
}

/// A job group row: a named batch of jobs submitted together.
///
/// The member set is fixed at submission; jobs are stored separately and
/// referenced by id in submission order.
#[derive(Debug, Clone)]
pub struct JobGroup {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    /// Derived status; see [`derive_group_status`].
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    /// Set when the first member enters `running`, immutable afterwards.
    pub started_at: Option<DateTime<Utc>>,
    /// Set when the last member reaches a terminal status.
    pub completed_at: Option<DateTime<Utc>>,
    /// Member job ids, submission order.
    pub job_ids: Vec<String>,
}

impl JobGroup {
    /// Create a new group in `pending` over the given member jobs.
    pub fn new(
        id: String,
        name: String,
        owner_id: String,
        job_ids: Vec<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            owner_id,
            status: JobStatus::Pending,
            created_at,
            started_at: None,
            completed_at: None,
            job_ids,
        }
    }

    /// Recompute the derived status after a member transition and stamp
    /// group timestamps when thresholds are crossed.
    ///
    /// `started_at` stamps when the group first becomes `running`; a group
    /// cancelled straight out of `pending` never gets one. `completed_at`
    /// stamps when the group reaches a terminal status.
    pub fn recompute(&mut self, member_statuses: &[JobStatus], at: DateTime<Utc>) -> JobStatus {
        let derived = derive_group_status(member_statuses);
        self.status = derived;

        if self.started_at.is_none() && derived == JobStatus::Running {
            self.started_at = Some(at);
        }
        if self.completed_at.is_none() && derived.is_terminal() {
            self.completed_at = Some(at);
        }

        derived
    }

    /// Check if the group is in a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
