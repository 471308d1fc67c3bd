//! Job lifecycle record.
//!
//! One unit of work: one device running one source file. Transitions are
//! driven exclusively by the coordinator; timestamps are append-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use testbed_protocol::JobStatus;

/// Attempted transition violates the job state machine.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid state transition from {from} to {to}")]
pub struct TransitionError {
    pub from: JobStatus,
    pub to: JobStatus,
}

/// A single job row. Field names match the wire contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Job identifier.
    pub id: String,
    /// Parent job group.
    pub group_id: String,
    /// The device this job is pinned to.
    pub device_id: String,
    /// Input file reference.
    pub source_file_id: String,
    /// Output file reference; set exactly once, on completion.
    pub output_file_id: Option<String>,
    /// Current lifecycle status.
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    /// Set on the transition into `running`, immutable afterwards.
    pub started_at: Option<DateTime<Utc>>,
    /// Set on the transition into a terminal status, immutable afterwards.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Create a new job in `pending`.
    pub fn new(
        id: String,
        group_id: String,
        device_id: String,
        source_file_id: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            group_id,
            device_id,
            source_file_id,
            output_file_id: None,
            status: JobStatus::Pending,
            created_at,
            started_at: None,
            completed_at: None,
        }
    }

    /// Transition to a new status, stamping timestamps as thresholds are
    /// crossed.
    pub fn transition(
        &mut self,
        to: JobStatus,
        at: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        if !self.status.can_transition_to(to) {
            return Err(TransitionError {
                from: self.status,
                to,
            });
        }

        self.status = to;
        if to == JobStatus::Running {
            self.started_at = Some(at);
        }
        if to.is_terminal() {
            self.completed_at = Some(at);
        }

        Ok(())
    }

    /// Start the job (`pending` → `running`).
    pub fn start(&mut self, at: DateTime<Utc>) -> Result<(), TransitionError> {
        self.transition(JobStatus::Running, at)
    }

    /// Complete the job, attaching its output file.
    pub fn complete(
        &mut self,
        output_file_id: String,
        at: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        self.transition(JobStatus::Completed, at)?;
        self.output_file_id = Some(output_file_id);
        Ok(())
    }

    /// Fail the job.
    pub fn fail(&mut self, at: DateTime<Utc>) -> Result<(), TransitionError> {
        self.transition(JobStatus::Failed, at)
    }

    /// Cancel the job (group cancellation path only).
    pub fn cancel(&mut self, at: DateTime<Utc>) -> Result<(), TransitionError> {
        self.transition(JobStatus::Cancelled, at)
    }

    /// Check if the job is in a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::now;

    fn make_job() -> Job {
        Job::new(
            "job-1".to_string(),
            "group-1".to_string(),
            "device-1".to_string(),
            "file-1".to_string(),
            now(),
        )
    }

    #[test]
    fn test_new_job_is_pending() {
        let job = make_job();
        assert_eq!(job.status, JobStatus::Pending);
        assert!(job.started_at.is_none());
        assert!(job.completed_at.is_none());
        assert!(job.output_file_id.is_none());
    }

    #[test]
    fn test_happy_path_stamps_timestamps() {
        let mut job = make_job();

        job.start(now()).unwrap();
        assert_eq!(job.status, JobStatus::Running);
        assert!(job.started_at.is_some());
        assert!(job.completed_at.is_none());

        job.complete("file-out".to_string(), now()).unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.completed_at.is_some());
        assert_eq!(job.output_file_id.as_deref(), Some("file-out"));
    }

    #[test]
    fn test_fail_from_running() {
        let mut job = make_job();
        job.start(now()).unwrap();
        job.fail(now()).unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.completed_at.is_some());
        assert!(job.output_file_id.is_none());
    }

    #[test]
    fn test_cannot_skip_running() {
        let mut job = make_job();
        let err = job.complete("file-out".to_string(), now()).unwrap_err();
        assert_eq!(err.from, JobStatus::Pending);
        assert_eq!(err.to, JobStatus::Completed);
        // Nothing was mutated by the failed transition
        assert_eq!(job.status, JobStatus::Pending);
        assert!(job.output_file_id.is_none());
    }

    #[test]
    fn test_duplicate_start_rejected() {
        let mut job = make_job();
        job.start(now()).unwrap();
        let first_start = job.started_at;

        assert!(job.start(now()).is_err());
        // The rejected transition did not restamp
        assert_eq!(job.started_at, first_start);
    }

    #[test]
    fn test_terminal_is_a_sink() {
        let mut job = make_job();
        job.start(now()).unwrap();
        job.complete("file-out".to_string(), now()).unwrap();

        assert!(job.start(now()).is_err());
        assert!(job.fail(now()).is_err());
        assert!(job.cancel(now()).is_err());
    }

    #[test]
    fn test_cancel_from_pending() {
        let mut job = make_job();
        job.cancel(now()).unwrap();
        assert_eq!(job.status, JobStatus::Cancelled);
        assert!(job.started_at.is_none());
        assert!(job.completed_at.is_some());
    }

    #[test]
    fn test_cancel_from_running() {
        let mut job = make_job();
        job.start(now()).unwrap();
        job.cancel(now()).unwrap();
        assert_eq!(job.status, JobStatus::Cancelled);
        assert!(job.started_at.is_some());
        assert!(job.completed_at.is_some());
    }

    #[test]
    fn test_wire_form() {
        let job = make_job();
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["id"], "job-1");
        assert_eq!(json["group_id"], "group-1");
        assert_eq!(json["device_id"], "device-1");
        assert_eq!(json["source_file_id"], "file-1");
        assert_eq!(json["status"], "pending");
        assert!(json["started_at"].is_null());
        assert!(json["output_file_id"].is_null());
    }
}
