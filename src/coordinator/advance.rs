//! Job progression.
//!
//! The execution agent reports `running`, then exactly one of
//! `completed`/`failed`. Duplicate or out-of-order reports are rejected
//! so a double execution cannot be masked.

use testbed_protocol::JobStatus;

use crate::coordinator::Coordinator;
use crate::error::CoordinatorError;
use crate::state::{now, Job};

impl Coordinator {
    /// Advance a job to the status the execution agent observed.
    ///
    /// On completion, `output_file_id` is required and attached to the
    /// job. On entering a terminal status the job's device is released,
    /// unless another non-terminal job still holds it. The parent group's
    /// derived status is recomputed before the call returns.
    ///
    /// Returns the committed job and the group's recomputed status.
    pub fn advance(
        &self,
        job_id: &str,
        status: JobStatus,
        output_file_id: Option<&str>,
    ) -> Result<(Job, JobStatus), CoordinatorError> {
        let mut inner = self.write();

        let current = inner
            .jobs
            .get(job_id)
            .ok_or_else(|| CoordinatorError::NotFound {
                kind: "job",
                id: job_id.to_string(),
            })?
            .status;

        // `pending` is never a target and `cancelled` only enters through
        // group cancellation.
        if matches!(status, JobStatus::Pending | JobStatus::Cancelled) {
            return Err(CoordinatorError::InvalidTransition {
                job_id: job_id.to_string(),
                from: current,
                to: status,
            });
        }

        let output = match status {
            JobStatus::Completed => {
                let id = output_file_id.ok_or_else(|| {
                    CoordinatorError::Validation(
                        "output_file_id is required when completing a job".to_string(),
                    )
                })?;
                if !inner.files.exists(id) {
                    return Err(CoordinatorError::Validation(format!(
                        "unknown output file '{}'",
                        id
                    )));
                }
                Some(id.to_string())
            }
            _ => None,
        };

        let at = now();
        let job = inner.jobs.get_mut(job_id).ok_or_else(|| {
            CoordinatorError::NotFound {
                kind: "job",
                id: job_id.to_string(),
            }
        })?;

        match status {
            JobStatus::Running => job.start(at),
            JobStatus::Completed => {
                // `output` is Some by construction above.
                let output = output.unwrap_or_default();
                job.complete(output, at)
            }
            JobStatus::Failed => job.fail(at),
            JobStatus::Pending | JobStatus::Cancelled => unreachable!("rejected above"),
        }
        .map_err(|e| CoordinatorError::from_transition(job_id, e))?;

        let job = job.clone();

        // Release the device once nothing active holds it.
        if job.is_terminal() && !inner.device_in_active_use(&job.device_id, &job.id) {
            let _ = inner.devices.release(&job.device_id);
        }

        // Recompute the parent group's derived status.
        let group_status = {
            let group = inner.groups.get(&job.group_id).ok_or_else(|| {
                CoordinatorError::NotFound {
                    kind: "job group",
                    id: job.group_id.clone(),
                }
            })?;
            let statuses: Vec<JobStatus> = group
                .job_ids
                .iter()
                .filter_map(|id| inner.jobs.get(id))
                .map(|j| j.status)
                .collect();

            let group = inner.groups.get_mut(&job.group_id).ok_or_else(|| {
                CoordinatorError::NotFound {
                    kind: "job group",
                    id: job.group_id.clone(),
                }
            })?;
            group.recompute(&statuses, at)
        };

        Ok((job, group_status))
    }
}
