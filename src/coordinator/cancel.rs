//! Job group cancellation.
//!
//! Cancellation is a group-level operation: every non-terminal member is
//! moved to `cancelled` in one atomic step and its device is released.
//! Jobs that already finished keep their outcome, so a group with a
//! failed member settles as `failed` rather than `cancelled`.

use testbed_protocol::JobStatus;

use crate::coordinator::Coordinator;
use crate::error::CoordinatorError;
use crate::state::now;

impl Coordinator {
    /// Cancel a job group. Rejected once the group is terminal.
    ///
    /// Returns the group's settled status and how many member jobs were
    /// moved to `cancelled`.
    pub fn cancel_group(
        &self,
        group_id: &str,
        owner_id: &str,
    ) -> Result<(JobStatus, usize), CoordinatorError> {
        let mut inner = self.write();

        let group = inner
            .groups
            .get(group_id)
            .filter(|g| g.owner_id == owner_id)
            .ok_or_else(|| CoordinatorError::NotFound {
                kind: "job group",
                id: group_id.to_string(),
            })?;
        if group.is_terminal() {
            return Err(CoordinatorError::GroupFinished {
                group_id: group_id.to_string(),
                status: group.status,
            });
        }

        let at = now();
        let job_ids = group.job_ids.clone();
        let mut cancelled = 0;
        let mut released_devices = Vec::new();

        for job_id in &job_ids {
            let Some(job) = inner.jobs.get_mut(job_id) else {
                continue;
            };
            if job.is_terminal() {
                continue;
            }
            job.cancel(at)
                .map_err(|e| CoordinatorError::from_transition(job_id, e))?;
            cancelled += 1;
            released_devices.push((job.device_id.clone(), job.id.clone()));
        }

        for (device_id, job_id) in released_devices {
            if !inner.device_in_active_use(&device_id, &job_id) {
                let _ = inner.devices.release(&device_id);
            }
        }

        let statuses: Vec<JobStatus> = job_ids
            .iter()
            .filter_map(|id| inner.jobs.get(id))
            .map(|j| j.status)
            .collect();
        let group = inner
            .groups
            .get_mut(group_id)
            .ok_or_else(|| CoordinatorError::NotFound {
                kind: "job group",
                id: group_id.to_string(),
            })?;
        let status = group.recompute(&statuses, at);

        Ok((status, cancelled))
    }
}
