//! Job group submission.
//!
//! All-or-nothing: validation happens in full before the first mutation,
//! under the same write lock, so a failed submission leaves no jobs, no
//! group, and no device-state changes behind.

use std::collections::HashSet;

use testbed_protocol::ops::Assignment;
use testbed_protocol::DeviceStatus;

use crate::coordinator::{next_id, Coordinator};
use crate::error::CoordinatorError;
use crate::state::{now, Job, JobGroup};

use super::queries::JobGroupDetail;

impl Coordinator {
    /// Submit a job group: one job per assignment, each pinning a device
    /// to a source file. Devices are reserved at submission.
    pub fn submit(
        &self,
        name: &str,
        owner_id: &str,
        assignments: &[Assignment],
    ) -> Result<JobGroupDetail, CoordinatorError> {
        if name.trim().is_empty() {
            return Err(CoordinatorError::Validation(
                "job group name must not be empty".to_string(),
            ));
        }
        if assignments.is_empty() {
            return Err(CoordinatorError::Validation(
                "assignments must not be empty".to_string(),
            ));
        }
        if assignments.len() > self.config().max_jobs_per_group {
            return Err(CoordinatorError::Validation(format!(
                "assignments exceed the maximum of {} jobs per group",
                self.config().max_jobs_per_group
            )));
        }

        // A device cannot run two jobs from the same group concurrently.
        let mut seen_devices = HashSet::new();
        for assignment in assignments {
            if !seen_devices.insert(assignment.device_id.as_str()) {
                return Err(CoordinatorError::DuplicateDevice(
                    assignment.device_id.clone(),
                ));
            }
        }

        let mut inner = self.write();

        // Resolve every reference before mutating anything.
        for assignment in assignments {
            let device = inner.devices.get(&assignment.device_id).map_err(|_| {
                CoordinatorError::Validation(format!(
                    "unknown device '{}'",
                    assignment.device_id
                ))
            })?;
            match device.status {
                DeviceStatus::Available => {}
                DeviceStatus::Busy => {
                    return Err(CoordinatorError::DeviceBusy(assignment.device_id.clone()))
                }
                DeviceStatus::Offline => {
                    return Err(CoordinatorError::DeviceOffline(assignment.device_id.clone()))
                }
            }

            inner
                .files
                .get(&assignment.source_file_id, owner_id)
                .map_err(|_| {
                    CoordinatorError::Validation(format!(
                        "unknown file '{}'",
                        assignment.source_file_id
                    ))
                })?;
        }

        // Claim the devices. The claim re-validates status atomically; a
        // failure here rolls back the claims already taken.
        let mut claimed: Vec<&str> = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            if let Err(err) = inner.devices.claim(&assignment.device_id) {
                for device_id in claimed {
                    let _ = inner.devices.release(device_id);
                }
                return Err(err.into());
            }
            claimed.push(&assignment.device_id);
        }

        // Create the rows.
        let at = now();
        let group_id = next_id();
        let mut job_ids = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let job = Job::new(
                next_id(),
                group_id.clone(),
                assignment.device_id.clone(),
                assignment.source_file_id.clone(),
                at,
            );
            job_ids.push(job.id.clone());
            inner.jobs.insert(job.id.clone(), job);
        }

        let group = JobGroup::new(
            group_id.clone(),
            name.to_string(),
            owner_id.to_string(),
            job_ids,
            at,
        );
        inner.groups.insert(group_id.clone(), group);

        let group = &inner.groups[&group_id];
        Ok(JobGroupDetail::assemble(group, &inner.jobs))
    }
}
