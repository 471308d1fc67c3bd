//! Read paths: group detail/listing, status and queue reports, jobs.
//!
//! Readers take the read lock only; a listing racing an in-flight
//! `advance` reflects the last committed transition.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use testbed_protocol::ops::{DeviceBrief, GroupStatusResponse, JobStats, QueueEntry};
use testbed_protocol::{DeviceStatus, JobStatus};

use crate::coordinator::{Coordinator, Inner};
use crate::error::CoordinatorError;
use crate::state::{Job, JobGroup};

/// A job group with its member jobs materialized, in submission order.
/// This is the wire shape the UI consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobGroupDetail {
    pub id: String,
    pub name: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub jobs: Vec<Job>,
}

impl JobGroupDetail {
    pub(crate) fn assemble(group: &JobGroup, jobs: &BTreeMap<String, Job>) -> Self {
        Self {
            id: group.id.clone(),
            name: group.name.clone(),
            status: group.status,
            created_at: group.created_at,
            started_at: group.started_at,
            completed_at: group.completed_at,
            jobs: group
                .job_ids
                .iter()
                .filter_map(|id| jobs.get(id))
                .cloned()
                .collect(),
        }
    }
}

fn device_briefs(inner: &Inner, group: &JobGroup) -> Vec<DeviceBrief> {
    group
        .job_ids
        .iter()
        .filter_map(|id| inner.jobs.get(id))
        .filter_map(|job| inner.devices.get(&job.device_id).ok())
        .map(|device| DeviceBrief {
            device_id: device.id,
            name: device.name,
            status: device.status,
        })
        .collect()
}

impl Coordinator {
    /// Fetch a job group with its jobs. Another user's group surfaces as
    /// not found.
    pub fn get_group(
        &self,
        group_id: &str,
        owner_id: &str,
    ) -> Result<JobGroupDetail, CoordinatorError> {
        let inner = self.read();
        let group = inner
            .groups
            .get(group_id)
            .filter(|g| g.owner_id == owner_id)
            .ok_or_else(|| CoordinatorError::NotFound {
                kind: "job group",
                id: group_id.to_string(),
            })?;
        Ok(JobGroupDetail::assemble(group, &inner.jobs))
    }

    /// List one user's job groups, newest first.
    pub fn list_groups(&self, owner_id: &str) -> Vec<JobGroupDetail> {
        let inner = self.read();
        let mut details: Vec<JobGroupDetail> = inner
            .groups
            .values()
            .filter(|g| g.owner_id == owner_id)
            .map(|g| JobGroupDetail::assemble(g, &inner.jobs))
            .collect();
        // ULIDs are creation-ordered; newest first.
        details.sort_by(|a, b| b.id.cmp(&a.id));
        details
    }

    /// Status report for one group: derived status, per-status job
    /// counts, and the member devices.
    pub fn group_status(
        &self,
        group_id: &str,
        owner_id: &str,
    ) -> Result<GroupStatusResponse, CoordinatorError> {
        let inner = self.read();
        let group = inner
            .groups
            .get(group_id)
            .filter(|g| g.owner_id == owner_id)
            .ok_or_else(|| CoordinatorError::NotFound {
                kind: "job group",
                id: group_id.to_string(),
            })?;

        let mut stats = JobStats::default();
        for status in group
            .job_ids
            .iter()
            .filter_map(|id| inner.jobs.get(id))
            .map(|j| j.status)
        {
            stats.total += 1;
            match status {
                JobStatus::Pending => stats.pending += 1,
                JobStatus::Running => stats.running += 1,
                JobStatus::Completed => stats.completed += 1,
                JobStatus::Failed => stats.failed += 1,
                JobStatus::Cancelled => stats.cancelled += 1,
            }
        }

        Ok(GroupStatusResponse {
            group_status: group.status,
            job_stats: stats,
            created_at: group.created_at,
            started_at: group.started_at,
            completed_at: group.completed_at,
            devices: device_briefs(&inner, group),
        })
    }

    /// Pending groups for one user, oldest first, each with its devices
    /// and whether the execution agent could dispatch now (no member
    /// device offline; the members are busy with the group's own
    /// reservations).
    pub fn queue(&self, owner_id: &str) -> Vec<QueueEntry> {
        let inner = self.read();
        inner
            .groups
            .values()
            .filter(|g| g.owner_id == owner_id && g.status == JobStatus::Pending)
            .map(|group| {
                let devices = device_briefs(&inner, group);
                let ready_to_run = devices
                    .iter()
                    .all(|d| d.status != DeviceStatus::Offline);
                QueueEntry {
                    group_id: group.id.clone(),
                    name: group.name.clone(),
                    created_at: group.created_at,
                    devices,
                    ready_to_run,
                }
            })
            .collect()
    }

    /// Fetch a single job.
    pub fn get_job(&self, job_id: &str) -> Result<Job, CoordinatorError> {
        self.read()
            .jobs
            .get(job_id)
            .cloned()
            .ok_or_else(|| CoordinatorError::NotFound {
                kind: "job",
                id: job_id.to_string(),
            })
    }

    /// List all jobs, oldest first.
    pub fn list_jobs(&self) -> Vec<Job> {
        self.read().jobs.values().cloned().collect()
    }
}
