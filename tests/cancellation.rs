//! Group cancellation tests. Cancellation withdraws every non-terminal
//! member in one step and releases their devices; settled jobs keep
//! their outcome.

mod common;

use common::{assignments, testbed, OWNER};
use testbed_coordinator::CoordinatorError;
use testbed_protocol::{DeviceStatus, JobStatus};

#[test]
fn test_cancel_mid_flight_group() {
    let (coordinator, _, device_ids, file_id) = testbed(2);
    let group = coordinator
        .submit("temp-test", OWNER, &assignments(&device_ids, &file_id))
        .unwrap();

    // One job running, one still pending
    coordinator
        .advance(&group.jobs[0].id, JobStatus::Running, None)
        .unwrap();

    let (status, cancelled) = coordinator.cancel_group(&group.id, OWNER).unwrap();
    assert_eq!(status, JobStatus::Cancelled);
    assert_eq!(cancelled, 2);

    let fetched = coordinator.get_group(&group.id, OWNER).unwrap();
    assert_eq!(fetched.status, JobStatus::Cancelled);
    assert!(fetched.completed_at.is_some());
    for job in &fetched.jobs {
        assert_eq!(job.status, JobStatus::Cancelled);
        assert!(job.completed_at.is_some());
    }

    // Devices released
    for device_id in &device_ids {
        assert_eq!(
            coordinator.get_device(device_id).unwrap().status,
            DeviceStatus::Available
        );
    }
}

#[test]
fn test_cancel_pending_group_never_started() {
    let (coordinator, _, device_ids, file_id) = testbed(1);
    let group = coordinator
        .submit("untouched", OWNER, &assignments(&device_ids, &file_id))
        .unwrap();

    let (status, cancelled) = coordinator.cancel_group(&group.id, OWNER).unwrap();
    assert_eq!(status, JobStatus::Cancelled);
    assert_eq!(cancelled, 1);

    // Never ran: started_at stays unset even though completed_at is stamped
    let fetched = coordinator.get_group(&group.id, OWNER).unwrap();
    assert!(fetched.started_at.is_none());
    assert!(fetched.completed_at.is_some());
}

#[test]
fn test_cancel_keeps_settled_outcomes() {
    let (coordinator, _, device_ids, file_id) = testbed(2);
    let group = coordinator
        .submit("partial", OWNER, &assignments(&device_ids, &file_id))
        .unwrap();

    // First job already failed before the cancel arrives
    coordinator
        .advance(&group.jobs[0].id, JobStatus::Running, None)
        .unwrap();
    coordinator
        .advance(&group.jobs[0].id, JobStatus::Failed, None)
        .unwrap();

    let (status, cancelled) = coordinator.cancel_group(&group.id, OWNER).unwrap();
    // Only the pending job was withdrawn; the failed member keeps its
    // outcome and wins the group derivation.
    assert_eq!(cancelled, 1);
    assert_eq!(status, JobStatus::Failed);

    let fetched = coordinator.get_group(&group.id, OWNER).unwrap();
    assert_eq!(fetched.jobs[0].status, JobStatus::Failed);
    assert_eq!(fetched.jobs[1].status, JobStatus::Cancelled);
}

#[test]
fn test_cancelled_job_rejects_agent_reports() {
    let (coordinator, _, device_ids, file_id) = testbed(1);
    let group = coordinator
        .submit("temp-test", OWNER, &assignments(&device_ids, &file_id))
        .unwrap();
    coordinator.cancel_group(&group.id, OWNER).unwrap();

    let err = coordinator
        .advance(&group.jobs[0].id, JobStatus::Running, None)
        .unwrap_err();
    assert!(matches!(err, CoordinatorError::InvalidTransition { .. }));
}

#[test]
fn test_cancel_terminal_group_rejected() {
    let (coordinator, _, device_ids, file_id) = testbed(1);
    let group = coordinator
        .submit("temp-test", OWNER, &assignments(&device_ids, &file_id))
        .unwrap();

    // Double cancel
    coordinator.cancel_group(&group.id, OWNER).unwrap();
    let err = coordinator.cancel_group(&group.id, OWNER).unwrap_err();
    assert!(matches!(err, CoordinatorError::GroupFinished { .. }));

    // Cancel after completion is also rejected
    let group = coordinator
        .submit("finished", OWNER, &assignments(&device_ids, &file_id))
        .unwrap();
    let job_id = group.jobs[0].id.clone();
    coordinator.advance(&job_id, JobStatus::Running, None).unwrap();
    let output = coordinator.register_file("out.log", OWNER).unwrap();
    coordinator
        .advance(&job_id, JobStatus::Completed, Some(&output.id))
        .unwrap();

    let err = coordinator.cancel_group(&group.id, OWNER).unwrap_err();
    assert!(matches!(
        err,
        CoordinatorError::GroupFinished {
            status: JobStatus::Completed,
            ..
        }
    ));
}

#[test]
fn test_cancel_owner_scoped() {
    let (coordinator, _, device_ids, file_id) = testbed(1);
    let group = coordinator
        .submit("mine", OWNER, &assignments(&device_ids, &file_id))
        .unwrap();

    let err = coordinator.cancel_group(&group.id, "user-2").unwrap_err();
    assert!(matches!(err, CoordinatorError::NotFound { .. }));

    // Still pending and claimable by its owner
    let fetched = coordinator.get_group(&group.id, OWNER).unwrap();
    assert_eq!(fetched.status, JobStatus::Pending);
}

#[test]
fn test_cancel_releases_file_references() {
    let (coordinator, _, device_ids, file_id) = testbed(1);
    let group = coordinator
        .submit("holds-file", OWNER, &assignments(&device_ids, &file_id))
        .unwrap();

    // Blocked while the job is non-terminal
    let err = coordinator.remove_file(&file_id, OWNER).unwrap_err();
    assert!(matches!(err, CoordinatorError::FileInUse(_)));

    coordinator.cancel_group(&group.id, OWNER).unwrap();

    // Terminal jobs no longer pin the file
    assert!(coordinator.remove_file(&file_id, OWNER).is_ok());
}
