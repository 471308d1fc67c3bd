//! Gateway enrollment and heartbeat liveness tests.

mod common;

use common::{assignments, testbed, OWNER};
use testbed_coordinator::{Coordinator, CoordinatorError};
use testbed_protocol::{DeviceStatus, JobStatus, VerificationStatus};

#[test]
fn test_enrollment_flow() {
    let coordinator = Coordinator::default();

    let (gateway, token) = coordinator.create_gateway("lab-north").unwrap();
    assert_eq!(gateway.verification, VerificationStatus::Unverified);
    assert_eq!(gateway.status, DeviceStatus::Offline);

    let registered = coordinator.register_gateway("lab-north", &token).unwrap();
    assert_eq!(registered.verification, VerificationStatus::Verified);
    assert_eq!(registered.status, DeviceStatus::Available);

    let listed = coordinator.list_gateways();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "lab-north");
}

#[test]
fn test_enrollment_bad_token_changes_nothing() {
    let coordinator = Coordinator::default();
    let (gateway, _) = coordinator.create_gateway("lab-north").unwrap();

    let err = coordinator
        .register_gateway("lab-north", "guessed-token")
        .unwrap_err();
    assert!(matches!(err, CoordinatorError::TokenMismatch(_)));

    let fetched = coordinator.get_gateway(&gateway.id).unwrap();
    assert_eq!(fetched.verification, VerificationStatus::Unverified);
    assert_eq!(fetched.status, DeviceStatus::Offline);
}

#[test]
fn test_duplicate_gateway_name_rejected() {
    let coordinator = Coordinator::default();
    coordinator.create_gateway("lab-north").unwrap();

    let err = coordinator.create_gateway("lab-north").unwrap_err();
    assert!(matches!(err, CoordinatorError::DuplicateName(_)));
}

#[test]
fn test_device_register_requires_gateway() {
    let coordinator = Coordinator::default();
    let err = coordinator
        .register_device("pi-01", "no-such-gateway")
        .unwrap_err();
    assert!(matches!(err, CoordinatorError::NotFound { .. }));
}

#[test]
fn test_new_device_offline_until_heartbeat() {
    let coordinator = Coordinator::default();
    let (gateway, token) = coordinator.create_gateway("lab-north").unwrap();
    coordinator.register_gateway("lab-north", &token).unwrap();
    let device = coordinator.register_device("pi-01", &gateway.id).unwrap();

    assert_eq!(device.status, DeviceStatus::Offline);

    // Cannot be targeted until its gateway reports it
    let file = coordinator.register_file("fw.bin", OWNER).unwrap();
    let err = coordinator
        .submit("early", OWNER, &assignments(&[device.id.clone()], &file.id))
        .unwrap_err();
    assert!(matches!(err, CoordinatorError::DeviceOffline(_)));

    let (seen, _) = coordinator
        .heartbeat(&gateway.id, &[device.id.clone()])
        .unwrap();
    assert_eq!(seen, 1);
    assert_eq!(
        coordinator.get_device(&device.id).unwrap().status,
        DeviceStatus::Available
    );
}

#[test]
fn test_heartbeat_omission_marks_offline_and_back() {
    let (coordinator, gateway_id, device_ids, _) = testbed(2);

    let (seen, newly_offline) = coordinator
        .heartbeat(&gateway_id, &device_ids[..1].to_vec())
        .unwrap();
    assert_eq!(seen, 1);
    assert_eq!(newly_offline, 1);
    assert_eq!(
        coordinator.get_device(&device_ids[1]).unwrap().status,
        DeviceStatus::Offline
    );

    // Re-listed on the next heartbeat: back to available
    coordinator.heartbeat(&gateway_id, &device_ids).unwrap();
    assert_eq!(
        coordinator.get_device(&device_ids[1]).unwrap().status,
        DeviceStatus::Available
    );
}

#[test]
fn test_heartbeat_leaves_busy_devices_busy() {
    let (coordinator, gateway_id, device_ids, file_id) = testbed(1);
    coordinator
        .submit("claims", OWNER, &assignments(&device_ids, &file_id))
        .unwrap();

    // The device misses a heartbeat while its job is active: the busy
    // claim is job accounting, not liveness, so it stays busy.
    coordinator.heartbeat(&gateway_id, &[]).unwrap();
    assert_eq!(
        coordinator.get_device(&device_ids[0]).unwrap().status,
        DeviceStatus::Busy
    );
}

#[test]
fn test_heartbeat_refreshes_last_seen() {
    let (coordinator, gateway_id, device_ids, _) = testbed(1);
    let before = coordinator.get_device(&device_ids[0]).unwrap().last_seen;

    coordinator.heartbeat(&gateway_id, &device_ids).unwrap();
    let after = coordinator.get_device(&device_ids[0]).unwrap().last_seen;
    assert!(after >= before);

    let gateway = coordinator.get_gateway(&gateway_id).unwrap();
    assert!(gateway.last_seen >= before);
}

#[test]
fn test_file_guard_follows_job_lifecycle() {
    let (coordinator, _, device_ids, file_id) = testbed(1);
    let group = coordinator
        .submit("pins", OWNER, &assignments(&device_ids, &file_id))
        .unwrap();
    let job_id = group.jobs[0].id.clone();

    assert!(coordinator.file_in_active_use(&file_id));
    assert!(matches!(
        coordinator.remove_file(&file_id, OWNER).unwrap_err(),
        CoordinatorError::FileInUse(_)
    ));

    coordinator.advance(&job_id, JobStatus::Running, None).unwrap();
    assert!(coordinator.file_in_active_use(&file_id));

    coordinator.advance(&job_id, JobStatus::Failed, None).unwrap();
    assert!(!coordinator.file_in_active_use(&file_id));
    assert!(coordinator.remove_file(&file_id, OWNER).is_ok());
}

#[test]
fn test_remove_device_blocked_by_job_history() {
    let (coordinator, gateway_id, device_ids, file_id) = testbed(1);
    let group = coordinator
        .submit("history", OWNER, &assignments(&device_ids, &file_id))
        .unwrap();

    // Active job: blocked
    let err = coordinator.remove_device(&device_ids[0]).unwrap_err();
    assert!(matches!(err, CoordinatorError::DeviceInUse(_)));

    // Terminal jobs are the audit trail: still blocked
    let job_id = group.jobs[0].id.clone();
    coordinator.advance(&job_id, JobStatus::Running, None).unwrap();
    coordinator.advance(&job_id, JobStatus::Failed, None).unwrap();
    let err = coordinator.remove_device(&device_ids[0]).unwrap_err();
    assert!(matches!(err, CoordinatorError::DeviceInUse(_)));

    // A device with no job history removes cleanly
    let fresh = coordinator.register_device("pi-99", &gateway_id).unwrap();
    coordinator.remove_device(&fresh.id).unwrap();
    assert!(matches!(
        coordinator.get_device(&fresh.id),
        Err(CoordinatorError::NotFound { .. })
    ));
}

#[test]
fn test_remove_file_owner_scoped() {
    let (coordinator, _, _, file_id) = testbed(1);

    let err = coordinator.remove_file(&file_id, "user-2").unwrap_err();
    assert!(matches!(err, CoordinatorError::NotFound { .. }));
    assert_eq!(coordinator.list_files(OWNER).len(), 1);
}
