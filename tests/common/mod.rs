//! Shared fixtures for the integration suites.

use testbed_coordinator::{Coordinator, CoordinatorConfig};
use testbed_protocol::ops::Assignment;

pub const OWNER: &str = "user-1";

/// A coordinator with one verified gateway, `device_count` online devices,
/// and one uploaded source file.
///
/// Returns `(coordinator, gateway_id, device_ids, source_file_id)`.
pub fn testbed(device_count: usize) -> (Coordinator, String, Vec<String>, String) {
    let coordinator = Coordinator::new(CoordinatorConfig::default());

    let (gateway, token) = coordinator.create_gateway("lab-north").unwrap();
    coordinator.register_gateway("lab-north", &token).unwrap();

    let mut device_ids = Vec::new();
    for i in 0..device_count {
        let device = coordinator
            .register_device(&format!("pi-{:02}", i + 1), &gateway.id)
            .unwrap();
        device_ids.push(device.id);
    }
    coordinator.heartbeat(&gateway.id, &device_ids).unwrap();

    let file = coordinator.register_file("sensor-fw.bin", OWNER).unwrap();

    (coordinator, gateway.id, device_ids, file.id)
}

/// Pair each device with the source file, in order.
pub fn assignments(device_ids: &[String], source_file_id: &str) -> Vec<Assignment> {
    device_ids
        .iter()
        .map(|device_id| Assignment {
            device_id: device_id.clone(),
            source_file_id: source_file_id.to_string(),
        })
        .collect()
}
