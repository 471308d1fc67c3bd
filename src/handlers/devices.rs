//! Device operation handlers: register, get, list, remove.

use testbed_protocol::ops::{
    DeviceGetRequest, DeviceRegisterRequest, DeviceRemoveRequest, DeviceRemoveResponse,
};
use testbed_protocol::{RpcError, RpcRequest};

use crate::coordinator::Coordinator;

use super::{parse, to_payload};

/// Handle the device_register operation.
pub fn register(
    request: &RpcRequest,
    coordinator: &Coordinator,
) -> Result<serde_json::Value, RpcError> {
    let req: DeviceRegisterRequest = parse(request)?;
    let device = coordinator.register_device(&req.name, &req.gateway_id)?;
    to_payload(&device)
}

/// Handle the device_get operation.
pub fn get(request: &RpcRequest, coordinator: &Coordinator) -> Result<serde_json::Value, RpcError> {
    let req: DeviceGetRequest = parse(request)?;
    let device = coordinator.get_device(&req.device_id)?;
    to_payload(&device)
}

/// Handle the device_list operation.
pub fn list(coordinator: &Coordinator) -> Result<serde_json::Value, RpcError> {
    to_payload(&coordinator.list_devices())
}

/// Handle the device_remove operation.
pub fn remove(
    request: &RpcRequest,
    coordinator: &Coordinator,
) -> Result<serde_json::Value, RpcError> {
    let req: DeviceRemoveRequest = parse(request)?;
    let device = coordinator.remove_device(&req.device_id)?;
    to_payload(&DeviceRemoveResponse {
        device_id: device.id,
        removed: true,
    })
}
