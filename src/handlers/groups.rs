//! Job group query handlers: get, list, status, queue.
//!
//! All owner-scoped; a group owned by someone else surfaces as NOT_FOUND.

use testbed_protocol::ops::{GroupGetRequest, GroupStatusRequest};
use testbed_protocol::{RpcError, RpcRequest};

use crate::coordinator::Coordinator;

use super::{parse, to_payload};

/// Handle the group_get operation.
pub fn get(request: &RpcRequest, coordinator: &Coordinator) -> Result<serde_json::Value, RpcError> {
    let owner = request.require_owner()?.to_string();
    let req: GroupGetRequest = parse(request)?;
    let group = coordinator.get_group(&req.group_id, &owner)?;
    to_payload(&group)
}

/// Handle the group_list operation.
pub fn list(request: &RpcRequest, coordinator: &Coordinator) -> Result<serde_json::Value, RpcError> {
    let owner = request.require_owner()?;
    to_payload(&coordinator.list_groups(owner))
}

/// Handle the group_status operation.
pub fn status(
    request: &RpcRequest,
    coordinator: &Coordinator,
) -> Result<serde_json::Value, RpcError> {
    let owner = request.require_owner()?.to_string();
    let req: GroupStatusRequest = parse(request)?;
    let report = coordinator.group_status(&req.group_id, &owner)?;
    to_payload(&report)
}

/// Handle the queue operation.
pub fn queue(request: &RpcRequest, coordinator: &Coordinator) -> Result<serde_json::Value, RpcError> {
    let owner = request.require_owner()?;
    to_payload(&coordinator.queue(owner))
}
