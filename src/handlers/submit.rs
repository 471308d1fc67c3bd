//! Submit operation handler.
//!
//! Creates a job group atomically; the response is the group record with
//! its jobs in submission order.

use testbed_protocol::ops::SubmitRequest;
use testbed_protocol::{RpcError, RpcRequest};

use crate::coordinator::Coordinator;

use super::{parse, to_payload};

/// Handle the submit operation.
pub fn handle(request: &RpcRequest, coordinator: &Coordinator) -> Result<serde_json::Value, RpcError> {
    let owner = request.require_owner()?.to_string();
    let req: SubmitRequest = parse(request)?;
    let group = coordinator.submit(&req.name, &owner, &req.assignments)?;
    to_payload(&group)
}
