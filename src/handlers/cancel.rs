//! Cancel operation handler.

use testbed_protocol::ops::{CancelRequest, CancelResponse};
use testbed_protocol::{RpcError, RpcRequest};

use crate::coordinator::Coordinator;

use super::{parse, to_payload};

/// Handle the cancel operation.
pub fn handle(request: &RpcRequest, coordinator: &Coordinator) -> Result<serde_json::Value, RpcError> {
    let owner = request.require_owner()?.to_string();
    let req: CancelRequest = parse(request)?;
    let (status, cancelled_jobs) = coordinator.cancel_group(&req.group_id, &owner)?;
    to_payload(&CancelResponse {
        group_id: req.group_id,
        status,
        cancelled_jobs,
    })
}
