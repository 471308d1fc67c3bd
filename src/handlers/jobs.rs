//! Job query handlers: get, list.

use testbed_protocol::ops::JobGetRequest;
use testbed_protocol::{RpcError, RpcRequest};

use crate::coordinator::Coordinator;

use super::{parse, to_payload};

/// Handle the job_get operation.
pub fn get(request: &RpcRequest, coordinator: &Coordinator) -> Result<serde_json::Value, RpcError> {
    let req: JobGetRequest = parse(request)?;
    let job = coordinator.get_job(&req.job_id)?;
    to_payload(&job)
}

/// Handle the job_list operation.
pub fn list(coordinator: &Coordinator) -> Result<serde_json::Value, RpcError> {
    to_payload(&coordinator.list_jobs())
}
