//! Advance operation handler.
//!
//! Called by the execution agent to report job progress.

use testbed_protocol::ops::{AdvanceRequest, AdvanceResponse};
use testbed_protocol::{RpcError, RpcRequest};

use crate::coordinator::Coordinator;

use super::{parse, to_payload};

/// Handle the advance operation.
pub fn handle(request: &RpcRequest, coordinator: &Coordinator) -> Result<serde_json::Value, RpcError> {
    let req: AdvanceRequest = parse(request)?;
    let (job, group_status) =
        coordinator.advance(&req.job_id, req.status, req.output_file_id.as_deref())?;
    to_payload(&AdvanceResponse {
        job_id: job.id,
        status: job.status,
        group_id: job.group_id,
        group_status,
    })
}
