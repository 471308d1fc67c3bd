//! File reference operation handlers: register, list, remove.
//!
//! All three are owner-scoped via the envelope's `owner_id`.

use testbed_protocol::ops::{FileRegisterRequest, FileRemoveRequest, FileRemoveResponse};
use testbed_protocol::{RpcError, RpcRequest};

use crate::coordinator::Coordinator;

use super::{parse, to_payload};

/// Handle the file_register operation.
pub fn register(
    request: &RpcRequest,
    coordinator: &Coordinator,
) -> Result<serde_json::Value, RpcError> {
    let owner = request.require_owner()?.to_string();
    let req: FileRegisterRequest = parse(request)?;
    let file = coordinator.register_file(&req.filename, &owner)?;
    to_payload(&file)
}

/// Handle the file_list operation.
pub fn list(request: &RpcRequest, coordinator: &Coordinator) -> Result<serde_json::Value, RpcError> {
    let owner = request.require_owner()?;
    to_payload(&coordinator.list_files(owner))
}

/// Handle the file_remove operation.
pub fn remove(
    request: &RpcRequest,
    coordinator: &Coordinator,
) -> Result<serde_json::Value, RpcError> {
    let owner = request.require_owner()?.to_string();
    let req: FileRemoveRequest = parse(request)?;
    let file = coordinator.remove_file(&req.file_id, &owner)?;
    to_payload(&FileRemoveResponse {
        file_id: file.id,
        removed: true,
    })
}
