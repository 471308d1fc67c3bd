//! Gateway operation handlers: create, register, heartbeat.

use testbed_protocol::ops::{
    GatewayCreateRequest, GatewayCreateResponse, GatewayHeartbeatRequest,
    GatewayHeartbeatResponse, GatewayRegisterRequest,
};
use testbed_protocol::{RpcError, RpcRequest};

use crate::coordinator::Coordinator;

use super::{parse, to_payload};

/// Handle the gateway_create operation (admin side).
pub fn create(request: &RpcRequest, coordinator: &Coordinator) -> Result<serde_json::Value, RpcError> {
    let req: GatewayCreateRequest = parse(request)?;
    let (gateway, token) = coordinator.create_gateway(&req.name)?;
    to_payload(&GatewayCreateResponse {
        gateway_id: gateway.id,
        name: gateway.name,
        token,
    })
}

/// Handle the gateway_register operation (gateway side).
pub fn register(
    request: &RpcRequest,
    coordinator: &Coordinator,
) -> Result<serde_json::Value, RpcError> {
    let req: GatewayRegisterRequest = parse(request)?;
    let gateway = coordinator.register_gateway(&req.name, &req.token)?;
    to_payload(&gateway)
}

/// Handle the gateway_heartbeat operation.
pub fn heartbeat(
    request: &RpcRequest,
    coordinator: &Coordinator,
) -> Result<serde_json::Value, RpcError> {
    let req: GatewayHeartbeatRequest = parse(request)?;
    let (devices_seen, devices_offline) =
        coordinator.heartbeat(&req.gateway_id, &req.active_device_ids)?;
    to_payload(&GatewayHeartbeatResponse {
        gateway_id: req.gateway_id,
        devices_seen,
        devices_offline,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use testbed_protocol::ErrorCode;

    fn make_request(op: &str, payload: serde_json::Value) -> RpcRequest {
        RpcRequest {
            protocol_version: 1,
            op: op.to_string(),
            request_id: "test-001".to_string(),
            owner_id: None,
            payload,
        }
    }

    #[test]
    fn test_create_returns_token_once() {
        let coordinator = Coordinator::default();
        let request = make_request("gateway_create", serde_json::json!({ "name": "lab-north" }));

        let payload = create(&request, &coordinator).unwrap();
        let response: GatewayCreateResponse = serde_json::from_value(payload).unwrap();
        assert!(!response.token.is_empty());

        // The registered record never carries the token
        let register_req = make_request(
            "gateway_register",
            serde_json::json!({ "name": "lab-north", "token": response.token }),
        );
        let gateway = register(&register_req, &coordinator).unwrap();
        assert!(gateway.get("token").is_none());
        assert_eq!(gateway["verification"], "verified");
    }

    #[test]
    fn test_register_bad_token() {
        let coordinator = Coordinator::default();
        let request = make_request("gateway_create", serde_json::json!({ "name": "lab-north" }));
        create(&request, &coordinator).unwrap();

        let register_req = make_request(
            "gateway_register",
            serde_json::json!({ "name": "lab-north", "token": "wrong" }),
        );
        let err = register(&register_req, &coordinator).unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenMismatch);
    }

    #[test]
    fn test_heartbeat_unknown_gateway() {
        let coordinator = Coordinator::default();
        let request = make_request(
            "gateway_heartbeat",
            serde_json::json!({ "gateway_id": "no-such", "active_device_ids": [] }),
        );
        let err = heartbeat(&request, &coordinator).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
