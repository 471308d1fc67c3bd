//! Coordinator RPC handler.
//!
//! Line-delimited JSON over stdin/stdout: one request per line, one
//! response per line, until EOF or Ctrl-C. Malformed JSON is answered
//! with INVALID_REQUEST at protocol_version 0 rather than dropped.

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use testbed_protocol::{
    ops::names, RpcError, RpcRequest, RpcResponse, PROTOCOL_VERSION_PROBE,
};

use crate::config::CoordinatorConfig;
use crate::coordinator::Coordinator;
use crate::handlers;

/// Main RPC handler for the coordinator.
pub struct RpcHandler {
    coordinator: Coordinator,
    shutdown: Arc<AtomicBool>,
}

impl RpcHandler {
    /// Create a new RPC handler over a coordinator.
    pub fn new(coordinator: Coordinator) -> Self {
        Self {
            coordinator,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A flag that stops the serve loop after the in-flight request.
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// The coordinator behind this handler.
    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    fn config(&self) -> &CoordinatorConfig {
        self.coordinator.config()
    }

    /// Run the serve loop on stdin/stdout.
    pub fn run(&self) -> io::Result<()> {
        self.run_with_io(&mut io::stdin().lock(), &mut io::stdout().lock())
    }

    /// Run the serve loop with custom I/O (for testing).
    pub fn run_with_io<R: BufRead, W: Write>(
        &self,
        reader: &mut R,
        writer: &mut W,
    ) -> io::Result<()> {
        let mut line = String::new();
        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                break;
            }

            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break; // EOF
            }
            if line.trim().is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<RpcRequest>(&line) {
                Ok(request) => self.process(request),
                Err(e) => RpcResponse::error(
                    PROTOCOL_VERSION_PROBE,
                    String::new(),
                    RpcError::invalid_request(format!("invalid JSON: {}", e)),
                ),
            };
            self.write_response(writer, &response)?;
        }
        Ok(())
    }

    /// Validate a request's protocol version and dispatch it.
    pub fn process(&self, request: RpcRequest) -> RpcResponse {
        if let Err(e) = self.validate_protocol_version(&request) {
            return RpcResponse::error(request.protocol_version, request.request_id, e);
        }
        self.dispatch(&request)
    }

    /// Validate the protocol version in the request.
    fn validate_protocol_version(&self, request: &RpcRequest) -> Result<(), RpcError> {
        // probe requests MUST use protocol_version: 0
        if request.op == names::PROBE {
            if request.protocol_version != PROTOCOL_VERSION_PROBE {
                return Err(RpcError::unsupported_protocol(
                    request.protocol_version,
                    PROTOCOL_VERSION_PROBE,
                    PROTOCOL_VERSION_PROBE,
                ));
            }
            return Ok(());
        }

        // All other operations MUST NOT use protocol_version: 0
        if request.protocol_version == PROTOCOL_VERSION_PROBE {
            return Err(RpcError::unsupported_protocol(
                PROTOCOL_VERSION_PROBE,
                self.config().protocol_min,
                self.config().protocol_max,
            ));
        }

        if request.protocol_version < self.config().protocol_min
            || request.protocol_version > self.config().protocol_max
        {
            return Err(RpcError::unsupported_protocol(
                request.protocol_version,
                self.config().protocol_min,
                self.config().protocol_max,
            ));
        }

        Ok(())
    }

    /// Dispatch the request to the appropriate operation handler.
    fn dispatch(&self, request: &RpcRequest) -> RpcResponse {
        let protocol_version = if request.op == names::PROBE {
            PROTOCOL_VERSION_PROBE // probe responses echo version 0
        } else {
            request.protocol_version
        };

        let coordinator = &self.coordinator;
        let result = match request.op.as_str() {
            names::PROBE => handlers::probe::handle(self.config()),
            names::GATEWAY_CREATE => handlers::gateways::create(request, coordinator),
            names::GATEWAY_REGISTER => handlers::gateways::register(request, coordinator),
            names::GATEWAY_HEARTBEAT => handlers::gateways::heartbeat(request, coordinator),
            names::DEVICE_REGISTER => handlers::devices::register(request, coordinator),
            names::DEVICE_GET => handlers::devices::get(request, coordinator),
            names::DEVICE_LIST => handlers::devices::list(coordinator),
            names::DEVICE_REMOVE => handlers::devices::remove(request, coordinator),
            names::FILE_REGISTER => handlers::files::register(request, coordinator),
            names::FILE_LIST => handlers::files::list(request, coordinator),
            names::FILE_REMOVE => handlers::files::remove(request, coordinator),
            names::SUBMIT => handlers::submit::handle(request, coordinator),
            names::ADVANCE => handlers::advance::handle(request, coordinator),
            names::CANCEL => handlers::cancel::handle(request, coordinator),
            names::GROUP_GET => handlers::groups::get(request, coordinator),
            names::GROUP_LIST => handlers::groups::list(request, coordinator),
            names::GROUP_STATUS => handlers::groups::status(request, coordinator),
            names::QUEUE => handlers::groups::queue(request, coordinator),
            names::JOB_GET => handlers::jobs::get(request, coordinator),
            names::JOB_LIST => handlers::jobs::list(coordinator),
            _ => Err(RpcError::unknown_operation(&request.op)),
        };

        match result {
            Ok(payload) => {
                RpcResponse::success(protocol_version, request.request_id.clone(), payload)
            }
            Err(e) => RpcResponse::error(protocol_version, request.request_id.clone(), e),
        }
    }

    /// Write the response to the writer.
    fn write_response<W: Write>(&self, writer: &mut W, response: &RpcResponse) -> io::Result<()> {
        let json = serde_json::to_string(response)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writeln!(writer, "{}", json)?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use testbed_protocol::ErrorCode;

    fn create_handler() -> RpcHandler {
        RpcHandler::new(Coordinator::default())
    }

    #[test]
    fn test_probe_request() {
        let handler = create_handler();

        let input = r#"{"protocol_version":0,"op":"probe","request_id":"test-001","payload":{}}
"#;
        let mut reader = Cursor::new(input);
        let mut output = Vec::new();

        handler.run_with_io(&mut reader, &mut output).unwrap();

        let output_str = String::from_utf8(output).unwrap();
        let response: RpcResponse = serde_json::from_str(&output_str).unwrap();

        assert!(response.ok);
        assert_eq!(response.protocol_version, 0);
        assert_eq!(response.request_id, "test-001");
        assert!(response.payload.is_some());
    }

    #[test]
    fn test_probe_with_wrong_version() {
        let handler = create_handler();

        let input = r#"{"protocol_version":1,"op":"probe","request_id":"test-002","payload":{}}
"#;
        let mut reader = Cursor::new(input);
        let mut output = Vec::new();

        handler.run_with_io(&mut reader, &mut output).unwrap();

        let response: RpcResponse =
            serde_json::from_str(&String::from_utf8(output).unwrap()).unwrap();
        assert!(!response.ok);
        assert_eq!(
            response.error.as_ref().unwrap().code,
            ErrorCode::UnsupportedProtocol
        );
    }

    #[test]
    fn test_non_probe_with_version_zero() {
        let handler = create_handler();

        let input = r#"{"protocol_version":0,"op":"device_list","request_id":"test-003","payload":{}}
"#;
        let mut reader = Cursor::new(input);
        let mut output = Vec::new();

        handler.run_with_io(&mut reader, &mut output).unwrap();

        let response: RpcResponse =
            serde_json::from_str(&String::from_utf8(output).unwrap()).unwrap();
        assert!(!response.ok);
        assert_eq!(
            response.error.as_ref().unwrap().code,
            ErrorCode::UnsupportedProtocol
        );
    }

    #[test]
    fn test_invalid_json() {
        let handler = create_handler();

        let input = "not valid json\n";
        let mut reader = Cursor::new(input);
        let mut output = Vec::new();

        handler.run_with_io(&mut reader, &mut output).unwrap();

        let response: RpcResponse =
            serde_json::from_str(&String::from_utf8(output).unwrap()).unwrap();
        assert!(!response.ok);
        assert_eq!(
            response.error.as_ref().unwrap().code,
            ErrorCode::InvalidRequest
        );
    }

    #[test]
    fn test_unknown_operation() {
        let handler = create_handler();

        let input = r#"{"protocol_version":1,"op":"reboot_everything","request_id":"test-004","payload":{}}
"#;
        let mut reader = Cursor::new(input);
        let mut output = Vec::new();

        handler.run_with_io(&mut reader, &mut output).unwrap();

        let response: RpcResponse =
            serde_json::from_str(&String::from_utf8(output).unwrap()).unwrap();
        assert!(!response.ok);
        assert_eq!(
            response.error.as_ref().unwrap().code,
            ErrorCode::UnknownOperation
        );
    }

    #[test]
    fn test_multiple_requests_one_session() {
        let handler = create_handler();

        let input = "\
{\"protocol_version\":0,\"op\":\"probe\",\"request_id\":\"a\",\"payload\":{}}\n\
{\"protocol_version\":1,\"op\":\"device_list\",\"request_id\":\"b\",\"payload\":{}}\n";
        let mut reader = Cursor::new(input);
        let mut output = Vec::new();

        handler.run_with_io(&mut reader, &mut output).unwrap();

        let output_str = String::from_utf8(output).unwrap();
        let responses: Vec<RpcResponse> = output_str
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(responses.len(), 2);
        assert!(responses.iter().all(|r| r.ok));
    }
}
