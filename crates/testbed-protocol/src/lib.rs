//! Testbed Protocol Types
//!
//! Defines the JSON RPC envelope for client↔coordinator communication,
//! the stable error-code registry, and the status enums shared by the
//! coordinator core and its clients.

pub mod error;
pub mod ops;
pub mod request;
pub mod response;
pub mod status;

pub use error::{ErrorCode, RpcError};
pub use request::RpcRequest;
pub use response::RpcResponse;
pub use status::{DeviceStatus, JobStatus, VerificationStatus};

/// Protocol version used for probe requests (sentinel value).
pub const PROTOCOL_VERSION_PROBE: i32 = 0;

/// Minimum protocol version supported by this implementation.
pub const PROTOCOL_MIN: i32 = 1;

/// Maximum protocol version supported by this implementation.
pub const PROTOCOL_MAX: i32 = 1;

/// Current coordinator version string.
pub const COORDINATOR_VERSION: &str = "0.1.0";
