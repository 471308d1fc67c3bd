//! Operation-specific types.

pub mod advance;
pub mod cancel;
pub mod device;
pub mod file;
pub mod gateway;
pub mod group;
pub mod job;
pub mod probe;
pub mod submit;

pub use advance::{AdvanceRequest, AdvanceResponse};
pub use cancel::{CancelRequest, CancelResponse};
pub use device::{DeviceGetRequest, DeviceRegisterRequest, DeviceRemoveRequest, DeviceRemoveResponse};
pub use file::{FileRegisterRequest, FileRemoveRequest, FileRemoveResponse};
pub use gateway::{
    GatewayCreateRequest, GatewayCreateResponse, GatewayHeartbeatRequest,
    GatewayHeartbeatResponse, GatewayRegisterRequest,
};
pub use group::{DeviceBrief, GroupGetRequest, GroupStatusRequest, GroupStatusResponse, JobStats, QueueEntry};
pub use job::JobGetRequest;
pub use probe::ProbeResponse;
pub use submit::{Assignment, SubmitRequest};

/// Known operation names.
pub mod names {
    pub const PROBE: &str = "probe";
    pub const GATEWAY_CREATE: &str = "gateway_create";
    pub const GATEWAY_REGISTER: &str = "gateway_register";
    pub const GATEWAY_HEARTBEAT: &str = "gateway_heartbeat";
    pub const DEVICE_REGISTER: &str = "device_register";
    pub const DEVICE_GET: &str = "device_get";
    pub const DEVICE_LIST: &str = "device_list";
    pub const DEVICE_REMOVE: &str = "device_remove";
    pub const FILE_REGISTER: &str = "file_register";
    pub const FILE_LIST: &str = "file_list";
    pub const FILE_REMOVE: &str = "file_remove";
    pub const SUBMIT: &str = "submit";
    pub const ADVANCE: &str = "advance";
    pub const CANCEL: &str = "cancel";
    pub const GROUP_GET: &str = "group_get";
    pub const GROUP_LIST: &str = "group_list";
    pub const GROUP_STATUS: &str = "group_status";
    pub const QUEUE: &str = "queue";
    pub const JOB_GET: &str = "job_get";
    pub const JOB_LIST: &str = "job_list";
}
