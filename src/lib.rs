//! Testbed Coordinator - job group execution core for the IoT testbed
//!
//! This crate implements the coordinator behind the testbed UI: gateways
//! enroll and heartbeat their devices, users upload file references and
//! submit job groups pairing devices with source files, and execution
//! agents report per-job progress that drives the derived group status.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod files;
pub mod handlers;
pub mod registry;
pub mod rpc;
pub mod simulator;
pub mod state;

pub use config::CoordinatorConfig;
pub use coordinator::{Coordinator, JobGroupDetail};
pub use error::CoordinatorError;
pub use files::FileReference;
pub use registry::{Device, Gateway};
pub use rpc::RpcHandler;
pub use state::{derive_group_status, Job, JobGroup};
