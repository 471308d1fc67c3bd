//! Submit operation types.
//!
//! A submission names a job group and pairs each target device with a
//! source file. The response is the created job group record with its
//! member jobs in submission order.

use serde::{Deserialize, Serialize};

/// One device/file pairing inside a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Target device id.
    pub device_id: String,
    /// Source file reference id.
    pub source_file_id: String,
}

/// Submit request payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    /// Job group name.
    pub name: String,
    /// Ordered device/file pairs, one job each.
    pub assignments: Vec<Assignment>,
}
