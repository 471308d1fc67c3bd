//! Job query types.

use serde::{Deserialize, Serialize};

/// Job get request payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobGetRequest {
    /// The job to fetch.
    pub job_id: String,
}
