//! Job and job group lifecycle records.
//!
//! - Job: `pending` → `running` → {`completed` | `failed`}, with
//!   `cancelled` reachable only through group cancellation
//! - Job group: status derived from its members, never set directly

mod group;
mod job;

pub use group::{derive_group_status, JobGroup};
pub use job::{Job, TransitionError};

use chrono::{DateTime, Utc};

/// Current UTC timestamp.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}
