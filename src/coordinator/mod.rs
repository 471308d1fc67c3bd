//! Job group coordinator.
//!
//! The only component that creates jobs/job groups or transitions job
//! status; every invariant on device exclusivity and group derivation is
//! enforced here, not by callers.
//!
//! All shared state lives behind one `RwLock`: each mutating operation
//! takes the write lock once for its whole effect, which is what makes
//! submission and cancellation atomic and the device claim a true
//! check-and-set. Readers take the read lock and see the last committed
//! transition.

mod advance;
mod cancel;
mod queries;
mod submit;

pub use queries::JobGroupDetail;

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use ulid::Ulid;

use crate::config::CoordinatorConfig;
use crate::error::CoordinatorError;
use crate::files::{FileReference, FileTable};
use crate::registry::{Device, DeviceTable, Gateway, GatewayTable};
use crate::state::{now, Job, JobGroup};

/// Generate a new entity id. ULIDs sort by creation time, which gives
/// listings their order without a separate sequence column.
pub(crate) fn next_id() -> String {
    Ulid::new().to_string()
}

#[derive(Default)]
pub(crate) struct Inner {
    pub(crate) gateways: GatewayTable,
    pub(crate) devices: DeviceTable,
    pub(crate) files: FileTable,
    pub(crate) jobs: BTreeMap<String, Job>,
    pub(crate) groups: BTreeMap<String, JobGroup>,
}

impl Inner {
    /// Check whether any non-terminal job references the file as source
    /// or output.
    pub(crate) fn file_in_active_use(&self, file_id: &str) -> bool {
        self.jobs.values().any(|job| {
            !job.is_terminal()
                && (job.source_file_id == file_id
                    || job.output_file_id.as_deref() == Some(file_id))
        })
    }

    /// Check whether any non-terminal job other than `except_job_id`
    /// holds the device.
    pub(crate) fn device_in_active_use(&self, device_id: &str, except_job_id: &str) -> bool {
        self.jobs.values().any(|job| {
            job.id != except_job_id && !job.is_terminal() && job.device_id == device_id
        })
    }
}

/// Thread-safe coordinator handle.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<RwLock<Inner>>,
    config: CoordinatorConfig,
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new(CoordinatorConfig::default())
    }
}

impl Coordinator {
    /// Create an empty coordinator.
    pub fn new(config: CoordinatorConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
            config,
        }
    }

    /// The configuration this coordinator was built with.
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap()
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap()
    }

    // === Gateways ===

    /// Create a gateway and issue its one-time enrollment token.
    pub fn create_gateway(&self, name: &str) -> Result<(Gateway, String), CoordinatorError> {
        let mut inner = self.write();
        Ok(inner.gateways.create(next_id(), name, now())?)
    }

    /// Register a gateway by name + enrollment token.
    pub fn register_gateway(&self, name: &str, token: &str) -> Result<Gateway, CoordinatorError> {
        let mut inner = self.write();
        Ok(inner.gateways.register(name, token, now())?)
    }

    /// Apply a gateway heartbeat: refresh the gateway and mark its devices
    /// online/offline from the active list. Returns `(seen, newly_offline)`.
    pub fn heartbeat(
        &self,
        gateway_id: &str,
        active_device_ids: &[String],
    ) -> Result<(usize, usize), CoordinatorError> {
        let mut inner = self.write();
        let at = now();
        inner.gateways.touch(gateway_id, at)?;
        Ok(inner.devices.heartbeat(gateway_id, active_device_ids, at))
    }

    /// Get a gateway by id.
    pub fn get_gateway(&self, gateway_id: &str) -> Result<Gateway, CoordinatorError> {
        Ok(self.read().gateways.get(gateway_id)?)
    }

    /// List all gateways.
    pub fn list_gateways(&self) -> Vec<Gateway> {
        self.read().gateways.list()
    }

    // === Devices ===

    /// Register a device under an existing gateway.
    pub fn register_device(
        &self,
        name: &str,
        gateway_id: &str,
    ) -> Result<Device, CoordinatorError> {
        let mut inner = self.write();
        // Resolve the gateway first so an unknown gateway surfaces as its
        // own NOT_FOUND rather than a device error.
        inner.gateways.get(gateway_id)?;
        Ok(inner.devices.register(next_id(), name, gateway_id, now())?)
    }

    /// Get a device by id.
    pub fn get_device(&self, device_id: &str) -> Result<Device, CoordinatorError> {
        Ok(self.read().devices.get(device_id)?)
    }

    /// List all devices.
    pub fn list_devices(&self) -> Vec<Device> {
        self.read().devices.list()
    }

    /// Remove a device. Job rows are the audit trail, so removal is
    /// blocked while any job, terminal or not, references the device.
    pub fn remove_device(&self, device_id: &str) -> Result<Device, CoordinatorError> {
        let mut inner = self.write();
        inner.devices.get(device_id)?;
        if inner.jobs.values().any(|j| j.device_id == device_id) {
            return Err(CoordinatorError::DeviceInUse(device_id.to_string()));
        }
        Ok(inner.devices.remove(device_id)?)
    }

    // === File references ===

    /// Record an uploaded file reference.
    pub fn register_file(
        &self,
        filename: &str,
        owner_id: &str,
    ) -> Result<FileReference, CoordinatorError> {
        if filename.trim().is_empty() {
            return Err(CoordinatorError::Validation(
                "filename must not be empty".to_string(),
            ));
        }
        let mut inner = self.write();
        Ok(inner.files.register(next_id(), filename, owner_id, now()))
    }

    /// List one user's file references.
    pub fn list_files(&self, owner_id: &str) -> Vec<FileReference> {
        self.read().files.list(owner_id)
    }

    /// Check whether a file is referenced by any non-terminal job.
    pub fn file_in_active_use(&self, file_id: &str) -> bool {
        self.read().file_in_active_use(file_id)
    }

    /// Drop a file reference. Blocked while a non-terminal job still
    /// references it.
    pub fn remove_file(
        &self,
        file_id: &str,
        owner_id: &str,
    ) -> Result<FileReference, CoordinatorError> {
        let mut inner = self.write();
        // Owner check first: another user's file is NOT_FOUND, not in-use.
        inner.files.get(file_id, owner_id)?;
        if inner.file_in_active_use(file_id) {
            return Err(CoordinatorError::FileInUse(file_id.to_string()));
        }
        Ok(inner.files.remove(file_id, owner_id)?)
    }
}
