//! Device table.
//!
//! Tracks registered devices and their availability. The busy bit is owned
//! by job accounting: a device is `busy` exactly while a non-terminal job
//! references it, so heartbeats never demote a busy device.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use testbed_protocol::DeviceStatus;

use super::is_valid_name;

/// A registered gateway-attached device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    /// Device identifier.
    pub id: String,
    /// Human-readable name, unique within the owning gateway.
    pub name: String,
    /// Owning gateway.
    pub gateway_id: String,
    /// Availability.
    pub status: DeviceStatus,
    /// Last time a gateway heartbeat listed this device.
    pub last_seen: DateTime<Utc>,
}

/// Errors for device table operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DeviceError {
    #[error("device '{0}' not found")]
    NotFound(String),

    #[error("device '{0}' is claimed by a non-terminal job")]
    AlreadyBusy(String),

    #[error("device '{0}' is offline")]
    Offline(String),

    #[error("device name '{name}' is already registered on gateway '{gateway_id}'")]
    DuplicateName { name: String, gateway_id: String },

    #[error("invalid device name '{0}'")]
    InvalidName(String),
}

/// In-memory device table, keyed by device id.
#[derive(Debug, Default)]
pub struct DeviceTable {
    devices: BTreeMap<String, Device>,
}

impl DeviceTable {
    /// Register a new device under a gateway. New devices start `offline`
    /// until their gateway reports them in a heartbeat.
    pub fn register(
        &mut self,
        id: String,
        name: &str,
        gateway_id: &str,
        at: DateTime<Utc>,
    ) -> Result<Device, DeviceError> {
        if !is_valid_name(name) {
            return Err(DeviceError::InvalidName(name.to_string()));
        }
        if self
            .devices
            .values()
            .any(|d| d.gateway_id == gateway_id && d.name == name)
        {
            return Err(DeviceError::DuplicateName {
                name: name.to_string(),
                gateway_id: gateway_id.to_string(),
            });
        }

        let device = Device {
            id: id.clone(),
            name: name.to_string(),
            gateway_id: gateway_id.to_string(),
            status: DeviceStatus::Offline,
            last_seen: at,
        };
        self.devices.insert(id, device.clone());
        Ok(device)
    }

    /// Atomically claim an available device (`available` → `busy`).
    ///
    /// Re-validates the current status even when the caller has already
    /// checked it, so two submissions racing for the same device cannot
    /// both succeed.
    pub fn claim(&mut self, id: &str) -> Result<(), DeviceError> {
        let device = self
            .devices
            .get_mut(id)
            .ok_or_else(|| DeviceError::NotFound(id.to_string()))?;
        match device.status {
            DeviceStatus::Available => {
                device.status = DeviceStatus::Busy;
                Ok(())
            }
            DeviceStatus::Busy => Err(DeviceError::AlreadyBusy(id.to_string())),
            DeviceStatus::Offline => Err(DeviceError::Offline(id.to_string())),
        }
    }

    /// Release a busy device (`busy` → `available`). Idempotent: releasing
    /// an available device is a no-op, and an offline device stays offline
    /// until its gateway reports it again.
    pub fn release(&mut self, id: &str) -> Result<(), DeviceError> {
        let device = self
            .devices
            .get_mut(id)
            .ok_or_else(|| DeviceError::NotFound(id.to_string()))?;
        if device.status == DeviceStatus::Busy {
            device.status = DeviceStatus::Available;
        }
        Ok(())
    }

    /// Apply a gateway heartbeat: devices listed as active get `last_seen`
    /// refreshed and come back from `offline`; unlisted devices go
    /// `offline` unless they are `busy`.
    ///
    /// Returns `(seen, newly_offline)` counts.
    pub fn heartbeat(
        &mut self,
        gateway_id: &str,
        active_device_ids: &[String],
        at: DateTime<Utc>,
    ) -> (usize, usize) {
        let mut seen = 0;
        let mut newly_offline = 0;

        for device in self.devices.values_mut() {
            if device.gateway_id != gateway_id {
                continue;
            }
            if active_device_ids.iter().any(|id| *id == device.id) {
                device.last_seen = at;
                if device.status == DeviceStatus::Offline {
                    device.status = DeviceStatus::Available;
                }
                seen += 1;
            } else if device.status == DeviceStatus::Available {
                device.status = DeviceStatus::Offline;
                newly_offline += 1;
            }
        }

        (seen, newly_offline)
    }

    /// Remove a device. The caller is responsible for checking that no
    /// job history references it.
    pub fn remove(&mut self, id: &str) -> Result<Device, DeviceError> {
        self.devices
            .remove(id)
            .ok_or_else(|| DeviceError::NotFound(id.to_string()))
    }

    /// Get a device by id.
    pub fn get(&self, id: &str) -> Result<Device, DeviceError> {
        self.devices
            .get(id)
            .cloned()
            .ok_or_else(|| DeviceError::NotFound(id.to_string()))
    }

    /// List all devices.
    pub fn list(&self) -> Vec<Device> {
        self.devices.values().cloned().collect()
    }
}
