//! Instance records (`/api/instances/`).
//!
//! Instance creation is asynchronous: the backend provisions the OS disk and
//! wires up networking in the background, answering the POST with a task
//! record.

use serde::{Deserialize, Serialize};

use crate::base::{BinarySizedValue, Entity};

/// Lifecycle state of a virtual machine instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstanceState {
    #[serde(rename = "STOPPING")]
    Stopping,
    #[default]
    #[serde(rename = "STOPPED")]
    Stopped,
    #[serde(rename = "STARTING")]
    Starting,
    #[serde(rename = "STARTED")]
    Started,
}

/// Full instance representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub uid: String,
    pub name: String,
    /// Directory holding the instance's files. Server-assigned, read-only.
    pub path: String,
    pub vcpu: u16,
    pub ram: BinarySizedValue,
    /// MAC address assigned by the server at creation.
    pub mac: String,
    /// Weak reference to the provisioned OS disk.
    #[serde(default)]
    pub os_disk_uid: Option<String>,
    pub os_disk_size: BinarySizedValue,
    /// Weak reference to the attached network.
    #[serde(default)]
    pub network_uid: Option<String>,
    /// Weak reference to the bootstrap configuration used at first boot.
    #[serde(default)]
    pub bootstrap_uid: Option<String>,
    pub bootstrap_file: String,
    pub state: InstanceState,
}

impl Entity for Instance {
    fn uid(&self) -> &str {
        &self.uid
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Caller-supplied payload for instance creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceCreate {
    pub name: String,
    pub vcpu: u16,
    pub ram: BinarySizedValue,
    pub os_disk_size: BinarySizedValue,
    pub image_uid: String,
    pub network_uid: String,
    pub bootstrap_uid: String,
}

impl InstanceCreate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Default for InstanceCreate {
    fn default() -> Self {
        Self {
            name: String::new(),
            vcpu: 1,
            ram: BinarySizedValue::gigabytes(2),
            os_disk_size: BinarySizedValue::gigabytes(10),
            image_uid: String::new(),
            network_uid: String::new(),
            bootstrap_uid: String::new(),
        }
    }
}

/// Caller-mutable fields for instance modification. Everything the server
/// computed at provisioning time (`path`, `mac`, the disk and network
/// references) is fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceModify {
    pub name: String,
    pub state: InstanceState,
    pub vcpu: u16,
    pub ram: BinarySizedValue,
}

impl From<&Instance> for InstanceModify {
    fn from(current: &Instance) -> Self {
        Self {
            name: current.name.clone(),
            state: current.state,
            vcpu: current.vcpu,
            ram: current.ram,
        }
    }
}
