//! Disk records (`/api/disks/`).

use serde::{Deserialize, Serialize};

use crate::base::{BinarySizedValue, Entity};

/// On-disk image formats the backend can provision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiskFormat {
    #[serde(rename = "raw")]
    Raw,
    #[default]
    #[serde(rename = "qcow2")]
    QCow2,
    #[serde(rename = "vdi")]
    Vdi,
}

/// Full disk representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Disk {
    pub uid: String,
    pub name: String,
    /// Filesystem path of the backing file. Server-assigned, read-only.
    pub path: String,
    pub size: BinarySizedValue,
    pub disk_format: DiskFormat,
    /// Image this disk was cloned from, if any.
    #[serde(default)]
    pub image_uid: Option<String>,
}

impl Entity for Disk {
    fn uid(&self) -> &str {
        &self.uid
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Caller-supplied payload for disk creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskCreate {
    pub name: String,
    pub size: BinarySizedValue,
    pub disk_format: DiskFormat,
    #[serde(default)]
    pub image_uid: Option<String>,
}

impl DiskCreate {
    pub fn new(name: impl Into<String>, size: BinarySizedValue) -> Self {
        Self {
            name: name.into(),
            size,
            ..Self::default()
        }
    }

    pub fn with_format(mut self, disk_format: DiskFormat) -> Self {
        self.disk_format = disk_format;
        self
    }

    pub fn from_image(mut self, image_uid: impl Into<String>) -> Self {
        self.image_uid = Some(image_uid.into());
        self
    }
}

/// Caller-mutable fields for disk modification, seeded from the current
/// record. `path` and `disk_format` are fixed after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskModify {
    pub name: String,
    pub size: BinarySizedValue,
}

impl From<&Disk> for DiskModify {
    fn from(current: &Disk) -> Self {
        Self {
            name: current.name.clone(),
            size: current.size,
        }
    }
}
