//! Image records (`/api/images/`).
//!
//! Image creation is asynchronous: the backend downloads the source from
//! `url` in the background and answers the POST with a task record, not the
//! finished image.

use serde::{Deserialize, Serialize};

use crate::base::{BinarySizedValue, Entity};

/// Full image representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub uid: String,
    pub name: String,
    /// Local path of the downloaded image. Server-assigned, read-only.
    pub path: String,
    /// Source the image was (or is being) fetched from.
    pub url: String,
    /// Minimum resources an instance using this image must provide.
    pub min_vcpu: u16,
    pub min_ram: BinarySizedValue,
    pub min_disk: BinarySizedValue,
}

impl Entity for Image {
    fn uid(&self) -> &str {
        &self.uid
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Caller-supplied payload for image creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageCreate {
    pub name: String,
    pub url: String,
    pub min_vcpu: u16,
    pub min_ram: BinarySizedValue,
    pub min_disk: BinarySizedValue,
}

impl ImageCreate {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_minimums(
        mut self,
        min_vcpu: u16,
        min_ram: BinarySizedValue,
        min_disk: BinarySizedValue,
    ) -> Self {
        self.min_vcpu = min_vcpu;
        self.min_ram = min_ram;
        self.min_disk = min_disk;
        self
    }
}

/// Caller-mutable fields for image modification. `path` and `url` are fixed
/// once the download has been accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageModify {
    pub name: String,
    pub min_vcpu: u16,
    pub min_ram: BinarySizedValue,
    pub min_disk: BinarySizedValue,
}

impl From<&Image> for ImageModify {
    fn from(current: &Image) -> Self {
        Self {
            name: current.name.clone(),
            min_vcpu: current.min_vcpu,
            min_ram: current.min_ram,
            min_disk: current.min_disk,
        }
    }
}
