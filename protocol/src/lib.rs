//! Wire types for the machina REST API.
//!
//! Every domain collection (`/api/disks/`, `/api/images/`, ...) exchanges
//! three record shapes: the full representation returned by reads, the
//! create-request a caller submits, and the modify-request seeded from an
//! existing record. This crate holds those shapes plus the shared value
//! objects (binary sizes, list wrappers, fault bodies). No behavior lives
//! here beyond conversions between record shapes.

pub mod base;
pub mod bootstraps;
pub mod disks;
pub mod identities;
pub mod images;
pub mod instances;
pub mod networks;
pub mod tasks;

pub use base::{
    BinaryScale, BinarySizedValue, Entity, EntryList, FaultKind, FaultSchema, SelectOption,
};
pub use bootstraps::{Bootstrap, BootstrapCreate, BootstrapKind, BootstrapModify};
pub use disks::{Disk, DiskCreate, DiskFormat, DiskModify};
pub use identities::{Identity, IdentityCreate, IdentityKind, IdentityModify};
pub use images::{Image, ImageCreate, ImageModify};
pub use instances::{Instance, InstanceCreate, InstanceModify, InstanceState};
pub use networks::{Network, NetworkCreate, NetworkKind, NetworkModify};
pub use tasks::{Task, TaskRelation, TaskState};
