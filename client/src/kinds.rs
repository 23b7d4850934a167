//! Per-kind cache configuration.
//!
//! The source of truth for "what makes a disk cache a disk cache" lives
//! here: the collection path, the three record shapes, and how a successful
//! create folds into cache state. Everything else about a store is generic
//! and lives in [`crate::cache`].

use serde::Serialize;
use serde::de::DeserializeOwned;

use machina_protocol::{
    Bootstrap, BootstrapCreate, BootstrapModify, Disk, DiskCreate, DiskModify, Entity, Identity,
    IdentityCreate, IdentityModify, Image, ImageCreate, ImageModify, Instance, InstanceCreate,
    InstanceModify, Network, NetworkCreate, NetworkModify, Task,
};

use crate::cache::CacheState;

/// Configuration record instantiating [`crate::EntityCache`] for one
/// collection.
///
/// `Created` is what the backend answers a POST with: the finished record
/// for synchronously created kinds, a [`Task`] handle for kinds whose
/// creation runs in the background. [`EntityKind::absorb_created`] is the
/// only point where that difference matters.
pub trait EntityKind: Send + Sync + Sized + 'static {
    /// Path segment of the collection under `/api/`.
    const COLLECTION: &'static str;

    /// Full record returned by reads.
    type Get: Entity + Clone + Serialize + DeserializeOwned + Send + Sync + 'static;
    /// Caller payload for creation.
    type Create: Serialize + Clone + Send + Sync + 'static;
    /// Caller payload for modification.
    type Modify: Serialize + Send + Sync + 'static;
    /// What a successful POST deserializes to.
    type Created: Clone + DeserializeOwned + Send + Sync + 'static;

    /// Fold a successful create into cache state.
    ///
    /// Synchronous kinds insert the echoed record; asynchronous kinds leave
    /// the entity map untouched and file the originating request in the
    /// pending-task registry under the returned task's uid.
    fn absorb_created(state: &mut CacheState<Self>, request: Self::Create, created: &Self::Created);
}

/// Disks: synchronous creation.
pub struct Disks;

impl EntityKind for Disks {
    const COLLECTION: &'static str = "disks";

    type Get = Disk;
    type Create = DiskCreate;
    type Modify = DiskModify;
    type Created = Disk;

    fn absorb_created(state: &mut CacheState<Self>, _request: DiskCreate, created: &Disk) {
        state.insert_entity(created.clone());
    }
}

/// Images: creation resolves to a download task.
pub struct Images;

impl EntityKind for Images {
    const COLLECTION: &'static str = "images";

    type Get = Image;
    type Create = ImageCreate;
    type Modify = ImageModify;
    type Created = Task;

    fn absorb_created(state: &mut CacheState<Self>, request: ImageCreate, created: &Task) {
        state.remember_pending(created.uid.clone(), request);
    }
}

/// Networks: synchronous creation.
pub struct Networks;

impl EntityKind for Networks {
    const COLLECTION: &'static str = "networks";

    type Get = Network;
    type Create = NetworkCreate;
    type Modify = NetworkModify;
    type Created = Network;

    fn absorb_created(state: &mut CacheState<Self>, _request: NetworkCreate, created: &Network) {
        state.insert_entity(created.clone());
    }
}

/// Identities: synchronous creation.
pub struct Identities;

impl EntityKind for Identities {
    const COLLECTION: &'static str = "identities";

    type Get = Identity;
    type Create = IdentityCreate;
    type Modify = IdentityModify;
    type Created = Identity;

    fn absorb_created(state: &mut CacheState<Self>, _request: IdentityCreate, created: &Identity) {
        state.insert_entity(created.clone());
    }
}

/// Bootstrap configurations: synchronous creation.
pub struct Bootstraps;

impl EntityKind for Bootstraps {
    const COLLECTION: &'static str = "bootstraps";

    type Get = Bootstrap;
    type Create = BootstrapCreate;
    type Modify = BootstrapModify;
    type Created = Bootstrap;

    fn absorb_created(state: &mut CacheState<Self>, _request: BootstrapCreate, created: &Bootstrap) {
        state.insert_entity(created.clone());
    }
}

/// Instances: creation resolves to a provisioning task.
pub struct Instances;

impl EntityKind for Instances {
    const COLLECTION: &'static str = "instances";

    type Get = Instance;
    type Create = InstanceCreate;
    type Modify = InstanceModify;
    type Created = Task;

    fn absorb_created(state: &mut CacheState<Self>, request: InstanceCreate, created: &Task) {
        state.remember_pending(created.uid.clone(), request);
    }
}
