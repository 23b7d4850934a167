//! Client-side entity cache for the machina backend.
//!
//! The backend manages disks, images, networks, identities, bootstrap
//! configurations and instances through per-kind REST collections. This
//! crate keeps one local store per kind, coherent across reads and writes:
//!
//! - [`EntityCache`] is the generic keyed store with read-through `get`,
//!   union-only `list` refresh, and cache-coherent create/modify/remove.
//! - [`EntityKind`] is the per-kind configuration (collection path, record
//!   types, create admission) that instantiates the cache for each domain
//!   collection.
//! - [`TaskTracker`] follows the `/api/tasks/` surface and announces tasks
//!   it observes reaching a terminal state.
//! - [`Session`] wires one cache per kind and the tracker over a shared
//!   [`RestGateway`], replacing any notion of global per-kind stores.
//!
//! The HTTP transport sits behind the [`RestGateway`] trait; [`HttpGateway`]
//! is the reqwest implementation and tests substitute mocks.

pub mod cache;
pub mod error;
pub mod gateway;
pub mod kinds;
pub mod session;
pub mod tasks;

pub use cache::{CacheState, EntityCache};
pub use error::{ApiError, Result};
pub use gateway::{HttpGateway, RestGateway};
pub use kinds::{Bootstraps, Disks, EntityKind, Identities, Images, Instances, Networks};
pub use session::Session;
pub use tasks::TaskTracker;
