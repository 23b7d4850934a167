//! The generic entity cache.
//!
//! One [`EntityCache`] instance is the single source of truth, within a
//! session, for one collection's known records. Reads are read-through
//! (`get` returns a cached record without touching the network unless
//! forced), `list` is a union-only bulk upsert, and every write operation
//! keeps the local map coherent with what the server acknowledged.
//!
//! All state lives behind one `RwLock`, taken only between awaits, so each
//! mutation is a single indivisible patch from the point of view of
//! concurrent readers.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use machina_protocol::{Entity, EntryList, SelectOption};

use crate::error::{ApiError, Result};
use crate::gateway::RestGateway;
use crate::kinds::EntityKind;

/// Decode a gateway JSON value into a typed record.
pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(ApiError::decode)
}

/// Mutable state of one cache: the entity map plus the pending-task
/// registry for kinds whose creation is asynchronous.
pub struct CacheState<K: EntityKind> {
    entities: HashMap<String, K::Get>,
    pending: HashMap<String, K::Create>,
}

impl<K: EntityKind> Default for CacheState<K> {
    fn default() -> Self {
        Self {
            entities: HashMap::new(),
            pending: HashMap::new(),
        }
    }
}

impl<K: EntityKind> CacheState<K> {
    /// Upsert a record under its own uid.
    pub fn insert_entity(&mut self, entity: K::Get) {
        self.entities.insert(entity.uid().to_owned(), entity);
    }

    /// File a create-request under the uid of the task that is carrying it
    /// out. The entry stays until the task outcome has been reconciled.
    pub fn remember_pending(&mut self, task_uid: String, request: K::Create) {
        self.pending.insert(task_uid, request);
    }
}

/// Keyed read-through cache over one REST collection.
pub struct EntityCache<K: EntityKind> {
    gateway: Arc<dyn RestGateway>,
    state: RwLock<CacheState<K>>,
}

impl<K: EntityKind> EntityCache<K> {
    pub fn new(gateway: Arc<dyn RestGateway>) -> Self {
        Self {
            gateway,
            state: RwLock::new(CacheState::default()),
        }
    }

    // A poisoned lock only means a panic mid-patch elsewhere; the map is
    // still structurally sound, so reads and writes continue on it.
    fn read(&self) -> RwLockReadGuard<'_, CacheState<K>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CacheState<K>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch the full collection and upsert every returned record.
    ///
    /// The cache is never shrunk by a list: records the server no longer
    /// reports stay until removed explicitly. Returns a snapshot of the
    /// cache after the upsert.
    pub async fn list(&self) -> Result<HashMap<String, K::Get>> {
        let raw = self.gateway.list(K::COLLECTION).await?;
        let list: EntryList<K::Get> = decode(raw)?;
        let mut state = self.write();
        for entry in list.entries {
            state.insert_entity(entry);
        }
        Ok(state.entities.clone())
    }

    /// Return the cached record for `uid`, fetching it only on a miss.
    pub async fn get(&self, uid: &str) -> Result<K::Get> {
        if let Some(hit) = self.cached(uid) {
            debug!(collection = K::COLLECTION, uid, "cache hit");
            return Ok(hit);
        }
        debug!(collection = K::COLLECTION, uid, "cache miss");
        self.refresh(uid).await
    }

    /// Fetch `uid` from the server unconditionally and upsert the result.
    pub async fn refresh(&self, uid: &str) -> Result<K::Get> {
        let raw = self.gateway.fetch(K::COLLECTION, uid).await?;
        let entity: K::Get = decode(raw)?;
        self.write().insert_entity(entity.clone());
        Ok(entity)
    }

    /// Submit a create-request.
    ///
    /// For synchronously created kinds the echoed record is inserted into
    /// the cache and returned. For asynchronously created kinds the server
    /// answers with a task handle; the entity map is left untouched and the
    /// request is filed in the pending-task registry under the task's uid.
    pub async fn create(&self, request: K::Create) -> Result<K::Created> {
        let body = serde_json::to_value(&request).map_err(ApiError::encode)?;
        let raw = self.gateway.create(K::COLLECTION, body).await?;
        let created: K::Created = decode(raw)?;
        K::absorb_created(&mut self.write(), request, &created);
        info!(collection = K::COLLECTION, "create accepted");
        Ok(created)
    }

    /// Submit a full modify-request for `uid`; the acknowledged record
    /// replaces the cache entry (or is inserted if the entry was absent).
    pub async fn modify(&self, uid: &str, request: K::Modify) -> Result<K::Get> {
        let body = serde_json::to_value(&request).map_err(ApiError::encode)?;
        let raw = self.gateway.modify(K::COLLECTION, uid, body).await?;
        let entity: K::Get = decode(raw)?;
        self.write().insert_entity(entity.clone());
        Ok(entity)
    }

    /// Remove `uid` server-side, then locally. A failed removal leaves the
    /// cache untouched.
    pub async fn remove(&self, uid: &str) -> Result<()> {
        self.gateway.remove(K::COLLECTION, uid).await?;
        self.write().entities.remove(uid);
        Ok(())
    }

    /// (uid, name) projection of the current cache for selection widgets.
    /// Always computed fresh; never cached.
    pub fn options(&self) -> Vec<SelectOption> {
        self.read().entities.values().map(SelectOption::of).collect()
    }

    /// Cached record for `uid`, if any. Never touches the network.
    pub fn cached(&self, uid: &str) -> Option<K::Get> {
        self.read().entities.get(uid).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().entities.is_empty()
    }

    /// Snapshot of the pending-task registry.
    pub fn pending(&self) -> HashMap<String, K::Create> {
        self.read().pending.clone()
    }

    pub fn pending_len(&self) -> usize {
        self.read().pending.len()
    }

    /// The create-request a task is carrying out, if it is still pending.
    pub fn pending_request(&self, task_uid: &str) -> Option<K::Create> {
        self.read().pending.get(task_uid).cloned()
    }

    /// Drop a pending entry once its task is known to be terminal. Returns
    /// the request that was filed, if any. The cache never does this on its
    /// own; reconciliation is driven from outside.
    pub fn discard_pending(&self, task_uid: &str) -> Option<K::Create> {
        self.write().pending.remove(task_uid)
    }
}
