//! Remote collection gateway.
//!
//! The caches talk to the backend exclusively through [`RestGateway`], a
//! narrow JSON-level contract over the per-collection REST surface. The
//! production implementation is [`HttpGateway`]; tests inject the in-memory
//! [`mock::MockGateway`] instead.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ApiError, Result};

/// JSON-level operations against one REST collection.
///
/// Implementations classify every failure through [`ApiError`] before
/// returning; callers never see a raw transport error.
#[async_trait]
pub trait RestGateway: Send + Sync {
    /// `GET /api/<collection>/`: the list envelope.
    async fn list(&self, collection: &str) -> Result<Value>;
    /// `GET /api/<collection>/<uid>`: a single record.
    async fn fetch(&self, collection: &str, uid: &str) -> Result<Value>;
    /// `POST /api/<collection>/`: the created record, or a task record for
    /// collections with asynchronous creation.
    async fn create(&self, collection: &str, body: Value) -> Result<Value>;
    /// `PUT /api/<collection>/<uid>`: the updated record.
    async fn modify(&self, collection: &str, uid: &str, body: Value) -> Result<Value>;
    /// `DELETE /api/<collection>/<uid>`.
    async fn remove(&self, collection: &str, uid: &str) -> Result<()>;
}

/// reqwest-backed [`RestGateway`].
pub struct HttpGateway {
    base: String,
    http: reqwest::Client,
}

impl HttpGateway {
    /// Gateway against `base`, e.g. `http://localhost:8000`.
    pub fn new(base: impl Into<String>) -> Self {
        Self::with_client(base, reqwest::Client::new())
    }

    /// Gateway with a caller-configured client (timeouts, TLS, headers).
    pub fn with_client(base: impl Into<String>, http: reqwest::Client) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { base, http }
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/api/{collection}/", self.base)
    }

    fn entity_url(&self, collection: &str, uid: &str) -> String {
        format!("{}/api/{collection}/{uid}", self.base)
    }

    /// Drive a request to completion and decode the response, classifying
    /// non-2xx answers from their fault body.
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Value> {
        let response = request.send().await.map_err(ApiError::transport)?;
        let status = response.status();
        let body = response.text().await.map_err(ApiError::transport)?;
        if !status.is_success() {
            let err = ApiError::classify(status.as_u16(), &body);
            warn!(status = status.as_u16(), msg = err.msg(), "request failed");
            return Err(err);
        }
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(ApiError::decode)
    }
}

#[async_trait]
impl RestGateway for HttpGateway {
    async fn list(&self, collection: &str) -> Result<Value> {
        debug!(collection, "GET list");
        self.execute(self.http.get(self.collection_url(collection))).await
    }

    async fn fetch(&self, collection: &str, uid: &str) -> Result<Value> {
        debug!(collection, uid, "GET");
        self.execute(self.http.get(self.entity_url(collection, uid))).await
    }

    async fn create(&self, collection: &str, body: Value) -> Result<Value> {
        debug!(collection, "POST");
        self.execute(self.http.post(self.collection_url(collection)).json(&body))
            .await
    }

    async fn modify(&self, collection: &str, uid: &str, body: Value) -> Result<Value> {
        debug!(collection, uid, "PUT");
        self.execute(self.http.put(self.entity_url(collection, uid)).json(&body))
            .await
    }

    async fn remove(&self, collection: &str, uid: &str) -> Result<()> {
        debug!(collection, uid, "DELETE");
        self.execute(self.http.delete(self.entity_url(collection, uid)))
            .await?;
        Ok(())
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(clippy::unwrap_used)] // Mock code: panicking on a poisoned lock is acceptable in tests
pub mod mock {
    //! Seeded in-memory gateway for unit tests.
    //!
    //! Collections are plain uid-to-JSON maps. Creation synthesizes records
    //! through a per-collection closure (or a counter-based default), and
    //! every operation bumps a per-collection request counter so tests can
    //! prove that a cache hit made no network call.

    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;
    use machina_protocol::{FaultKind, FaultSchema};

    type CreateFn = Box<dyn Fn(Value) -> Value + Send + Sync>;

    #[derive(Default)]
    struct MockState {
        collections: HashMap<String, HashMap<String, Value>>,
        requests: HashMap<String, usize>,
    }

    /// In-memory [`RestGateway`] double.
    #[derive(Default)]
    pub struct MockGateway {
        state: Mutex<MockState>,
        create_fns: Mutex<HashMap<String, CreateFn>>,
        serial: AtomicU64,
    }

    impl MockGateway {
        pub fn new() -> Self {
            Self::default()
        }

        /// Seed a collection with records; each must carry a `uid` field.
        pub fn seed(&self, collection: &str, entries: Vec<Value>) {
            let mut state = self.state.lock().unwrap();
            let map = state.collections.entry(collection.to_owned()).or_default();
            for entry in entries {
                let uid = entry["uid"].as_str().unwrap().to_owned();
                map.insert(uid, entry);
            }
        }

        /// Replace the create behavior for a collection. The closure maps
        /// the request body to the response body. Responses that look like
        /// task handles (they carry `percent_complete`) are not inserted
        /// into the collection.
        pub fn on_create(&self, collection: &str, f: impl Fn(Value) -> Value + Send + Sync + 'static) {
            self.create_fns
                .lock()
                .unwrap()
                .insert(collection.to_owned(), Box::new(f));
        }

        /// Replace one seeded record in place, bypassing the request path.
        pub fn tamper(&self, collection: &str, uid: &str, entry: Value) {
            let mut state = self.state.lock().unwrap();
            state
                .collections
                .entry(collection.to_owned())
                .or_default()
                .insert(uid.to_owned(), entry);
        }

        /// How many gateway calls the collection has served.
        pub fn requests(&self, collection: &str) -> usize {
            *self
                .state
                .lock()
                .unwrap()
                .requests
                .get(collection)
                .unwrap_or(&0)
        }

        /// Records currently held for a collection.
        pub fn len(&self, collection: &str) -> usize {
            self.state
                .lock()
                .unwrap()
                .collections
                .get(collection)
                .map_or(0, HashMap::len)
        }

        pub fn is_empty(&self, collection: &str) -> bool {
            self.len(collection) == 0
        }

        fn count(&self, state: &mut MockState, collection: &str) {
            *state.requests.entry(collection.to_owned()).or_insert(0) += 1;
        }

        fn not_found(uid: &str) -> ApiError {
            ApiError::from_fault(
                404,
                FaultSchema {
                    status: 404,
                    msg: format!("no such entity: {uid}"),
                    kind: FaultKind::NotFound,
                },
            )
        }
    }

    #[async_trait]
    impl RestGateway for MockGateway {
        async fn list(&self, collection: &str) -> Result<Value> {
            let mut state = self.state.lock().unwrap();
            self.count(&mut state, collection);
            let entries: Vec<Value> = state
                .collections
                .get(collection)
                .map(|m| m.values().cloned().collect())
                .unwrap_or_default();
            Ok(serde_json::json!({ "entries": entries }))
        }

        async fn fetch(&self, collection: &str, uid: &str) -> Result<Value> {
            let mut state = self.state.lock().unwrap();
            self.count(&mut state, collection);
            state
                .collections
                .get(collection)
                .and_then(|m| m.get(uid))
                .cloned()
                .ok_or_else(|| Self::not_found(uid))
        }

        async fn create(&self, collection: &str, body: Value) -> Result<Value> {
            let created = match self.create_fns.lock().unwrap().get(collection) {
                Some(f) => f(body),
                None => {
                    let mut created = body;
                    let serial = self.serial.fetch_add(1, Ordering::Relaxed);
                    created["uid"] = Value::String(format!("uid-{serial}"));
                    created
                }
            };
            let mut state = self.state.lock().unwrap();
            self.count(&mut state, collection);
            // Task handles (recognized by their progress field) never enter
            // the collection; the entity appears later, on its own.
            let is_task = created.get("percent_complete").is_some();
            if !is_task {
                if let Some(uid) = created["uid"].as_str() {
                    state
                        .collections
                        .entry(collection.to_owned())
                        .or_default()
                        .insert(uid.to_owned(), created.clone());
                }
            }
            Ok(created)
        }

        async fn modify(&self, collection: &str, uid: &str, body: Value) -> Result<Value> {
            let mut state = self.state.lock().unwrap();
            self.count(&mut state, collection);
            let map = state.collections.entry(collection.to_owned()).or_default();
            let Some(current) = map.get(uid) else {
                return Err(Self::not_found(uid));
            };
            let mut updated = current.clone();
            if let (Some(target), Some(patch)) = (updated.as_object_mut(), body.as_object()) {
                for (key, value) in patch {
                    target.insert(key.clone(), value.clone());
                }
            }
            map.insert(uid.to_owned(), updated.clone());
            Ok(updated)
        }

        async fn remove(&self, collection: &str, uid: &str) -> Result<()> {
            let mut state = self.state.lock().unwrap();
            self.count(&mut state, collection);
            let removed = state
                .collections
                .get_mut(collection)
                .and_then(|m| m.remove(uid));
            match removed {
                Some(_) => Ok(()),
                None => Err(Self::not_found(uid)),
            }
        }
    }
}
