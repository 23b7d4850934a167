//! Task tracking.
//!
//! Tasks are read-only from the client's point of view: the tracker mirrors
//! `/api/tasks/` with the same read-through discipline as the entity caches
//! and exposes derived views by state. It never polls on its own: state
//! transitions are only observed when a caller lists or force-refreshes,
//! but every transition into a terminal state it does observe is announced
//! on a broadcast channel so the owning session can reconcile pending
//! creations.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::broadcast;
use tracing::{debug, info};

use machina_protocol::{EntryList, Task, TaskState};

use crate::cache::decode;
use crate::error::Result;
use crate::gateway::RestGateway;

const COLLECTION: &str = "tasks";

/// Capacity of the completion announcement channel. Slow subscribers drop
/// the oldest announcements, which is acceptable: reconciliation re-fetches
/// everything it needs.
const EVENT_CAPACITY: usize = 64;

/// Read-through store over task records with terminal-transition
/// announcements.
pub struct TaskTracker {
    gateway: Arc<dyn RestGateway>,
    state: RwLock<HashMap<String, Task>>,
    events: broadcast::Sender<Task>,
}

impl TaskTracker {
    pub fn new(gateway: Arc<dyn RestGateway>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            gateway,
            state: RwLock::new(HashMap::new()),
            events,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Task>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Task>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Receive tasks this tracker observes reaching `done` or `failed`.
    pub fn subscribe(&self) -> broadcast::Receiver<Task> {
        self.events.subscribe()
    }

    /// Upsert one task, announcing it if this is the first time the tracker
    /// sees it in a terminal state.
    fn absorb(&self, state: &mut HashMap<String, Task>, task: Task) {
        let already_terminal = state
            .get(&task.uid)
            .is_some_and(|known| known.state.is_terminal());
        if task.state.is_terminal() && !already_terminal {
            info!(uid = %task.uid, state = ?task.state, "task reached terminal state");
            // No receivers is fine; announcements are best-effort.
            let _ = self.events.send(task.clone());
        }
        state.insert(task.uid.clone(), task);
    }

    /// Fetch all tasks and upsert them. Returns a snapshot of the store.
    pub async fn list(&self) -> Result<HashMap<String, Task>> {
        let raw = self.gateway.list(COLLECTION).await?;
        let list: EntryList<Task> = decode(raw)?;
        let mut state = self.write();
        for task in list.entries {
            self.absorb(&mut state, task);
        }
        Ok(state.clone())
    }

    /// Return the cached task for `uid`, fetching only on a miss.
    pub async fn get(&self, uid: &str) -> Result<Task> {
        if let Some(hit) = self.cached(uid) {
            debug!(collection = COLLECTION, uid, "cache hit");
            return Ok(hit);
        }
        self.refresh(uid).await
    }

    /// Fetch `uid` unconditionally and upsert the result. This is how a
    /// running task's progress is observed.
    pub async fn refresh(&self, uid: &str) -> Result<Task> {
        let raw = self.gateway.fetch(COLLECTION, uid).await?;
        let task: Task = decode(raw)?;
        self.absorb(&mut self.write(), task.clone());
        Ok(task)
    }

    /// Cached task for `uid`, if any. Never touches the network.
    pub fn cached(&self, uid: &str) -> Option<Task> {
        self.read().get(uid).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn in_state(&self, wanted: TaskState) -> Vec<Task> {
        self.read()
            .values()
            .filter(|t| t.state == wanted)
            .cloned()
            .collect()
    }

    /// Tasks currently known to be running.
    pub fn running(&self) -> Vec<Task> {
        self.in_state(TaskState::Running)
    }

    /// Tasks that completed successfully.
    pub fn done(&self) -> Vec<Task> {
        self.in_state(TaskState::Done)
    }

    /// Tasks that failed.
    pub fn failed(&self) -> Vec<Task> {
        self.in_state(TaskState::Failed)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::gateway::mock::MockGateway;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn task_json(uid: &str, state: &str, percent: u8) -> serde_json::Value {
        json!({
            "uid": uid,
            "name": format!("task {uid}"),
            "relation": "images",
            "state": state,
            "msg": "",
            "percent_complete": percent
        })
    }

    fn tracker_with(entries: Vec<serde_json::Value>) -> (Arc<MockGateway>, TaskTracker) {
        let gateway = Arc::new(MockGateway::new());
        gateway.seed("tasks", entries);
        let tracker = TaskTracker::new(gateway.clone());
        (gateway, tracker)
    }

    #[tokio::test]
    async fn views_partition_by_state() {
        let (_, tracker) = tracker_with(vec![
            task_json("0", "running", 10),
            task_json("1", "done", 100),
            task_json("2", "failed", 40),
            task_json("3", "running", 70),
        ]);
        tracker.list().await.expect("list");
        assert_eq!(tracker.len(), 4);
        assert_eq!(tracker.running().len(), 2);
        assert_eq!(tracker.done().len(), 1);
        assert_eq!(tracker.failed().len(), 1);
    }

    #[tokio::test]
    async fn get_does_not_observe_transitions() {
        let (gateway, tracker) = tracker_with(vec![task_json("0", "running", 10)]);
        tracker.list().await.expect("list");
        gateway.tamper("tasks", "0", task_json("0", "done", 100));

        // Unforced read serves the stale running record.
        let stale = tracker.get("0").await.expect("get");
        assert_eq!(stale.state, TaskState::Running);

        let fresh = tracker.refresh("0").await.expect("refresh");
        assert_eq!(fresh.state, TaskState::Done);
    }

    #[tokio::test]
    async fn terminal_transition_is_announced_once() {
        let (gateway, tracker) = tracker_with(vec![task_json("0", "running", 10)]);
        let mut events = tracker.subscribe();
        tracker.list().await.expect("list");

        gateway.tamper("tasks", "0", task_json("0", "done", 100));
        tracker.refresh("0").await.expect("refresh");
        // A second observation of the same terminal state stays silent.
        tracker.refresh("0").await.expect("refresh again");

        let announced = events.try_recv().expect("one announcement");
        assert_eq!(announced.uid, "0");
        assert_eq!(announced.state, TaskState::Done);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn first_observation_of_a_terminal_task_is_announced() {
        let (_, tracker) = tracker_with(vec![task_json("9", "failed", 30)]);
        let mut events = tracker.subscribe();
        tracker.list().await.expect("list");
        assert_eq!(events.try_recv().expect("announcement").uid, "9");
    }

    #[tokio::test]
    async fn announcements_without_subscribers_are_dropped() {
        let (_, tracker) = tracker_with(vec![task_json("1", "done", 100)]);
        // No subscriber; list must still succeed.
        tracker.list().await.expect("list");
        assert_eq!(tracker.done().len(), 1);
    }
}
