//! One cache per kind over a shared gateway.
//!
//! A [`Session`] is the unit of state a frontend holds: six entity caches,
//! the task tracker, and the reconciliation step ([`Session::promote`]) that
//! turns a finished background task into cache state.

use std::sync::Arc;

use tracing::{debug, info, warn};

use machina_protocol::{Task, TaskRelation, TaskState};

use crate::cache::EntityCache;
use crate::error::Result;
use crate::gateway::{HttpGateway, RestGateway};
use crate::kinds::{Bootstraps, Disks, Identities, Images, Instances, Networks};
use crate::tasks::TaskTracker;

/// All client-side state against one backend.
pub struct Session {
    pub disks: EntityCache<Disks>,
    pub images: EntityCache<Images>,
    pub networks: EntityCache<Networks>,
    pub identities: EntityCache<Identities>,
    pub bootstraps: EntityCache<Bootstraps>,
    pub instances: EntityCache<Instances>,
    pub tasks: TaskTracker,
}

impl Session {
    /// Session over an injected gateway. Tests use this with a mock.
    pub fn new(gateway: Arc<dyn RestGateway>) -> Self {
        Self {
            disks: EntityCache::new(gateway.clone()),
            images: EntityCache::new(gateway.clone()),
            networks: EntityCache::new(gateway.clone()),
            identities: EntityCache::new(gateway.clone()),
            bootstraps: EntityCache::new(gateway.clone()),
            instances: EntityCache::new(gateway.clone()),
            tasks: TaskTracker::new(gateway),
        }
    }

    /// Session over HTTP against `base_url`, e.g. `http://localhost:8000`.
    pub fn connect(base_url: impl Into<String>) -> Self {
        Self::new(Arc::new(HttpGateway::new(base_url)))
    }

    /// Fold a terminal task back into the cache it relates to.
    ///
    /// A `done` task whose outcome names the produced entity gets that
    /// entity force-fetched into its cache; either way the pending-creation
    /// entry filed under the task's uid is dropped. Running tasks are left
    /// alone so the call is safe to make on every observed task.
    pub async fn promote(&self, task: &Task) -> Result<()> {
        match task.state {
            TaskState::Running => return Ok(()),
            TaskState::Done => {
                if let Some(uid) = task.outcome_uid() {
                    match task.relation {
                        TaskRelation::Images => {
                            self.images.refresh(uid).await?;
                            info!(task = %task.uid, uid, "image promoted into cache");
                        }
                        TaskRelation::Instances => {
                            self.instances.refresh(uid).await?;
                            info!(task = %task.uid, uid, "instance promoted into cache");
                        }
                        _ => {
                            debug!(task = %task.uid, relation = ?task.relation,
                                "no cache to promote into");
                        }
                    }
                } else {
                    warn!(task = %task.uid, "done task carries no outcome uid");
                }
            }
            TaskState::Failed => {
                warn!(task = %task.uid, msg = %task.msg, "task failed");
            }
        }
        match task.relation {
            TaskRelation::Images => {
                self.images.discard_pending(&task.uid);
            }
            TaskRelation::Instances => {
                self.instances.discard_pending(&task.uid);
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::gateway::mock::MockGateway;
    use machina_protocol::{BinarySizedValue, ImageCreate};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn image_json(uid: &str, name: &str) -> serde_json::Value {
        json!({
            "uid": uid,
            "name": name,
            "path": format!("/var/lib/machina/images/{name}.qcow2"),
            "url": "https://test/image",
            "min_vcpu": 2,
            "min_ram": { "value": 2, "scale": "Megabytes" },
            "min_disk": { "value": 2, "scale": "Megabytes" }
        })
    }

    fn task_json(uid: &str, state: &str, outcome: Option<serde_json::Value>) -> serde_json::Value {
        let mut t = json!({
            "uid": uid,
            "name": "download image",
            "relation": "images",
            "state": state,
            "msg": "",
            "percent_complete": if state == "running" { 40 } else { 100 }
        });
        if let Some(outcome) = outcome {
            t["outcome"] = outcome;
        }
        t
    }

    fn pending_image_session(gateway: &Arc<MockGateway>) -> Session {
        gateway.on_create("images", |_| task_json("task-1", "running", None));
        Session::new(gateway.clone())
    }

    #[tokio::test]
    async fn done_task_promotes_entity_and_drops_pending() {
        let gateway = Arc::new(MockGateway::new());
        let session = pending_image_session(&gateway);

        let request = ImageCreate::new("Test Image", "https://test/image").with_minimums(
            2,
            BinarySizedValue::megabytes(2),
            BinarySizedValue::megabytes(2),
        );
        session.images.create(request).await.expect("create");
        assert_eq!(session.images.pending_len(), 1);
        assert!(session.images.is_empty());

        // The backend finishes the download: the image materializes and the
        // task reports done with the new uid in its outcome.
        gateway.seed("images", vec![image_json("img-7", "Test Image")]);
        gateway.seed(
            "tasks",
            vec![task_json("task-1", "done", Some(json!({ "uid": "img-7" })))],
        );
        let done = session.tasks.refresh("task-1").await.expect("task");

        session.promote(&done).await.expect("promote");
        assert_eq!(session.images.pending_len(), 0);
        let image = session.images.cached("img-7").expect("promoted image");
        assert_eq!(image.name, "Test Image");
    }

    #[tokio::test]
    async fn failed_task_only_drops_pending() {
        let gateway = Arc::new(MockGateway::new());
        let session = pending_image_session(&gateway);

        session
            .images
            .create(ImageCreate::new("Broken", "https://test/broken"))
            .await
            .expect("create");
        assert_eq!(session.images.pending_len(), 1);

        gateway.seed("tasks", vec![task_json("task-1", "failed", None)]);
        let failed = session.tasks.refresh("task-1").await.expect("task");

        session.promote(&failed).await.expect("promote");
        assert_eq!(session.images.pending_len(), 0);
        assert!(session.images.is_empty());
    }

    #[tokio::test]
    async fn running_task_is_left_alone() {
        let gateway = Arc::new(MockGateway::new());
        let session = pending_image_session(&gateway);

        session
            .images
            .create(ImageCreate::new("Slow", "https://test/slow"))
            .await
            .expect("create");

        let running: Task =
            serde_json::from_value(task_json("task-1", "running", None)).expect("task");
        session.promote(&running).await.expect("promote");
        assert_eq!(session.images.pending_len(), 1);
    }

    #[tokio::test]
    async fn caches_share_one_gateway() {
        let gateway = Arc::new(MockGateway::new());
        gateway.seed("disks", vec![]);
        let session = Session::new(gateway.clone());
        session.disks.list().await.expect("list");
        session.networks.list().await.expect("list");
        assert_eq!(gateway.requests("disks"), 1);
        assert_eq!(gateway.requests("networks"), 1);
    }
}
