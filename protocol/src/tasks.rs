//! Task records (`/api/tasks/`).
//!
//! A task is the server-side handle for an operation that outlives its HTTP
//! request, such as an image download or instance provisioning. Clients only
//! ever read tasks; there is no create/modify/remove surface.

use serde::{Deserialize, Serialize};

/// Which collection a task concerns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskRelation {
    #[serde(rename = "disks")]
    Disks,
    #[serde(rename = "images")]
    Images,
    #[serde(rename = "networks")]
    Networks,
    #[serde(rename = "identities")]
    Identities,
    #[serde(rename = "bootstraps")]
    Bootstraps,
    #[serde(rename = "instances")]
    Instances,
    /// Housekeeping work not tied to one collection.
    #[default]
    #[serde(rename = "general", other)]
    General,
}

/// Progress state of a task. `Done` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    #[default]
    #[serde(rename = "running")]
    Running,
    #[serde(rename = "done")]
    Done,
    #[serde(rename = "failed")]
    Failed,
}

impl TaskState {
    /// Whether the task will never change state again.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// Full task representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub uid: String,
    pub name: String,
    #[serde(default)]
    pub relation: TaskRelation,
    pub state: TaskState,
    /// Human-readable progress text.
    pub msg: String,
    /// Completion percentage in `[0, 100]`.
    pub percent_complete: u8,
    /// Free-form result payload, present once the task is terminal.
    #[serde(default)]
    pub outcome: Option<serde_json::Value>,
}

impl Task {
    /// The uid of the entity a completed task produced, when the outcome
    /// payload carries one. The payload is otherwise opaque to the client.
    pub fn outcome_uid(&self) -> Option<&str> {
        self.outcome.as_ref()?.get("uid")?.as_str()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn task_states_use_wire_names() {
        let task: Task = serde_json::from_value(json!({
            "uid": "t-1",
            "name": "download image",
            "relation": "images",
            "state": "running",
            "msg": "downloading",
            "percent_complete": 40
        }))
        .expect("deserialize");
        assert_eq!(task.state, TaskState::Running);
        assert_eq!(task.relation, TaskRelation::Images);
        assert!(!task.state.is_terminal());
        assert_eq!(task.outcome, None);
    }

    #[test]
    fn outcome_uid_reads_top_level_uid_only() {
        let mut task = Task {
            outcome: Some(json!({"uid": "img-1", "path": "/images/img-1"})),
            ..Task::default()
        };
        assert_eq!(task.outcome_uid(), Some("img-1"));

        task.outcome = Some(json!({"entity": {"uid": "img-1"}}));
        assert_eq!(task.outcome_uid(), None);
    }

    #[test]
    fn unknown_relation_collapses_to_general() {
        let task: Task = serde_json::from_value(json!({
            "uid": "t-2",
            "name": "compact database",
            "relation": "maintenance",
            "state": "done",
            "msg": "",
            "percent_complete": 100
        }))
        .expect("deserialize");
        assert_eq!(task.relation, TaskRelation::General);
        assert!(task.state.is_terminal());
    }
}
