//! Task commands: inspect background work and fold finished tasks back
//! into the entity caches.

use std::time::Duration;

use clap::{Parser, Subcommand};
use machina_client::Session;
use machina_protocol::Task;

use crate::output::{TASK_HEADER, print_json, print_table, task_row};

const POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Parser)]
pub struct TaskCli {
    #[command(subcommand)]
    command: TaskSubcommand,
}

#[derive(Debug, Subcommand)]
enum TaskSubcommand {
    /// List all known tasks
    List,
    /// Show one task
    Get { uid: String },
    /// Poll a task until it finishes, then absorb its result
    Watch { uid: String },
}

impl TaskCli {
    pub async fn run(self, session: &Session, json: bool) -> anyhow::Result<()> {
        match self.command {
            TaskSubcommand::List => {
                let tasks = session.tasks.list().await?;
                if json {
                    return print_json(&tasks.values().collect::<Vec<_>>());
                }
                let mut tasks: Vec<&Task> = tasks.values().collect();
                tasks.sort_by(|a, b| a.uid.cmp(&b.uid));
                let rows: Vec<Vec<String>> = tasks.iter().map(|t| task_row(t)).collect();
                print_table(TASK_HEADER, &rows);
            }
            TaskSubcommand::Get { uid } => {
                let task = session.tasks.get(&uid).await?;
                if json {
                    return print_json(&task);
                }
                print_table(TASK_HEADER, &[task_row(&task)]);
            }
            TaskSubcommand::Watch { uid } => {
                let task = watch(session, &uid).await?;
                if json {
                    return print_json(&task);
                }
                print_table(TASK_HEADER, &[task_row(&task)]);
            }
        }
        Ok(())
    }
}

/// Poll `uid` until it reaches a terminal state, then promote the result
/// into the session caches. Returns the final task record.
pub async fn watch(session: &Session, uid: &str) -> anyhow::Result<Task> {
    loop {
        let task = session.tasks.refresh(uid).await?;
        if task.state.is_terminal() {
            session.promote(&task).await?;
            return Ok(task);
        }
        eprintln!("{}: {}% - {}", task.name, task.percent_complete, task.msg);
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
