//! Terminal rendering helpers shared by all commands.

use owo_colors::OwoColorize;
use serde::Serialize;

use machina_protocol::{Task, TaskState};

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print rows as a left-aligned table with a header line.
pub fn print_table(header: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if cell.len() > widths[i] {
                widths[i] = cell.len();
            }
        }
    }
    let render = |cells: &[String]| {
        cells
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{c:<width$}", width = widths[i]))
            .collect::<Vec<_>>()
            .join("  ")
    };
    let header: Vec<String> = header.iter().map(|h| (*h).to_owned()).collect();
    println!("{}", render(&header).bold());
    for row in rows {
        println!("{}", render(row));
    }
}

pub fn state_cell(state: TaskState) -> String {
    match state {
        TaskState::Running => "running".yellow().to_string(),
        TaskState::Done => "done".green().to_string(),
        TaskState::Failed => "failed".red().to_string(),
    }
}

pub fn task_row(task: &Task) -> Vec<String> {
    vec![
        task.uid.clone(),
        task.name.clone(),
        format!("{:?}", task.relation).to_lowercase(),
        state_cell(task.state),
        format!("{}%", task.percent_complete),
        task.msg.clone(),
    ]
}

pub const TASK_HEADER: &[&str] = &["UID", "NAME", "RELATION", "STATE", "PROGRESS", "MESSAGE"];
