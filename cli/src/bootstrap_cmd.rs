//! Bootstrap configuration commands. The template content is read from a
//! file so multi-line ignition or cloud-init documents stay editable.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use machina_client::Session;
use machina_protocol::{Bootstrap, BootstrapCreate, BootstrapKind, BootstrapModify};

use crate::output::{print_json, print_table};

#[derive(Debug, Parser)]
pub struct BootstrapCli {
    #[command(subcommand)]
    command: BootstrapSubcommand,
}

#[derive(Debug, Subcommand)]
enum BootstrapSubcommand {
    /// List all bootstrap configurations
    List,
    /// Show one bootstrap configuration
    Get { uid: String },
    /// Create a bootstrap configuration from a template file
    Create {
        name: String,
        /// Dialect: ignition or cloud-init
        #[arg(long, value_parser = parse_kind, default_value = "ignition")]
        kind: BootstrapKind,
        /// Path to the template content
        #[arg(long)]
        content: PathBuf,
    },
    /// Replace a bootstrap configuration's name or template
    Modify {
        uid: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        content: Option<PathBuf>,
    },
    /// Delete a bootstrap configuration
    Remove { uid: String },
}

fn parse_kind(s: &str) -> Result<BootstrapKind, String> {
    match s {
        "ignition" => Ok(BootstrapKind::Ignition),
        "cloud-init" => Ok(BootstrapKind::CloudInit),
        other => Err(format!("unknown bootstrap kind: {other}")),
    }
}

fn read_content(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

const HEADER: &[&str] = &["UID", "NAME", "KIND", "REQUIRED KEYS"];

fn row(bootstrap: &Bootstrap) -> Vec<String> {
    let kind = match bootstrap.kind {
        BootstrapKind::Ignition => "ignition",
        BootstrapKind::CloudInit => "cloud-init",
    };
    vec![
        bootstrap.uid.clone(),
        bootstrap.name.clone(),
        kind.to_owned(),
        bootstrap.required_keys.join(", "),
    ]
}

impl BootstrapCli {
    pub async fn run(self, session: &Session, json: bool) -> anyhow::Result<()> {
        match self.command {
            BootstrapSubcommand::List => {
                let bootstraps = session.bootstraps.list().await?;
                if json {
                    return print_json(&bootstraps.values().collect::<Vec<_>>());
                }
                let mut bootstraps: Vec<&Bootstrap> = bootstraps.values().collect();
                bootstraps.sort_by(|a, b| a.uid.cmp(&b.uid));
                print_table(
                    HEADER,
                    &bootstraps.iter().map(|b| row(b)).collect::<Vec<_>>(),
                );
            }
            BootstrapSubcommand::Get { uid } => {
                let bootstrap = session.bootstraps.get(&uid).await?;
                if json {
                    return print_json(&bootstrap);
                }
                print_table(HEADER, &[row(&bootstrap)]);
            }
            BootstrapSubcommand::Create {
                name,
                kind,
                content,
            } => {
                let content = read_content(&content)?;
                let bootstrap = session
                    .bootstraps
                    .create(BootstrapCreate::new(name, kind, content))
                    .await?;
                if json {
                    return print_json(&bootstrap);
                }
                println!("created bootstrap {}", bootstrap.uid);
            }
            BootstrapSubcommand::Modify { uid, name, content } => {
                let current = session.bootstraps.get(&uid).await?;
                let mut request = BootstrapModify::from(&current);
                if let Some(name) = name {
                    request.name = name;
                }
                if let Some(path) = content {
                    request.content = read_content(&path)?;
                }
                let bootstrap = session.bootstraps.modify(&uid, request).await?;
                if json {
                    return print_json(&bootstrap);
                }
                print_table(HEADER, &[row(&bootstrap)]);
            }
            BootstrapSubcommand::Remove { uid } => {
                session.bootstraps.remove(&uid).await?;
                println!("removed bootstrap {uid}");
            }
        }
        Ok(())
    }
}
