//! Identity commands. An identity is a user account seeded into instances
//! at bootstrap, either by public key or by password hash.

use clap::{Parser, Subcommand};
use machina_client::Session;
use machina_protocol::{Identity, IdentityCreate, IdentityKind, IdentityModify};

use crate::output::{print_json, print_table};

#[derive(Debug, Parser)]
pub struct IdentityCli {
    #[command(subcommand)]
    command: IdentitySubcommand,
}

#[derive(Debug, Subcommand)]
enum IdentitySubcommand {
    /// List all identities
    List,
    /// Show one identity
    Get { uid: String },
    /// Create an identity
    Create {
        name: String,
        /// Credential kind: pubkey or password
        #[arg(long, value_parser = parse_kind, default_value = "pubkey")]
        kind: IdentityKind,
        /// Public key or password hash, depending on kind
        #[arg(long)]
        credential: String,
        /// Full name (GECOS field)
        #[arg(long, default_value = "")]
        gecos: String,
        #[arg(long, default_value = "")]
        homedir: String,
        #[arg(long, default_value = "/bin/bash")]
        shell: String,
    },
    /// Change an identity
    Modify {
        uid: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        credential: Option<String>,
        #[arg(long)]
        gecos: Option<String>,
        #[arg(long)]
        homedir: Option<String>,
        #[arg(long)]
        shell: Option<String>,
    },
    /// Delete an identity
    Remove { uid: String },
}

fn parse_kind(s: &str) -> Result<IdentityKind, String> {
    match s {
        "pubkey" => Ok(IdentityKind::Pubkey),
        "password" => Ok(IdentityKind::Password),
        other => Err(format!("unknown identity kind: {other}")),
    }
}

const HEADER: &[&str] = &["UID", "NAME", "KIND", "GECOS", "SHELL"];

fn row(identity: &Identity) -> Vec<String> {
    vec![
        identity.uid.clone(),
        identity.name.clone(),
        format!("{:?}", identity.kind).to_lowercase(),
        identity.gecos.clone(),
        identity.shell.clone(),
    ]
}

impl IdentityCli {
    pub async fn run(self, session: &Session, json: bool) -> anyhow::Result<()> {
        match self.command {
            IdentitySubcommand::List => {
                let identities = session.identities.list().await?;
                if json {
                    return print_json(&identities.values().collect::<Vec<_>>());
                }
                let mut identities: Vec<&Identity> = identities.values().collect();
                identities.sort_by(|a, b| a.uid.cmp(&b.uid));
                print_table(
                    HEADER,
                    &identities.iter().map(|i| row(i)).collect::<Vec<_>>(),
                );
            }
            IdentitySubcommand::Get { uid } => {
                let identity = session.identities.get(&uid).await?;
                if json {
                    return print_json(&identity);
                }
                print_table(HEADER, &[row(&identity)]);
            }
            IdentitySubcommand::Create {
                name,
                kind,
                credential,
                gecos,
                homedir,
                shell,
            } => {
                let identity = session
                    .identities
                    .create(IdentityCreate {
                        name,
                        kind,
                        gecos,
                        homedir,
                        shell,
                        credential,
                    })
                    .await?;
                if json {
                    return print_json(&identity);
                }
                println!("created identity {}", identity.uid);
            }
            IdentitySubcommand::Modify {
                uid,
                name,
                credential,
                gecos,
                homedir,
                shell,
            } => {
                let current = session.identities.get(&uid).await?;
                let mut request = IdentityModify::from(&current);
                if let Some(name) = name {
                    request.name = name;
                }
                if let Some(credential) = credential {
                    request.credential = credential;
                }
                if let Some(gecos) = gecos {
                    request.gecos = gecos;
                }
                if let Some(homedir) = homedir {
                    request.homedir = homedir;
                }
                if let Some(shell) = shell {
                    request.shell = shell;
                }
                let identity = session.identities.modify(&uid, request).await?;
                if json {
                    return print_json(&identity);
                }
                print_table(HEADER, &[row(&identity)]);
            }
            IdentitySubcommand::Remove { uid } => {
                session.identities.remove(&uid).await?;
                println!("removed identity {uid}");
            }
        }
        Ok(())
    }
}
