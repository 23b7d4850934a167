//! Network commands.

use clap::{Parser, Subcommand};
use machina_client::Session;
use machina_protocol::{Network, NetworkCreate, NetworkKind, NetworkModify};

use crate::output::{print_json, print_table};

#[derive(Debug, Parser)]
pub struct NetworkCli {
    #[command(subcommand)]
    command: NetworkSubcommand,
}

#[derive(Debug, Subcommand)]
enum NetworkSubcommand {
    /// List all networks
    List,
    /// Show one network
    Get { uid: String },
    /// Create a network
    Create {
        name: String,
        /// Attachment mode: host, shared or bridged
        #[arg(long, value_parser = parse_kind, default_value = "shared")]
        kind: NetworkKind,
        #[arg(long)]
        cidr: String,
        #[arg(long)]
        gateway: String,
        #[arg(long)]
        dhcp_start: String,
        #[arg(long)]
        dhcp_end: String,
    },
    /// Change a network's name or addressing
    Modify {
        uid: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        cidr: Option<String>,
        #[arg(long)]
        gateway: Option<String>,
        #[arg(long)]
        dhcp_start: Option<String>,
        #[arg(long)]
        dhcp_end: Option<String>,
    },
    /// Delete a network
    Remove { uid: String },
}

fn parse_kind(s: &str) -> Result<NetworkKind, String> {
    match s {
        "host" => Ok(NetworkKind::Host),
        "shared" => Ok(NetworkKind::Shared),
        "bridged" => Ok(NetworkKind::Bridged),
        other => Err(format!("unknown network kind: {other}")),
    }
}

const HEADER: &[&str] = &["UID", "NAME", "KIND", "CIDR", "GATEWAY", "DHCP"];

fn row(network: &Network) -> Vec<String> {
    vec![
        network.uid.clone(),
        network.name.clone(),
        format!("{:?}", network.kind).to_lowercase(),
        network.cidr.clone(),
        network.gateway.clone(),
        format!("{}-{}", network.dhcp_start, network.dhcp_end),
    ]
}

impl NetworkCli {
    pub async fn run(self, session: &Session, json: bool) -> anyhow::Result<()> {
        match self.command {
            NetworkSubcommand::List => {
                let networks = session.networks.list().await?;
                if json {
                    return print_json(&networks.values().collect::<Vec<_>>());
                }
                let mut networks: Vec<&Network> = networks.values().collect();
                networks.sort_by(|a, b| a.uid.cmp(&b.uid));
                print_table(HEADER, &networks.iter().map(|n| row(n)).collect::<Vec<_>>());
            }
            NetworkSubcommand::Get { uid } => {
                let network = session.networks.get(&uid).await?;
                if json {
                    return print_json(&network);
                }
                print_table(HEADER, &[row(&network)]);
            }
            NetworkSubcommand::Create {
                name,
                kind,
                cidr,
                gateway,
                dhcp_start,
                dhcp_end,
            } => {
                let network = session
                    .networks
                    .create(NetworkCreate {
                        name,
                        kind,
                        cidr,
                        gateway,
                        dhcp_start,
                        dhcp_end,
                    })
                    .await?;
                if json {
                    return print_json(&network);
                }
                println!("created network {}", network.uid);
            }
            NetworkSubcommand::Modify {
                uid,
                name,
                cidr,
                gateway,
                dhcp_start,
                dhcp_end,
            } => {
                let current = session.networks.get(&uid).await?;
                let mut request = NetworkModify::from(&current);
                if let Some(name) = name {
                    request.name = name;
                }
                if let Some(cidr) = cidr {
                    request.cidr = cidr;
                }
                if let Some(gateway) = gateway {
                    request.gateway = gateway;
                }
                if let Some(dhcp_start) = dhcp_start {
                    request.dhcp_start = dhcp_start;
                }
                if let Some(dhcp_end) = dhcp_end {
                    request.dhcp_end = dhcp_end;
                }
                let network = session.networks.modify(&uid, request).await?;
                if json {
                    return print_json(&network);
                }
                print_table(HEADER, &[row(&network)]);
            }
            NetworkSubcommand::Remove { uid } => {
                session.networks.remove(&uid).await?;
                println!("removed network {uid}");
            }
        }
        Ok(())
    }
}
