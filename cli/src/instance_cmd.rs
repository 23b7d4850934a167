//! Instance commands. Provisioning is asynchronous; start and stop are
//! expressed through the instance's desired state.

use clap::{Parser, Subcommand};
use machina_client::Session;
use machina_protocol::{
    BinarySizedValue, Instance, InstanceCreate, InstanceModify, InstanceState,
};

use crate::output::{print_json, print_table};
use crate::task_cmd::watch;

#[derive(Debug, Parser)]
pub struct InstanceCli {
    #[command(subcommand)]
    command: InstanceSubcommand,
}

#[derive(Debug, Subcommand)]
enum InstanceSubcommand {
    /// List all instances
    List,
    /// Show one instance
    Get { uid: String },
    /// Provision a new instance
    Create {
        name: String,
        /// Image to clone the OS disk from
        #[arg(long)]
        image: String,
        /// Network to attach
        #[arg(long)]
        network: String,
        /// Bootstrap configuration for first boot
        #[arg(long)]
        bootstrap: String,
        #[arg(long, default_value_t = 1)]
        vcpu: u16,
        /// RAM in gigabytes
        #[arg(long, default_value_t = 2)]
        ram_gb: u64,
        /// OS disk size in gigabytes
        #[arg(long, default_value_t = 10)]
        os_disk_gb: u64,
        /// Poll the provisioning task until it finishes
        #[arg(long)]
        wait: bool,
    },
    /// Change an instance's name or sizing
    Modify {
        uid: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        vcpu: Option<u16>,
        #[arg(long)]
        ram_gb: Option<u64>,
    },
    /// Request an instance to start
    Start { uid: String },
    /// Request an instance to stop
    Stop { uid: String },
    /// Delete an instance
    Remove { uid: String },
}

const HEADER: &[&str] = &["UID", "NAME", "STATE", "VCPU", "RAM", "MAC"];

fn row(instance: &Instance) -> Vec<String> {
    let state = match instance.state {
        InstanceState::Stopping => "STOPPING",
        InstanceState::Stopped => "STOPPED",
        InstanceState::Starting => "STARTING",
        InstanceState::Started => "STARTED",
    };
    vec![
        instance.uid.clone(),
        instance.name.clone(),
        state.to_owned(),
        instance.vcpu.to_string(),
        instance.ram.to_string(),
        instance.mac.clone(),
    ]
}

impl InstanceCli {
    pub async fn run(self, session: &Session, json: bool) -> anyhow::Result<()> {
        match self.command {
            InstanceSubcommand::List => {
                let instances = session.instances.list().await?;
                if json {
                    return print_json(&instances.values().collect::<Vec<_>>());
                }
                let mut instances: Vec<&Instance> = instances.values().collect();
                instances.sort_by(|a, b| a.uid.cmp(&b.uid));
                print_table(
                    HEADER,
                    &instances.iter().map(|i| row(i)).collect::<Vec<_>>(),
                );
            }
            InstanceSubcommand::Get { uid } => {
                let instance = session.instances.get(&uid).await?;
                if json {
                    return print_json(&instance);
                }
                print_table(HEADER, &[row(&instance)]);
            }
            InstanceSubcommand::Create {
                name,
                image,
                network,
                bootstrap,
                vcpu,
                ram_gb,
                os_disk_gb,
                wait,
            } => {
                let request = InstanceCreate {
                    name,
                    vcpu,
                    ram: BinarySizedValue::gigabytes(ram_gb),
                    os_disk_size: BinarySizedValue::gigabytes(os_disk_gb),
                    image_uid: image,
                    network_uid: network,
                    bootstrap_uid: bootstrap,
                };
                let task = session.instances.create(request).await?;
                if !wait {
                    if json {
                        return print_json(&task);
                    }
                    println!("provisioning started, task {}", task.uid);
                    return Ok(());
                }
                let done = watch(session, &task.uid).await?;
                match done
                    .outcome_uid()
                    .and_then(|uid| session.instances.cached(uid))
                {
                    Some(instance) if json => return print_json(&instance),
                    Some(instance) => print_table(HEADER, &[row(&instance)]),
                    None => anyhow::bail!("provisioning failed: {}", done.msg),
                }
            }
            InstanceSubcommand::Modify {
                uid,
                name,
                vcpu,
                ram_gb,
            } => {
                let current = session.instances.get(&uid).await?;
                let mut request = InstanceModify::from(&current);
                if let Some(name) = name {
                    request.name = name;
                }
                if let Some(vcpu) = vcpu {
                    request.vcpu = vcpu;
                }
                if let Some(gb) = ram_gb {
                    request.ram = BinarySizedValue::gigabytes(gb);
                }
                let instance = session.instances.modify(&uid, request).await?;
                if json {
                    return print_json(&instance);
                }
                print_table(HEADER, &[row(&instance)]);
            }
            InstanceSubcommand::Start { uid } => {
                let instance = set_state(session, &uid, InstanceState::Started).await?;
                if json {
                    return print_json(&instance);
                }
                print_table(HEADER, &[row(&instance)]);
            }
            InstanceSubcommand::Stop { uid } => {
                let instance = set_state(session, &uid, InstanceState::Stopped).await?;
                if json {
                    return print_json(&instance);
                }
                print_table(HEADER, &[row(&instance)]);
            }
            InstanceSubcommand::Remove { uid } => {
                session.instances.remove(&uid).await?;
                println!("removed instance {uid}");
            }
        }
        Ok(())
    }
}

async fn set_state(
    session: &Session,
    uid: &str,
    state: InstanceState,
) -> anyhow::Result<Instance> {
    let current = session.instances.get(uid).await?;
    let mut request = InstanceModify::from(&current);
    request.state = state;
    Ok(session.instances.modify(uid, request).await?)
}
