//! Disk commands.

use clap::{Parser, Subcommand};
use machina_client::Session;
use machina_protocol::{BinarySizedValue, Disk, DiskCreate, DiskFormat, DiskModify};

use crate::output::{print_json, print_table};

#[derive(Debug, Parser)]
pub struct DiskCli {
    #[command(subcommand)]
    command: DiskSubcommand,
}

#[derive(Debug, Subcommand)]
enum DiskSubcommand {
    /// List all disks
    List,
    /// Show one disk
    Get { uid: String },
    /// Create a disk
    Create {
        name: String,
        /// Size in gigabytes
        #[arg(long, default_value_t = 10)]
        size_gb: u64,
        /// On-disk format: raw, qcow2 or vdi
        #[arg(long, value_parser = parse_format, default_value = "qcow2")]
        format: DiskFormat,
        /// Clone the disk from this image uid
        #[arg(long)]
        image: Option<String>,
    },
    /// Rename or resize a disk
    Modify {
        uid: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        size_gb: Option<u64>,
    },
    /// Delete a disk
    Remove { uid: String },
}

fn parse_format(s: &str) -> Result<DiskFormat, String> {
    match s {
        "raw" => Ok(DiskFormat::Raw),
        "qcow2" => Ok(DiskFormat::QCow2),
        "vdi" => Ok(DiskFormat::Vdi),
        other => Err(format!("unknown disk format: {other}")),
    }
}

const HEADER: &[&str] = &["UID", "NAME", "SIZE", "FORMAT", "IMAGE"];

fn row(disk: &Disk) -> Vec<String> {
    vec![
        disk.uid.clone(),
        disk.name.clone(),
        disk.size.to_string(),
        format!("{:?}", disk.disk_format).to_lowercase(),
        disk.image_uid.clone().unwrap_or_default(),
    ]
}

impl DiskCli {
    pub async fn run(self, session: &Session, json: bool) -> anyhow::Result<()> {
        match self.command {
            DiskSubcommand::List => {
                let disks = session.disks.list().await?;
                if json {
                    return print_json(&disks.values().collect::<Vec<_>>());
                }
                let mut disks: Vec<&Disk> = disks.values().collect();
                disks.sort_by(|a, b| a.uid.cmp(&b.uid));
                print_table(HEADER, &disks.iter().map(|d| row(d)).collect::<Vec<_>>());
            }
            DiskSubcommand::Get { uid } => {
                let disk = session.disks.get(&uid).await?;
                if json {
                    return print_json(&disk);
                }
                print_table(HEADER, &[row(&disk)]);
            }
            DiskSubcommand::Create {
                name,
                size_gb,
                format,
                image,
            } => {
                let mut request = DiskCreate::new(name, BinarySizedValue::gigabytes(size_gb))
                    .with_format(format);
                if let Some(image) = image {
                    request = request.from_image(image);
                }
                let disk = session.disks.create(request).await?;
                if json {
                    return print_json(&disk);
                }
                println!("created disk {}", disk.uid);
            }
            DiskSubcommand::Modify { uid, name, size_gb } => {
                let current = session.disks.get(&uid).await?;
                let mut request = DiskModify::from(&current);
                if let Some(name) = name {
                    request.name = name;
                }
                if let Some(size_gb) = size_gb {
                    request.size = BinarySizedValue::gigabytes(size_gb);
                }
                let disk = session.disks.modify(&uid, request).await?;
                if json {
                    return print_json(&disk);
                }
                print_table(HEADER, &[row(&disk)]);
            }
            DiskSubcommand::Remove { uid } => {
                session.disks.remove(&uid).await?;
                println!("removed disk {uid}");
            }
        }
        Ok(())
    }
}
