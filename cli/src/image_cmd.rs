//! Image commands. Creation downloads the image in the background, so
//! `create` answers with a task; `--wait` polls it to completion.

use clap::{Parser, Subcommand};
use machina_client::Session;
use machina_protocol::{BinarySizedValue, Image, ImageCreate, ImageModify};

use crate::output::{print_json, print_table};
use crate::task_cmd::watch;

#[derive(Debug, Parser)]
pub struct ImageCli {
    #[command(subcommand)]
    command: ImageSubcommand,
}

#[derive(Debug, Subcommand)]
enum ImageSubcommand {
    /// List all images
    List,
    /// Show one image
    Get { uid: String },
    /// Download an image from a URL
    Create {
        name: String,
        /// Source URL of the image file
        url: String,
        /// Minimum vCPUs an instance needs to boot this image
        #[arg(long, default_value_t = 1)]
        min_vcpu: u16,
        /// Minimum RAM in gigabytes
        #[arg(long, default_value_t = 1)]
        min_ram_gb: u64,
        /// Minimum OS disk size in gigabytes
        #[arg(long, default_value_t = 4)]
        min_disk_gb: u64,
        /// Poll the download task until it finishes
        #[arg(long)]
        wait: bool,
    },
    /// Change an image's name or boot minimums
    Modify {
        uid: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        min_vcpu: Option<u16>,
        #[arg(long)]
        min_ram_gb: Option<u64>,
        #[arg(long)]
        min_disk_gb: Option<u64>,
    },
    /// Delete an image
    Remove { uid: String },
}

const HEADER: &[&str] = &["UID", "NAME", "URL", "MIN VCPU", "MIN RAM", "MIN DISK"];

fn row(image: &Image) -> Vec<String> {
    vec![
        image.uid.clone(),
        image.name.clone(),
        image.url.clone(),
        image.min_vcpu.to_string(),
        image.min_ram.to_string(),
        image.min_disk.to_string(),
    ]
}

impl ImageCli {
    pub async fn run(self, session: &Session, json: bool) -> anyhow::Result<()> {
        match self.command {
            ImageSubcommand::List => {
                let images = session.images.list().await?;
                if json {
                    return print_json(&images.values().collect::<Vec<_>>());
                }
                let mut images: Vec<&Image> = images.values().collect();
                images.sort_by(|a, b| a.uid.cmp(&b.uid));
                print_table(HEADER, &images.iter().map(|i| row(i)).collect::<Vec<_>>());
            }
            ImageSubcommand::Get { uid } => {
                let image = session.images.get(&uid).await?;
                if json {
                    return print_json(&image);
                }
                print_table(HEADER, &[row(&image)]);
            }
            ImageSubcommand::Create {
                name,
                url,
                min_vcpu,
                min_ram_gb,
                min_disk_gb,
                wait,
            } => {
                let request = ImageCreate::new(name, url).with_minimums(
                    min_vcpu,
                    BinarySizedValue::gigabytes(min_ram_gb),
                    BinarySizedValue::gigabytes(min_disk_gb),
                );
                let task = session.images.create(request).await?;
                if !wait {
                    if json {
                        return print_json(&task);
                    }
                    println!("download started, task {}", task.uid);
                    return Ok(());
                }
                let done = watch(session, &task.uid).await?;
                match done.outcome_uid().and_then(|uid| session.images.cached(uid)) {
                    Some(image) if json => return print_json(&image),
                    Some(image) => print_table(HEADER, &[row(&image)]),
                    None => anyhow::bail!("download failed: {}", done.msg),
                }
            }
            ImageSubcommand::Modify {
                uid,
                name,
                min_vcpu,
                min_ram_gb,
                min_disk_gb,
            } => {
                let current = session.images.get(&uid).await?;
                let mut request = ImageModify::from(&current);
                if let Some(name) = name {
                    request.name = name;
                }
                if let Some(min_vcpu) = min_vcpu {
                    request.min_vcpu = min_vcpu;
                }
                if let Some(gb) = min_ram_gb {
                    request.min_ram = BinarySizedValue::gigabytes(gb);
                }
                if let Some(gb) = min_disk_gb {
                    request.min_disk = BinarySizedValue::gigabytes(gb);
                }
                let image = session.images.modify(&uid, request).await?;
                if json {
                    return print_json(&image);
                }
                print_table(HEADER, &[row(&image)]);
            }
            ImageSubcommand::Remove { uid } => {
                session.images.remove(&uid).await?;
                println!("removed image {uid}");
            }
        }
        Ok(())
    }
}
