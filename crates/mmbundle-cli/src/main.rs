//! mmb - command-line tool for MMB disk bundles
//!
//! Loads a bundle file into memory, applies one command and writes the
//! whole file back when the command changes it.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mmbundle_core::{Bundle, BundleConfig, DiskImage, SlotInfo, DISK_SIZE};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mmb")]
#[command(about = "Inspect and edit MMB multi-disk bundles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Keep stale name bytes and old slot data like older MMB tools
    #[arg(long, global = true)]
    legacy: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new bundle file
    Create {
        file: PathBuf,

        /// Slots to allocate storage for
        #[arg(long, default_value = "0")]
        slots: u16,
    },

    /// Show bundle size and boot table
    Info {
        file: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// List catalogue entries
    List {
        file: PathBuf,

        /// Include unoccupied slots
        #[arg(long)]
        all: bool,

        #[arg(long)]
        json: bool,
    },

    /// Change the number of slots with storage
    Resize { file: PathBuf, slots: u16 },

    /// Mark a slot active
    Activate { file: PathBuf, slot: u16 },

    /// Remove a slot from the catalogue
    Deactivate {
        file: PathBuf,
        slot: u16,

        /// Zero the slot's disk image
        #[arg(long)]
        wipe: bool,
    },

    /// Write protect a slot
    Lock { file: PathBuf, slot: u16 },

    /// Remove write protection from a slot
    Unlock { file: PathBuf, slot: u16 },

    /// Set a slot's disk title
    Rename {
        file: PathBuf,
        slot: u16,
        name: String,
    },

    /// Show or set the boot slot for a drive
    Boot {
        file: PathBuf,
        drive: u8,
        slot: Option<u16>,
    },

    /// Copy a disk image file into a slot
    Insert {
        file: PathBuf,
        slot: u16,
        image: PathBuf,

        /// Mark the slot active if it is not already
        #[arg(long)]
        activate: bool,
    },

    /// Copy a slot out to a disk image file
    Extract {
        file: PathBuf,
        slot: u16,
        output: PathBuf,
    },
}

#[derive(Serialize)]
struct BundleSummary {
    path: String,
    bytes: usize,
    storage_slots: u16,
    occupied_slots: usize,
    boot: mmbundle_core::BootTable,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(cli.log_level.as_str())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = if cli.legacy {
        BundleConfig::legacy()
    } else {
        BundleConfig::default()
    };

    match cli.command {
        Command::Create { file, slots } => {
            let bundle = Bundle::with_config(slots, config)?;
            save(&file, &bundle)?;
            println!("Created {} with {} slots", file.display(), slots);
        }

        Command::Info { file, json } => {
            let bundle = load(&file, config)?;
            cmd_info(&file, &bundle, json)?;
        }

        Command::List { file, all, json } => {
            let bundle = load(&file, config)?;
            cmd_list(&bundle, all, json)?;
        }

        Command::Resize { file, slots } => {
            let mut bundle = load(&file, config)?;
            bundle
                .change_storage_size(slots)
                .with_context(|| format!("cannot resize to {} slots", slots))?;
            save(&file, &bundle)?;
        }

        Command::Activate { file, slot } => {
            edit(&file, config, |bundle| bundle.activate(slot))?;
        }

        Command::Deactivate { file, slot, wipe } => {
            edit(&file, config, |bundle| bundle.deactivate(slot, wipe))?;
        }

        Command::Lock { file, slot } => {
            edit(&file, config, |bundle| bundle.lock(slot))?;
        }

        Command::Unlock { file, slot } => {
            edit(&file, config, |bundle| bundle.unlock(slot))?;
        }

        Command::Rename { file, slot, name } => {
            edit(&file, config, |bundle| bundle.set_name(slot, &name))?;
        }

        Command::Boot { file, drive, slot } => match slot {
            Some(slot) => edit(&file, config, |bundle| bundle.set_boot_slot(drive, slot))?,
            None => {
                let bundle = load(&file, config)?;
                println!("{}", bundle.boot_slot(drive)?);
            }
        },

        Command::Insert {
            file,
            slot,
            image,
            activate,
        } => {
            let data = fs::read(&image)
                .with_context(|| format!("failed to read disk image {}", image.display()))?;

            if data.len() > DISK_SIZE {
                tracing::warn!(
                    "{} is {} bytes; only the first {} are used",
                    image.display(),
                    data.len(),
                    DISK_SIZE
                );
            }

            edit(&file, config, |bundle| {
                bundle.insert(slot, &data)?;
                if activate && !bundle.is_occupied(slot)? {
                    bundle.activate(slot)?;
                }
                Ok(())
            })?;
        }

        Command::Extract { file, slot, output } => {
            let bundle = load(&file, config)?;
            let disk: DiskImage = bundle.extract(slot)?;
            fs::write(&output, disk.as_bytes())
                .with_context(|| format!("failed to write {}", output.display()))?;
        }
    }

    Ok(())
}

fn load(path: &Path, config: BundleConfig) -> Result<Bundle> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read bundle {}", path.display()))?;
    tracing::info!("Loaded {} ({} bytes)", path.display(), bytes.len());

    Bundle::from_bytes_with_config(bytes, config)
        .with_context(|| format!("{} is not an MMB bundle", path.display()))
}

fn save(path: &Path, bundle: &Bundle) -> Result<()> {
    fs::write(path, bundle.as_bytes())
        .with_context(|| format!("failed to write bundle {}", path.display()))?;
    tracing::info!("Saved {} ({} bytes)", path.display(), bundle.as_bytes().len());
    Ok(())
}

/// Load, apply one mutation, save
fn edit<F>(path: &Path, config: BundleConfig, action: F) -> Result<()>
where
    F: FnOnce(&mut Bundle) -> mmbundle_core::Result<()>,
{
    let mut bundle = load(path, config)?;
    action(&mut bundle)?;
    save(path, &bundle)
}

fn cmd_info(path: &Path, bundle: &Bundle, json: bool) -> Result<()> {
    let summary = BundleSummary {
        path: path.display().to_string(),
        bytes: bundle.as_bytes().len(),
        storage_slots: bundle.storage_size(),
        occupied_slots: bundle.catalogue().iter().filter(|s| s.occupied).count(),
        boot: bundle.boot_table(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("=== Bundle Information ===");
    println!("Path:     {}", summary.path);
    println!("Size:     {}", format_bytes(summary.bytes as u64));
    println!("Storage:  {} slots", summary.storage_slots);
    println!("Occupied: {}", summary.occupied_slots);
    println!("Boot:     {}", summary.boot);
    Ok(())
}

fn cmd_list(bundle: &Bundle, all: bool, json: bool) -> Result<()> {
    let entries: Vec<SlotInfo> = bundle
        .catalogue()
        .into_iter()
        .filter(|entry| all || entry.occupied)
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No disks found.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry);
    }
    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1_048_576 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.2} MB", bytes as f64 / 1_048_576.0)
    }
}
