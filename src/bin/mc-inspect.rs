// Copyright 2026 driedpampas@proton.me
// SPDX-License-Identifier: GPL-3.0-or-later

use anvil_nbt::anvil::RegionFile;
use anvil_nbt::nbt::parse::parse_named_tag;
use anvil_nbt::nbt::snbt::to_snbt;
use clap::{Parser, Subcommand};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mc-inspect")]
#[command(about = "Inspect Minecraft NBT and Anvil files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect a .dat (NBT) file
    Nbt {
        /// Path to the .dat file
        path: PathBuf,
        /// Force uncompressed (if not gzipped)
        #[arg(short, long)]
        uncompressed: bool,
        /// Print as stringified NBT (SNBT) instead of Rust debug form
        #[arg(long)]
        snbt: bool,
    },
    /// Inspect an .mca (Anvil) file
    Anvil {
        /// Path to the .mca file
        path: PathBuf,
        /// Chunk X coordinate (absolute, not region-local)
        #[arg(short, long)]
        x: Option<i32>,
        /// Chunk Z coordinate (absolute, not region-local)
        #[arg(short, long)]
        z: Option<i32>,
        /// Print as stringified NBT (SNBT) instead of Rust debug form
        #[arg(long)]
        snbt: bool,
        /// List every populated chunk slot in the region instead of a single chunk
        #[arg(long)]
        list: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = run() {
        let msg = format!("{:?}", e).to_lowercase();
        if msg.contains("broken pipe") || msg.contains("os error 32") {
            std::process::exit(0);
        }
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Parses `regionX`/`regionZ` out of the conventional `r.<x>.<z>.mca` file name.
fn region_coords_from_path(path: &Path) -> anyhow::Result<(i32, i32)> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("region path has no file name"))?;
    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() < 4 || parts[0] != "r" {
        return Err(anyhow::anyhow!(
            "expected a region file named r.<x>.<z>.mca, got '{name}'"
        ));
    }
    let x: i32 = parts[1].parse()?;
    let z: i32 = parts[2].parse()?;
    Ok((x, z))
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    match cli.command {
        Commands::Nbt {
            path,
            uncompressed,
            snbt,
        } => {
            let file = File::open(path)?;
            let mut data = Vec::new();
            if uncompressed {
                let mut file = file;
                file.read_to_end(&mut data)?;
            } else {
                let mut decoder = GzDecoder::new(file);
                decoder.read_to_end(&mut data)?;
            }

            let mut input = &data[..];
            let (name, tag) =
                parse_named_tag(&mut input).map_err(|_| anyhow::anyhow!("Failed to parse NBT"))?;
            writeln!(handle, "Root tag name: '{}'", name)?;
            if snbt {
                writeln!(handle, "{}", to_snbt(&tag))?;
            } else {
                writeln!(handle, "{:#?}", tag)?;
            }
        }
        Commands::Anvil {
            path,
            x,
            z,
            snbt,
            list,
        } => {
            let (region_x, region_z) = region_coords_from_path(&path)?;
            let region = RegionFile::open(&path, region_x, region_z)?;

            if list {
                for cz in region_z * 32..region_z * 32 + 32 {
                    for cx in region_x * 32..region_x * 32 + 32 {
                        if region.has_chunk(cx, cz)? {
                            writeln!(handle, "chunk ({cx}, {cz}) present")?;
                        }
                    }
                }
                return Ok(());
            }

            let (Some(x), Some(z)) = (x, z) else {
                writeln!(
                    handle,
                    "Anvil region file r.{region_x}.{region_z}.mca loaded. Use -x and -z to inspect a specific chunk, or --list to enumerate populated slots."
                )?;
                return Ok(());
            };

            match region.get_chunk(x, z)? {
                Some(column) => {
                    let column = column.lock().expect("chunk column mutex poisoned");
                    let tag = column.to_nbt();
                    writeln!(handle, "Chunk ({x}, {z}):")?;
                    if snbt {
                        writeln!(handle, "{}", to_snbt(&tag))?;
                    } else {
                        writeln!(handle, "{:#?}", tag)?;
                    }
                }
                None => {
                    writeln!(handle, "Chunk ({x}, {z}) is not present in this region.")?;
                }
            }
        }
    }
    Ok(())
}
