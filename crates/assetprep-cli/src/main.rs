//! Assetprep CLI - renumber and partition paired image/metadata sets.
//!
//! Two independent subcommands over `assetprep-core`:
//! `normalize` remaps a numbered folder to contiguous 0-based pairs,
//! `split` carves four fixed-size tier slices into four output folders.

use anyhow::Result;
use assetprep_core::{copy_tier, default_plan, normalize, NormalizeOptions};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "assetprep")]
#[command(about = "Renumber and partition paired image/metadata asset sets")]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Renumber a folder of numbered pairs to contiguous 0-based indices
    Normalize {
        /// Folder with PNGs (any names, but with trailing numbers)
        #[arg(long)]
        images: PathBuf,

        /// Folder with JSON sidecars; defaults to the images folder
        #[arg(long)]
        meta: Option<PathBuf>,

        /// Output folder (will contain 0.png/0.json ...)
        #[arg(long)]
        out: PathBuf,

        /// Start index used in the source filenames
        #[arg(long, default_value_t = 1)]
        start: u64,
    },

    /// Copy fixed-size slices of four tier folders into four output sets
    Split {
        /// Source root containing the tier folders
        #[arg(long)]
        src: PathBuf,

        /// Output root folder
        #[arg(long)]
        out: PathBuf,

        /// Tier folder names under the source root
        #[arg(long, default_value = "LittlGEN")]
        lgen: String,
        #[arg(long, default_value = "BigGEN")]
        bgen: String,
        #[arg(long, default_value = "LittlGENdiamond")]
        ldia: String,
        #[arg(long, default_value = "BigGENdiamond")]
        bdia: String,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = if args.debug { Level::DEBUG } else { Level::WARN };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Normalize {
            images,
            meta,
            out,
            start,
        } => {
            let report = normalize(&NormalizeOptions {
                images_dir: images,
                meta_dir: meta,
                out_dir: out.clone(),
                start,
            })?;

            println!("OK: wrote {} PNGs to {}", report.written, out.display());
            if !report.missing_metadata.is_empty() {
                let shown: Vec<u64> = report
                    .missing_metadata
                    .iter()
                    .take(10)
                    .copied()
                    .collect();
                println!(
                    "WARNING: missing JSON for {} items (first 10): {:?}",
                    report.missing_metadata.len(),
                    shown
                );
            }
            Ok(())
        }

        Command::Split {
            src,
            out,
            lgen,
            bgen,
            ldia,
            bdia,
        } => {
            // Tiers run sequentially; the first failure stops the run but
            // leaves earlier completed tiers in place.
            for tier in default_plan(&lgen, &bgen, &ldia, &bdia) {
                let report = copy_tier(
                    &src.join(&tier.folder),
                    &out.join(&tier.out_subdir),
                    tier.count,
                )?;
                println!(
                    "OK: {} -> {} ({})",
                    tier.folder,
                    report.out_dir.display(),
                    report.copied
                );
            }
            Ok(())
        }
    }
}
