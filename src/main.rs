//! psd2spine - Creates images and JSON from a PSD for import into Spine.
//!
//! Walks the PSD's layer tree, exports `.png` layers as image files, and
//! writes a Spine skeleton JSON describing slots, skins, and attachments.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

/// Creates images and JSON from a PSD for import into Spine.
#[derive(Parser)]
#[command(name = "psd2spine")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The PSD file to process
    filename: PathBuf,

    /// The output folder for images and JSON (default: current directory)
    output_folder: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let out_dir = match &cli.output_folder {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to resolve current directory")?,
    };

    let document = psd2spine::load(&cli.filename)
        .with_context(|| format!("Failed to load {}", cli.filename.display()))?;

    println!(
        "{} {} ({}x{})",
        "Processing:".cyan().bold(),
        cli.filename.display(),
        document.width,
        document.height,
    );

    let summary = psd2spine::export(&document, &out_dir)
        .with_context(|| format!("Export failed for {}", cli.filename.display()))?;

    for name in &summary.hidden_layers {
        println!(
            "{} layer '{}' is not visible but was exported anyway",
            "warning:".yellow().bold(),
            name,
        );
    }
    for name in &summary.empty_layers {
        println!(
            "{} layer '{}' has no pixels, image not written",
            "warning:".yellow().bold(),
            name,
        );
    }

    for name in &summary.images_written {
        println!("  {} {}", "wrote".green(), name);
    }

    println!(
        "{} {} ({} slots, {} skins, {} attachments)",
        "Exported".green().bold(),
        summary.json_path.display(),
        summary.slot_count,
        summary.skin_count,
        summary.attachment_count,
    );

    Ok(())
}
