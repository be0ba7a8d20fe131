//! Labels command - generate BIO training manifests for a directory of
//! OCR payloads.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use gstx_core::models::config::SpatialConfig;
use gstx_core::{generate_labels, OcrPayload, TrainingManifest};

use super::load_config;

/// Arguments for the labels command.
#[derive(Args)]
pub struct LabelsArgs {
    /// Directory containing OCR JSON payloads
    #[arg(required = true)]
    input_dir: PathBuf,

    /// Output manifest path (default: <input_dir>/training_manifest.json)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: LabelsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    if !args.input_dir.is_dir() {
        anyhow::bail!("Input directory not found: {}", args.input_dir.display());
    }

    let files = collect_payload_files(&args.input_dir)?;
    if files.is_empty() {
        anyhow::bail!(
            "No OCR JSON files found in {}",
            args.input_dir.display()
        );
    }

    info!("Annotating {} OCR payloads", files.len());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    let mut manifests = Vec::new();
    let mut skipped = 0usize;

    for path in &files {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        pb.set_message(name.clone());

        // One bad payload never aborts the batch.
        match annotate_file(path, &name, &config.spatial) {
            Ok(manifest) => manifests.push(manifest),
            Err(e) => {
                warn!("Skipping {}: {e}", path.display());
                skipped += 1;
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let output = args
        .output
        .unwrap_or_else(|| args.input_dir.join("training_manifest.json"));
    fs::write(&output, serde_json::to_string_pretty(&manifests)?)?;

    println!(
        "{} {} invoices annotated, {} skipped",
        style("✓").green(),
        manifests.len(),
        skipped
    );
    println!("  Manifest written to {}", output.display());

    debug!("Total label generation time: {:?}", start.elapsed());

    Ok(())
}

/// OCR payload files in the directory, sorted, excluding any previously
/// written manifest.
fn collect_payload_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let pattern = dir.join("*.json");
    let pattern = pattern
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Non-UTF-8 input path: {}", dir.display()))?;

    let mut files: Vec<PathBuf> = glob::glob(pattern)?
        .filter_map(Result::ok)
        .filter(|p| {
            let name = p.file_name().and_then(|n| n.to_str()).unwrap_or("");
            !name.starts_with("training_manifest")
        })
        .collect();
    files.sort();
    Ok(files)
}

fn annotate_file(
    path: &Path,
    file_name: &str,
    spatial: &SpatialConfig,
) -> anyhow::Result<TrainingManifest> {
    let raw = fs::read_to_string(path)?;
    let payload = OcrPayload::from_json_str(&raw)?;
    Ok(generate_labels(&payload, file_name, spatial)?)
}
