//! Batch command - extract fields from multiple documents.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use padex_core::{
    DisabledBackend, DocumentExtractor, ExtractionResult, OpenAiBackend, PadexConfig,
    PdftoppmRasterizer, VisionBackend,
};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory for per-file JSON results
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Skip the vision fallback and use only text extraction
    #[arg(long)]
    text_only: bool,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue when a file cannot be read
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    extraction: Option<ExtractionResult>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            super::mime_for_extension(&ext.to_lowercase()).is_some()
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());
    for path in files {
        let file_start = Instant::now();
        let outcome = process_single_file(&path, &args, &config).await;
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match outcome {
            Ok(extraction) => results.push(FileResult {
                path,
                extraction: Some(extraction),
                error: None,
                processing_time_ms,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(FileResult {
                        path,
                        extraction: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    pb.abandon();
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    // Write per-file outputs
    if let Some(ref output_dir) = args.output_dir {
        for result in &results {
            if let Some(extraction) = &result.extraction {
                let output_name = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("document");
                let output_path = output_dir.join(format!("{}.json", output_name));
                fs::write(&output_path, serde_json::to_string_pretty(extraction)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));
        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let recovered = results
        .iter()
        .filter(|r| r.extraction.as_ref().is_some_and(|e| e.success))
        .count();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} with fields recovered, {} unreadable",
        style(recovered).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Unreadable files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

async fn process_single_file(
    path: &PathBuf,
    args: &BatchArgs,
    config: &PadexConfig,
) -> anyhow::Result<ExtractionResult> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    let Some(mime) = super::mime_for_extension(&extension) else {
        anyhow::bail!("Unsupported file format: {}", extension);
    };

    let data = fs::read(path)?;

    if args.text_only {
        return Ok(run_pipeline(config, DisabledBackend, &data, mime).await);
    }

    match OpenAiBackend::from_env(config.vision.clone()) {
        Ok(backend) => Ok(run_pipeline(config, backend, &data, mime).await),
        Err(e) => {
            debug!("No vision credential ({}), running text-only", e);
            Ok(run_pipeline(config, DisabledBackend, &data, mime).await)
        }
    }
}

async fn run_pipeline<V: VisionBackend>(
    config: &PadexConfig,
    vision: V,
    data: &[u8],
    mime: &str,
) -> ExtractionResult {
    let rasterizer = PdftoppmRasterizer::new(config.raster.clone());
    DocumentExtractor::new(rasterizer, vision)
        .with_config(config.extraction.clone())
        .extract_from_document(data, mime)
        .await
}

fn write_summary(path: &PathBuf, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "method",
        "confidence",
        "surname",
        "given_names",
        "passport_number",
        "nationality",
        "date_of_birth",
        "date_of_issue",
        "date_of_expiry",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(extraction) = &result.extraction {
            wtr.write_record([
                filename,
                if extraction.success { "success" } else { "empty" },
                &extraction.extraction_method,
                &format!("{:.2}", extraction.confidence),
                &extraction.fields.surname,
                &extraction.fields.given_names,
                &extraction.fields.passport_number,
                &extraction.fields.nationality,
                &extraction.fields.date_of_birth,
                &extraction.fields.date_of_issue,
                &extraction.fields.date_of_expiry,
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
