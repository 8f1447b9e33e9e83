//! Extract command - read passport fields from a single document.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use padex_core::{
    DisabledBackend, DocumentExtractor, ExtractionResult, OpenAiBackend, PadexConfig,
    PdftoppmRasterizer, VisionBackend,
};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (PDF or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Skip the vision fallback and use only text extraction
    #[arg(long)]
    text_only: bool,

    /// Show the confidence score after extraction
    #[arg(long)]
    show_confidence: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let extension = args
        .input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    let Some(mime) = super::mime_for_extension(&extension) else {
        anyhow::bail!("Unsupported file format: {}", extension);
    };

    info!("Processing file: {}", args.input.display());
    let data = fs::read(&args.input)?;

    let result = if args.text_only {
        run_pipeline(&config, DisabledBackend, &data, mime).await
    } else {
        match OpenAiBackend::from_env(config.vision.clone()) {
            Ok(backend) => run_pipeline(&config, backend, &data, mime).await,
            Err(e) => {
                eprintln!(
                    "{} No vision credential ({}); continuing text-only",
                    style("!").yellow(),
                    e
                );
                run_pipeline(&config, DisabledBackend, &data, mime).await
            }
        }
    };

    let output = format_result(&result, args.format)?;
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_confidence {
        println!();
        println!(
            "{} Extraction confidence: {:.0}% ({})",
            style("ℹ").blue(),
            result.confidence * 100.0,
            result.extraction_method
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
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

pub fn format_result(result: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Text => Ok(format_result_text(result)),
    }
}

fn format_result_text(result: &ExtractionResult) -> String {
    let mut output = String::new();

    let field = |value: &str| {
        if value.is_empty() {
            "(not recovered)".to_string()
        } else {
            value.to_string()
        }
    };

    output.push_str(&format!(
        "Extraction: {}\n",
        if result.success { "ok" } else { "failed" }
    ));
    output.push_str(&format!("Method: {}\n\n", result.extraction_method));
    output.push_str(&format!("Surname:         {}\n", field(&result.fields.surname)));
    output.push_str(&format!("Given names:     {}\n", field(&result.fields.given_names)));
    output.push_str(&format!("Passport number: {}\n", field(&result.fields.passport_number)));
    output.push_str(&format!("Nationality:     {}\n", field(&result.fields.nationality)));
    output.push_str(&format!("Date of birth:   {}\n", field(&result.fields.date_of_birth)));
    output.push_str(&format!("Date of issue:   {}\n", field(&result.fields.date_of_issue)));
    output.push_str(&format!("Date of expiry:  {}\n", field(&result.fields.date_of_expiry)));

    output
}
