//! Assess command - document completeness for a case manifest.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;

use padex_core::{apply_override, assess_case, CaseAssessment, CaseStatus, DocumentKind};

/// Arguments for the assess command.
#[derive(Args)]
pub struct AssessArgs {
    /// Case manifest: a JSON array of document kinds
    /// (e.g. ["passport", "birth_certificate"])
    #[arg(required = true)]
    manifest: PathBuf,

    /// Supervisor override reason (requires --override-actor)
    #[arg(long, requires = "override_actor")]
    override_reason: Option<String>,

    /// Supervisor applying the override (requires --override-reason)
    #[arg(long, requires = "override_reason")]
    override_actor: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: AssessFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum AssessFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

pub async fn run(args: AssessArgs) -> anyhow::Result<()> {
    let raw = fs::read_to_string(&args.manifest)?;
    let uploaded: Vec<DocumentKind> = serde_json::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("Invalid case manifest: {}", e))?;

    let mut assessment = assess_case(&uploaded);

    if let (Some(reason), Some(actor)) = (&args.override_reason, &args.override_actor) {
        assessment = apply_override(&assessment, reason, actor);
    }

    match args.format {
        AssessFormat::Json => println!("{}", serde_json::to_string_pretty(&assessment)?),
        AssessFormat::Text => print_assessment(&assessment),
    }

    Ok(())
}

fn print_assessment(assessment: &CaseAssessment) {
    let status = match assessment.status {
        CaseStatus::Green => style("GREEN").green(),
        CaseStatus::Amber => style("AMBER").yellow(),
        CaseStatus::Red => style("RED").red(),
    };

    println!("Status: {}", status);
    println!(
        "Can proceed to submission: {}",
        if assessment.can_proceed {
            style("yes").green()
        } else {
            style("no").red()
        }
    );

    if !assessment.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &assessment.warnings {
            println!("  - {}", warning);
        }
    }
}
