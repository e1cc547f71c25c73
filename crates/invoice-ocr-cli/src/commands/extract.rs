//! Extract command - run OCR and field extraction on a single invoice file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use invoice_ocr_core::models::AppConfig;
use invoice_ocr_core::ocr::OcrEngine;
use invoice_ocr_core::pipeline::InvoiceProcessor;
use invoice_ocr_core::upload::UploadKind;

use super::output::{render, OutputFormat};

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

    /// Report missing essential fields
    #[arg(long)]
    validate: bool,
}

pub async fn run(args: ExtractArgs, config: &AppConfig) -> anyhow::Result<()> {
    let start = Instant::now();

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(format!("Extracting {}...", args.input.display()));

    let processor = InvoiceProcessor::from_config(config);
    let is_image = processor.gate().kind_of(&args.input.to_string_lossy()) == Some(UploadKind::Image);
    if is_image && !processor.engine().is_available() {
        warn!("OCR engine {} is not available", processor.engine().name());
    }

    let input = args.input.clone();
    let result = tokio::task::spawn_blocking(move || processor.process_path(&input)).await?;

    pb.finish_and_clear();
    let response = result?;

    if args.validate {
        let issues = response.extracted_data.validate();
        if !issues.is_empty() {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    let output = render(&response.filename, &response.extracted_data, args.format)?;

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

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
