//! Parse command - run field extraction on an existing OCR transcript.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use console::style;

use invoice_ocr_core::invoice::{InvoiceParser, RegexInvoiceParser};

use super::output::{render, OutputFormat};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Transcript file, or "-" for stdin
    #[arg(required = true)]
    input: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Report missing essential fields
    #[arg(long)]
    validate: bool,
}

pub async fn run(args: ParseArgs) -> anyhow::Result<()> {
    let (source, text) = if args.input == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        ("stdin".to_string(), text)
    } else {
        let path = PathBuf::from(&args.input);
        let text = fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| args.input.clone());
        (source, text)
    };

    let result = RegexInvoiceParser::new().parse(&text);

    if args.validate && !result.warnings.is_empty() {
        eprintln!("{}", style("Validation issues:").yellow());
        for warning in &result.warnings {
            eprintln!("  - {}", warning);
        }
    }

    println!("{}", render(&source, &result.record, args.format)?);

    Ok(())
}
