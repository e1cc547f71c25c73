//! CLI application for invoice OCR processing.

mod commands;

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use invoice_ocr_core::models::AppConfig;

use commands::{auth, batch, config, extract, parse};

/// Invoice OCR - Extract structured data from invoice scans
#[derive(Parser)]
#[command(name = "invoice-ocr")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract invoice data from a single PDF or image
    Extract(extract::ExtractArgs),

    /// Extract invoice data from an OCR transcript
    Parse(parse::ParseArgs),

    /// Process multiple invoice files
    Batch(batch::BatchArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// Check admin credentials and auth cookies
    Auth(auth::AuthArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let env_file = dotenvy::dotenv().ok();
    let (app_config, config_path) = config::load(cli.config.as_deref())?;
    init_logging(&app_config, cli.verbose)?;

    if let Some(path) = env_file {
        debug!("Loaded environment from {}", path.display());
    }

    match cli.command {
        Commands::Extract(args) => extract::run(args, &app_config).await,
        Commands::Parse(args) => parse::run(args).await,
        Commands::Batch(args) => batch::run(args, &app_config).await,
        Commands::Config(args) => config::run(args, &app_config, &config_path).await,
        Commands::Auth(args) => auth::run(args, &app_config).await,
    }
}

/// Console logging on stderr, plus an optional plain-text log file.
fn init_logging(config: &AppConfig, verbose: u8) -> anyhow::Result<()> {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.logging.level))
            .unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let file_layer = match &config.logging.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(())
}
