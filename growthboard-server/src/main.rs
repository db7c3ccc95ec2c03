//! Growthboard - Main Entry Point

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::Path;
use tracing::info;

use growthboard_common::init_logging;
use growthboard_config::ConfigLoader;
use growthboard_data::GrowthWorkbookWriter;
use growthboard_server::{render_images, start_report_server, AppState};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    /// Log level override
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the interactive report service
    Serve,

    /// Render chart PNGs into the image directory and exit
    Render {
        /// Output directory override
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Write the growth workbook as an xlsx file and exit
    Export {
        /// Output file path
        #[arg(short, long, default_value = "growth_report.xlsx")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    init_logging((&config.logging).into())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    info!("Starting growthboard");
    info!("Configuration loaded successfully");

    // Ingest every dataset up front; both commands work from the same table
    let table = growthboard_server::load_growth_table(&config)?;
    info!(
        records = table.len(),
        cohorts = table.cohorts().len(),
        skipped = table.skipped_rows,
        "growth table ready"
    );

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let bind_address = format!("{}:{}", config.report.host, config.report.port);
            let state = AppState::new(config, table);
            start_report_server(state, &bind_address).await?;
        }
        Command::Render { output } => {
            let directory = output.unwrap_or_else(|| config.images.directory.clone());
            let written = render_images(&config, &table, Path::new(&directory))?;
            for path in &written {
                info!(path = %path.display(), "wrote chart");
            }
        }
        Command::Export { output } => {
            let sorted = table.sorted_desc();
            GrowthWorkbookWriter::default().render_to_file(&sorted, Path::new(&output))?;
        }
    }

    info!("Growthboard has shut down");
    Ok(())
}
