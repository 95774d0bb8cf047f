//! Supply Chain Risk CLI
//!
//! Command-line interface for predicting supply chain risk from historical
//! shipment data and news headlines.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use supply_chain_risk::data::{DataLoader, DataSummary, RecordProcessor};
use supply_chain_risk::risk::RiskPredictor;
use supply_chain_risk::utils::{load_config, Config};

#[derive(Parser)]
#[command(name = "supply-risk")]
#[command(about = "LLM-assisted supply chain risk prediction")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a risk prediction over historical data and news headlines
    Predict {
        /// Historical shipment CSV (overrides the configured path)
        #[arg(short, long)]
        data: Option<String>,

        /// File of news headlines, one per line (defaults to built-in mock news)
        #[arg(short = 'n', long)]
        headlines: Option<String>,
    },

    /// Summarize the historical shipment dataset
    Summary {
        /// Historical shipment CSV (overrides the configured path)
        #[arg(short, long)]
        data: Option<String>,
    },

    /// Generate a sample configuration file
    Config {
        /// Output path
        #[arg(short, long, default_value = "config.toml")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .init();
    }

    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Predict { data, headlines } => {
            run_prediction(&config, data.as_deref(), headlines.as_deref()).await?;
        }
        Commands::Summary { data } => {
            print_summary(&config, data.as_deref())?;
        }
        Commands::Config { output } => {
            generate_config(&output)?;
        }
    }

    Ok(())
}

async fn run_prediction(
    config: &Config,
    data_path: Option<&str>,
    headlines_path: Option<&str>,
) -> Result<()> {
    // Missing credentials fail here, before any data is touched.
    let predictor = RiskPredictor::from_config(config)?;

    let csv_path = data_path.unwrap_or(&config.data.csv_path);
    let loader = DataLoader::new(csv_path);

    info!("Loading historical data...");
    let raw = loader.load_historical()?;
    if raw.is_empty() {
        println!("No historical data available in {csv_path}.");
        return Ok(());
    }

    info!("Processing historical data...");
    let records = RecordProcessor::new()
        .process(&raw)
        .context("Failed to process historical data")?;

    info!("Loading news headlines...");
    let headlines = match headlines_path.or(config.data.headlines_file.as_deref()) {
        Some(path) => DataLoader::load_headlines(path)?,
        None => loader.mock_news(),
    };

    info!("Generating risk prediction...");
    let report = predictor.predict(&records, &headlines).await?;

    println!("\n{report}");
    Ok(())
}

fn print_summary(config: &Config, data_path: Option<&str>) -> Result<()> {
    let csv_path = data_path.unwrap_or(&config.data.csv_path);
    let loader = DataLoader::new(csv_path);

    let raw = loader.load_historical()?;
    let records = RecordProcessor::new()
        .process(&raw)
        .context("Failed to process historical data")?;

    match DataSummary::from_records(&records) {
        Some(summary) => println!("\n{summary}"),
        None => println!("No historical data available in {csv_path}."),
    }

    Ok(())
}

fn generate_config(output: &str) -> Result<()> {
    Config::create_sample_config(output)?;

    println!("Sample configuration saved to {output}");
    println!("\nEdit the file to configure:");
    println!("  - LLM endpoint, model, and API key (or set AI71_API_KEY)");
    println!("  - Request timeout, retries, and news concurrency");
    println!("  - Data paths (shipment CSV, optional headlines file)");

    Ok(())
}
