mod config;
mod db;
mod error;
mod models;
mod processor;
mod render;
mod session;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use config::AppConfig;
use models::{FilterCriteria, VehicleSelector};
use processor::forecast::LinearTrendForecaster;
use render::TextReport;
use session::Session;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "coldchain", about = "Cold-chain sensor monitoring", version)]
struct Cli {
    /// Overrides DATABASE_URL
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Log everything down to debug
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a CSV of readings and append it to the store
    Ingest { file: PathBuf },
    /// Show metrics, trends, excursions and the temperature forecast
    Report {
        #[command(flatten)]
        filter: FilterArgs,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the filtered readings to a CSV file
    Export {
        #[command(flatten)]
        filter: FilterArgs,
        /// Defaults to EXPORT_PATH
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the vehicles present in the store
    Vehicles,
}

#[derive(Args)]
struct FilterArgs {
    /// Vehicle id, or "All"
    #[arg(long, default_value = "All")]
    vehicle: VehicleSelector,
    /// First day of the range (YYYY-MM-DD); needs --to
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last day of the range (YYYY-MM-DD); needs --from
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl From<FilterArgs> for FilterCriteria {
    fn from(args: FilterArgs) -> Self {
        FilterCriteria {
            vehicle: args.vehicle,
            start: args.from,
            end: args.to,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config
    let config = AppConfig::load(cli.database_url.clone())?;

    // Init logging
    let log_level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(io::stderr)
        .init();

    info!("Starting Cold Chain Monitor...");

    let session = Session::open(&config.database_url, LinearTrendForecaster).await?;

    match cli.command {
        Command::Ingest { file } => {
            let input = File::open(&file)
                .with_context(|| format!("opening {}", file.display()))?;
            let summary = session.upload(BufReader::new(input)).await?;
            println!(
                "Data uploaded and stored successfully ({} readings, batch {}).",
                summary.stored,
                summary.batch_id
            );
        }
        Command::Report { filter, json } => {
            let report = session.report(&filter.into()).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", TextReport(&report));
            }
        }
        Command::Export { filter, output } => {
            let path = output.unwrap_or_else(|| PathBuf::from(&config.export_path));
            let output = File::create(&path)
                .with_context(|| format!("creating {}", path.display()))?;
            let mut writer = BufWriter::new(output);
            let written = session.export(&filter.into(), &mut writer).await?;
            writer.flush()?;
            println!("Exported {} readings to {}", written, path.display());
        }
        Command::Vehicles => {
            for vehicle in session.vehicles().await? {
                println!("{}", vehicle);
            }
        }
    }

    Ok(())
}
