//! favmap - travel favorites map from the command line
//!
//! Fits a headless map to a favorites list the way the favorites page does,
//! and drives the favorites server's nearby, search, check, save and delete
//! endpoints.

use clap::{Parser, Subcommand};
use favmap_cli::{OutputFormat, Status};
use favmap_core::exit_codes;
use favmap_telemetry::{LogFormat, TelemetryConfig};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod console;

use commands::{favorite, fit, nearby, search, spot, Context};

/// Travel favorites map CLI
#[derive(Parser)]
#[command(name = "favmap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Configuration file (searched in standard locations when omitted)
    #[arg(short, long, global = true, env = "FAVMAP_CONFIG")]
    config: Option<String>,

    /// Also write logs to a daily rolling file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit the map to a favorites file and report the resulting view
    Fit {
        /// JSON array of favorites, as embedded in the favorites page
        file: PathBuf,

        /// Include the marker list in the output
        #[arg(short, long)]
        markers: bool,
    },

    /// Show recommendations inside the current map view
    Nearby {
        /// View to query as SOUTH WEST NORTH EAST
        #[arg(long, num_args = 4, value_names = ["SOUTH", "WEST", "NORTH", "EAST"], allow_negative_numbers = true)]
        bounds: Option<Vec<f64>>,

        /// Fit to this favorites file first and query the settled view
        #[arg(long, conflicts_with = "bounds")]
        favorites: Option<PathBuf>,

        /// Print the rendered card HTML
        #[arg(long)]
        html: bool,
    },

    /// Search tourist attractions by keyword
    Search {
        keyword: String,

        /// Print the rendered card HTML
        #[arg(long)]
        html: bool,
    },

    /// Center the map on a filming location
    Spot {
        /// Latitude, as the detail page carries it
        #[arg(long, allow_negative_numbers = true)]
        lat: String,

        /// Longitude
        #[arg(long, allow_negative_numbers = true)]
        lng: String,
    },

    /// Check whether a favorite is already saved
    Check {
        #[command(flatten)]
        key: favorite::KeyArgs,
    },

    /// Save a favorite unless it already exists
    Save {
        #[command(flatten)]
        place: favorite::SaveArgs,
    },

    /// Delete a saved favorite
    Delete {
        #[command(flatten)]
        key: favorite::KeyArgs,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut telemetry = TelemetryConfig::for_verbosity(cli.verbose);
    telemetry.log_dir = cli.log_dir.clone();
    if cli.format.is_json() {
        telemetry.format = LogFormat::Json;
    }
    let _guard = match favmap_telemetry::init_with_config(telemetry) {
        Ok(guard) => Some(guard),
        Err(e) => {
            Status::warning(&format!("Logging disabled: {e}"));
            None
        }
    };

    let ctx = match Context::load(cli.config.as_deref(), cli.format) {
        Ok(ctx) => ctx,
        Err(e) => return report(&e),
    };

    let result = match cli.command {
        Commands::Fit { file, markers } => fit::run(&ctx, &file, markers),
        Commands::Nearby { bounds, favorites, html } => {
            nearby::run(&ctx, bounds.as_deref(), favorites.as_deref(), html).await
        }
        Commands::Search { keyword, html } => search::run(&ctx, &keyword, html).await,
        Commands::Spot { lat, lng } => spot::run(&ctx, &lat, &lng),
        Commands::Check { key } => favorite::check(&ctx, &key).await,
        Commands::Save { place } => favorite::save(&ctx, &place).await,
        Commands::Delete { key } => favorite::delete(&ctx, &key).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}

/// Print an error and pick the exit code for its category
fn report(err: &anyhow::Error) -> ExitCode {
    let code = match err.downcast_ref::<favmap_core::Error>() {
        Some(e) => {
            tracing::debug!(report = ?e.to_report(), "Command failed");
            e.exit_code()
        }
        None => exit_codes::FAILURE,
    };
    Status::error(&format!("{err:#}"));
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
