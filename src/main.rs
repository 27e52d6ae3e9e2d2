//! swapstorm — endpoint-swap stress harness.
//!
//! Two entry scenarios:
//! - `sanity`: install a serving endpoint, issue one request, expect
//!   200 "hello".
//! - `stress`: fire N requests at a closed socket, swap it to a live
//!   server mid-flight, and verify every outcome is either a success or a
//!   tolerated transient failure.
//!
//! Exit code is 0 iff the run verdict passed.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use swapstorm::config::loader::load_config;
use swapstorm::observability::logging;
use swapstorm::run::{run_sanity, run_stress};
use swapstorm::HarnessConfig;

#[derive(Parser)]
#[command(name = "swapstorm")]
#[command(about = "Endpoint-swap stress harness for async HTTP clients", long_about = None)]
struct Cli {
    /// Path to a TOML config file; defaults apply when absent.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit the run report as JSON on stdout.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// One-shot sanity check against a serving endpoint
    Sanity {
        /// Port to serve on; 0 selects an ephemeral port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Stress scenario: N requests across an endpoint swap
    Stress {
        /// Number of requests to fire
        #[arg(long)]
        iterations: Option<usize>,

        /// Port to bind the endpoint on; 0 selects an ephemeral port
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => HarnessConfig::default(),
    };

    logging::init(&config.observability);

    let report = match cli.command {
        Commands::Sanity { port } => {
            if let Some(port) = port {
                config.run.port = port;
            }
            run_sanity(&config).await?
        }
        Commands::Stress { iterations, port } => {
            if let Some(iterations) = iterations {
                config.run.iterations = iterations;
            }
            if let Some(port) = port {
                config.run.port = port;
            }
            run_stress(&config).await?
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if !report.passed {
        std::process::exit(1);
    }
    Ok(())
}
