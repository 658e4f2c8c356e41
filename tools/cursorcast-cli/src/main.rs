//! Cursorcast CLI: build template libraries, predict, evaluate, and record.
//!
//! Usage:
//!   cursorcast build-templates <TRACES> -o <LIBRARY>   Build a template library
//!   cursorcast predict <LIBRARY> <TRACE>               Predict where a trace is heading
//!   cursorcast evaluate <LIBRARY> <TRACES>             Measure prediction error
//!   cursorcast info <LIBRARY>                          Show library information
//!   cursorcast record <OUTPUT>                         Log pointer events
//!   cursorcast live                                    Predict from the live pointer

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cursorcast_common::config::{AppConfig, LoggingConfig};

mod commands;

#[derive(Parser)]
#[command(
    name = "cursorcast",
    about = "Template-matching pointer motion prediction",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Resampling interval in milliseconds
    #[arg(long, global = true)]
    sample_interval: Option<u32>,

    /// Pause (ms) that starts a new stroke
    #[arg(long, global = true)]
    pause_threshold: Option<u32>,

    /// Number of templates averaged per prediction
    #[arg(short, global = true)]
    k: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a template library from raw traces
    BuildTemplates {
        /// JSON array of raw traces ([[x, y, t], ...])
        input: PathBuf,

        /// Output library path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Predict where a trace is heading
    Predict {
        /// Template library
        library: PathBuf,

        /// Raw trace ([[x, y, t], ...])
        trace: PathBuf,

        /// Horizon in milliseconds; 0 predicts the resting point
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        delta_ms: i64,

        /// Constrain motion to a direction, as "X,Y"
        #[arg(long)]
        constraint: Option<String>,
    },

    /// Replay traces against a library and report prediction error
    Evaluate {
        /// Template library
        library: PathBuf,

        /// JSON array of raw traces
        traces: PathBuf,

        /// Horizon in milliseconds; 0 evaluates resting-point prediction
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        delta_ms: i64,
    },

    /// Show template library information
    Info {
        /// Template library
        library: PathBuf,
    },

    /// Log events from the configured pointer source
    Record {
        /// Output JSONL path
        output: PathBuf,

        /// Stop after this many seconds instead of waiting for Ctrl+C
        #[arg(long)]
        duration_secs: Option<u64>,
    },

    /// Predict continuously from the configured pointer source
    Live {
        /// Template library (overrides the configured one)
        #[arg(long)]
        library: Option<PathBuf>,

        /// Horizon in milliseconds; 0 predicts the resting point
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        delta_ms: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    if let Some(interval) = cli.sample_interval {
        config.predictor.sample_interval_ms = interval;
    }
    if let Some(pause) = cli.pause_threshold {
        config.predictor.pause_threshold_ms = pause;
    }
    if let Some(k) = cli.k {
        config.predictor.k = k;
    }

    // Initialize logging
    let log_level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    cursorcast_common::logging::init_logging(&LoggingConfig {
        level: log_level,
        json: config.logging.json,
    });

    config.predictor.validate()?;

    match cli.command {
        Commands::BuildTemplates { input, output } => {
            commands::build_templates::run(&config.predictor, input, output)
        }
        Commands::Predict {
            library,
            trace,
            delta_ms,
            constraint,
        } => commands::predict::run(&config.predictor, library, trace, delta_ms, constraint),
        Commands::Evaluate {
            library,
            traces,
            delta_ms,
        } => commands::evaluate::run(&config.predictor, library, traces, delta_ms),
        Commands::Info { library } => commands::info::run(library),
        Commands::Record {
            output,
            duration_secs,
        } => commands::record::run(&config.source, output, duration_secs).await,
        Commands::Live { library, delta_ms } => {
            if let Some(library) = library {
                config.predictor.template_source = library;
            }
            commands::live::run(config, delta_ms).await
        }
    }
}
