//! Resource index inspector.
//!
//! Loads a layout file, scans a directory of model images into a resource
//! index and answers availability questions as JSON on stdout.

mod layout;
mod output;
mod pattern;
mod scan;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use layout::{load_layout, Layout};
use output::Selector;
use scan::scan_directory;

#[derive(Parser, Debug)]
#[command(name = "index-inspector")]
#[command(about = "Inspect which weather-model images are available")]
struct Args {
    /// Layout file path
    #[arg(short, long, env = "INSPECTOR_LAYOUT", default_value = "layout.yaml")]
    layout: PathBuf,

    /// Directory holding the images
    #[arg(short, long, env = "INSPECTOR_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,

    /// Log level
    #[arg(long, env = "INSPECTOR_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Write logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Collections with their stored resources and available variables
    Summary,
    /// Available variables of one collection
    Available {
        collection: String,
        /// Only count resources defined by COLLECTION=ID (repeatable)
        #[arg(long = "with")]
        with: Vec<Selector>,
    },
    /// Valid times of resources defined by COLLECTION=ID selectors
    Times {
        selectors: Vec<Selector>,
        /// Require one selector per time-collecting axis and include all
        /// resources below the matched node
        #[arg(long)]
        no_bubble: bool,
    },
    /// Top-most node holding all COLLECTION=ID selectors
    Node { selectors: Vec<Selector> },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);
    if args.json_logs {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    let config = load_layout(&args.layout)?;
    let (layout, mut index) = Layout::build(&config)?;
    info!(
        layout = %args.layout.display(),
        collections = config.collections.len(),
        "Loaded layout"
    );

    let scanned = scan_directory(&args.data_dir, &layout, &index)?;
    let skipped = scanned.skipped;
    let batch = index.append(scanned.resources);
    info!(
        data_dir = %args.data_dir.display(),
        indexed = batch.applied_count(),
        rejected = batch.rejected_count(),
        skipped,
        "Indexed data directory"
    );

    let answer = match &args.command {
        Command::Summary => serde_json::to_value(output::summary(&index))?,
        Command::Available { collection, with } => {
            serde_json::to_value(output::available(&index, &layout, collection, with)?)?
        }
        Command::Times {
            selectors,
            no_bubble,
        } => serde_json::to_value(output::times(&index, &layout, selectors, *no_bubble)?)?,
        Command::Node { selectors } => {
            serde_json::to_value(output::node(&index, &layout, selectors)?)?
        }
    };
    println!("{}", serde_json::to_string_pretty(&answer)?);

    Ok(())
}
