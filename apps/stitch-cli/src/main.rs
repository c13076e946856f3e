//! Stitch CLI
//!
//! Loads a point cloud, runs an automated grid scan and writes the collected
//! curves.

mod run;

use std::path::PathBuf;

use clap::{ArgGroup, Parser};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "stitch",
    about = "Isolate grid points by zooming and stitch them into per-row curves",
    group(ArgGroup::new("input").required(true).args(["x_file", "csv"]))
)]
pub struct Cli {
    /// Measurement report holding the X column
    #[arg(long, requires = "y_file")]
    pub x_file: Option<PathBuf>,

    /// Measurement report holding the Y column
    #[arg(long, requires = "x_file")]
    pub y_file: Option<PathBuf>,

    /// CSV or TSV file with x and y columns
    #[arg(long, conflicts_with_all = ["x_file", "y_file"])]
    pub csv: Option<PathBuf>,

    /// TOML settings file with [scan] and [viewport] sections
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of rows to scan (curves to collect)
    #[arg(long)]
    pub rows: Option<usize>,

    /// Number of cells per row
    #[arg(long)]
    pub columns: Option<usize>,

    /// Infer rows and columns from the point cloud
    #[arg(long, conflicts_with_all = ["rows", "columns"])]
    pub infer_grid: bool,

    /// Tick as fast as possible instead of pacing by tick_interval_ms
    #[arg(long)]
    pub headless: bool,

    /// Write curves as JSON
    #[arg(long)]
    pub output_json: Option<PathBuf>,

    /// Write curves as CSV
    #[arg(long)]
    pub output_csv: Option<PathBuf>,

    /// Template map whose header is copied into the exported map
    #[arg(long, requires = "map_output")]
    pub map_template: Option<PathBuf>,

    /// X offset written into the map header
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub x_offset: String,

    /// Y offset written into the map header
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub y_offset: String,

    /// Write a .2dxymap of the collected grid
    #[arg(long)]
    pub map_output: Option<PathBuf>,

    /// Log per-cell decisions
    #[arg(short, long)]
    pub verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let summary = run::run(&cli).await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
