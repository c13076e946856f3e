//! Scan driver
//!
//! Builds a session from the command line, ticks it to completion and writes
//! the requested outputs. Ctrl-C stops the scan; whatever was collected so
//! far is still exported.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use stitch_core::export;
use stitch_core::{
    ExportError, GridShape, PointCloud, RunSummary, ScanConfig, ScanSession, StitchConfig,
    StitchError, StitchResult, DEFAULT_ROW_TOLERANCE,
};
use stitch_io::MapLayout;
use thiserror::Error;
use tokio::time::MissedTickBehavior;

use crate::Cli;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Stitch(#[from] StitchError),

    #[error("Failed to read config {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No input given; pass --csv or --x-file with --y-file")]
    MissingInput,
}

/// Run a scan as described by `cli`
pub async fn run(cli: &Cli) -> Result<RunSummary, CliError> {
    let settings = load_config(cli.config.as_deref())?;
    let viewport = settings.viewport.build().map_err(StitchError::from)?;
    let mut session = load_session(cli, viewport)?;
    let config = resolve_scan_config(cli, settings.scan, session.cloud())?;

    let viewport = session.viewport();
    let max_ticks = config.tick_budget(viewport.zoom_radius(), viewport.min_zoom_radius());
    let interval = config.tick_interval();
    let shape = config.grid_shape();

    tracing::info!(
        session = %session.id,
        points = session.cloud().len(),
        rows = config.target_curve_count,
        columns = config.points_per_row,
        max_ticks,
        "Scan configured"
    );
    session.start_automation(config)?;

    let summary = if cli.headless {
        session.run_to_completion(max_ticks)
    } else {
        run_paced(&mut session, interval, max_ticks).await
    };

    for cell in &summary.warnings {
        tracing::warn!(
            row = cell.row,
            column = cell.column,
            outcome = ?cell.outcome,
            "Unresolved cell"
        );
    }
    tracing::info!(
        state = summary.state.name(),
        ticks = summary.ticks,
        curves = summary.curves,
        "Scan finished"
    );

    write_outputs(cli, &session, shape)?;
    Ok(summary)
}

fn load_config(path: Option<&Path>) -> Result<StitchConfig, CliError> {
    let Some(path) = path else {
        return Ok(StitchConfig::default());
    };
    let text = fs::read_to_string(path).map_err(|source| CliError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;
    let config = StitchConfig::from_toml(&text).map_err(StitchError::from)?;
    config.validate().map_err(StitchError::from)?;
    Ok(config)
}

fn load_session(cli: &Cli, viewport: stitch_core::Viewport) -> Result<ScanSession, CliError> {
    let session = match (&cli.csv, &cli.x_file, &cli.y_file) {
        (Some(csv), _, _) => {
            let cloud = PointCloud::load_file(&csv.to_string_lossy())?;
            ScanSession::new(cloud, viewport)
        }
        (None, Some(x), Some(y)) => {
            ScanSession::load_measurements(&x.to_string_lossy(), &y.to_string_lossy(), viewport)?
        }
        _ => return Err(CliError::MissingInput),
    };
    Ok(session)
}

/// Apply grid overrides from the command line to the file settings
pub fn resolve_scan_config(
    cli: &Cli,
    base: ScanConfig,
    cloud: &PointCloud,
) -> StitchResult<ScanConfig> {
    if cli.infer_grid {
        let shape = GridShape::infer(cloud, DEFAULT_ROW_TOLERANCE)?;
        tracing::info!(rows = shape.rows, columns = shape.columns, "Inferred grid");
        let grid = ScanConfig::for_grid(shape);
        return Ok(ScanConfig {
            points_per_row: grid.points_per_row,
            target_curve_count: grid.target_curve_count,
            check_grid_shape: true,
            ..base
        });
    }

    let mut config = base;
    if let Some(columns) = cli.columns {
        config.points_per_row = columns;
    }
    if let Some(rows) = cli.rows {
        config.target_curve_count = rows;
    }
    Ok(config)
}

/// Tick on a wall-clock interval until the session stops or Ctrl-C arrives
pub async fn run_paced(
    session: &mut ScanSession,
    interval: Duration,
    max_ticks: u64,
) -> RunSummary {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut summary = RunSummary::default();
    while session.is_automating() && summary.ticks < max_ticks {
        tokio::select! {
            _ = ticker.tick() => {
                let report = session.tick();
                summary.ticks += 1;
                if let Some(cell) = report.cell.filter(|c| c.outcome.is_warning()) {
                    summary.warnings.push(cell);
                }
            }
            _ = &mut ctrl_c => {
                tracing::warn!("Interrupted; stopping automation");
                session.stop_automation();
            }
        }
    }

    if session.is_automating() {
        tracing::warn!(max_ticks, "Tick limit reached before the session completed");
        session.stop_automation();
    }
    summary.state = session.state();
    summary.curves = session.curves().len();
    summary
}

/// Write every output requested on the command line
///
/// A map needs a full grid; after an interrupted scan it is skipped with a
/// warning while JSON and CSV still hold the partial curves.
pub fn write_outputs(cli: &Cli, session: &ScanSession, shape: GridShape) -> StitchResult<()> {
    let curves = session.curves();

    if let Some(path) = &cli.output_json {
        export::write_curves_json(curves, Some(session.id.as_str()), path)?;
        tracing::info!(path = %path.display(), "Curves written as JSON");
    }

    if let Some(path) = &cli.output_csv {
        export::write_curves_csv(curves, path)?;
        tracing::info!(path = %path.display(), "Curves written as CSV");
    }

    if let Some(path) = &cli.map_output {
        let header = match &cli.map_template {
            Some(template) => stitch_io::read_map_header(template, &cli.x_offset, &cli.y_offset)?,
            None => Vec::new(),
        };
        let layout = MapLayout::new(shape.columns, shape.rows);
        match export::export_map(curves, &layout, &header, path) {
            Err(ExportError::LayoutMismatch { points, expected }) => {
                tracing::warn!(points, expected, "Grid incomplete; map not written");
            }
            Err(ExportError::NoCurves) => {
                tracing::warn!("No curves collected; map not written");
            }
            result => result?,
        }
    }

    Ok(())
}
