//! Curve export
//!
//! Supports exporting collected curves to:
//! - 2dxymap: nominal against measured map, via `stitch_io::map_export`
//! - JSON: curves with export metadata
//! - CSV: one row per point with curve and point indices
//!
//! Every format reads the store in row-major order: curves in the order they
//! were completed, points in the order the curve holds them.

use crate::curves::CurveStore;
use crate::error::{ExportError, ExportResult};
use crate::types::Point;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use stitch_io::{IoError, MapLayout, MapTable};

/// Flatten curves into raw X and Y columns, row-major
pub fn raw_columns(store: &CurveStore) -> (Vec<f64>, Vec<f64>) {
    store.all().iter().flat_map(|c| c.iter()).map(|p| (p.x, p.y)).unzip()
}

/// Build the map table for `layout` from the collected curves
pub fn map_table(store: &CurveStore, layout: &MapLayout) -> ExportResult<MapTable> {
    if store.point_count() == 0 {
        return Err(ExportError::NoCurves);
    }
    if store.point_count() != layout.len() {
        return Err(ExportError::LayoutMismatch {
            points: store.point_count(),
            expected: layout.len(),
        });
    }
    let (xs, ys) = raw_columns(store);
    Ok(MapTable::compute(layout, &xs, &ys)?)
}

/// Write a `.2dxymap` file with the given header lines
pub fn export_map(
    store: &CurveStore,
    layout: &MapLayout,
    header: &[String],
    path: impl AsRef<Path>,
) -> ExportResult<()> {
    let table = map_table(store, layout)?;
    stitch_io::write_map(path.as_ref(), header, &table)?;
    tracing::info!(
        path = %path.as_ref().display(),
        rows = table.rows.len(),
        "Map exported"
    );
    Ok(())
}

/// Metadata attached to exported curves
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// Creation timestamp (RFC 3339)
    pub created_at: String,

    /// Source session ID
    pub session_id: Option<String>,

    /// Total number of exported points
    pub point_count: usize,

    /// Software version
    pub software_version: String,
}

impl ExportMetadata {
    pub fn new(session_id: Option<String>, point_count: usize) -> Self {
        Self {
            created_at: chrono::Utc::now().to_rfc3339(),
            session_id,
            point_count,
            software_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// JSON document for exported curves
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveDocument {
    pub metadata: ExportMetadata,
    pub curves: Vec<Vec<Point>>,
}

impl CurveDocument {
    pub fn new(store: &CurveStore, session_id: Option<String>) -> Self {
        Self {
            metadata: ExportMetadata::new(session_id, store.point_count()),
            curves: store.all().iter().map(|c| c.points().to_vec()).collect(),
        }
    }
}

/// Serialize curves to pretty JSON
pub fn curves_to_json(store: &CurveStore, session_id: Option<&str>) -> ExportResult<String> {
    let document = CurveDocument::new(store, session_id.map(str::to_string));
    serde_json::to_string_pretty(&document).map_err(|e| ExportError::Serialization {
        message: e.to_string(),
    })
}

/// One CSV record
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurvePointRecord {
    pub curve: usize,
    pub point: usize,
    pub x: f64,
    pub y: f64,
}

/// Records for every point in the store
pub fn curve_records(store: &CurveStore) -> Vec<CurvePointRecord> {
    store
        .all()
        .iter()
        .enumerate()
        .flat_map(|(curve, c)| {
            c.iter().enumerate().map(move |(point, p)| CurvePointRecord {
                curve,
                point,
                x: p.x,
                y: p.y,
            })
        })
        .collect()
}

/// Serialize curves to CSV with a `curve,point,x,y` header
pub fn curves_to_csv(store: &CurveStore) -> ExportResult<String> {
    let serialization = |message: String| ExportError::Serialization { message };

    let mut writer = csv::Writer::from_writer(Vec::new());
    if store.point_count() == 0 {
        writer
            .write_record(["curve", "point", "x", "y"])
            .map_err(|e| serialization(e.to_string()))?;
    }
    for record in curve_records(store) {
        writer
            .serialize(record)
            .map_err(|e| serialization(e.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| serialization(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| serialization(e.to_string()))
}

/// Write JSON export to disk
pub fn write_curves_json(
    store: &CurveStore,
    session_id: Option<&str>,
    path: impl AsRef<Path>,
) -> ExportResult<()> {
    let json = curves_to_json(store, session_id)?;
    fs::write(path, json).map_err(IoError::from)?;
    Ok(())
}

/// Write CSV export to disk
pub fn write_curves_csv(store: &CurveStore, path: impl AsRef<Path>) -> ExportResult<()> {
    let csv = curves_to_csv(store)?;
    fs::write(path, csv).map_err(IoError::from)?;
    Ok(())
}
