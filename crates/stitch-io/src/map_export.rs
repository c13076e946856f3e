//! `.2dxymap` export
//!
//! A map file pairs the nominal grid with what was measured on it. It
//! starts with a short header taken from a template map (with the X and Y
//! offsets substituted) followed by a plain, right-aligned table:
//!
//! ```text
//! X Nominal  Y Nominal  X Measured  Y Measured  X Error  Y Error  X meas raw  Y meas raw
//! ```
//!
//! The column titles size the table but are not written themselves.

use crate::reader::{IoError, IoResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Column titles, in output order
pub const MAP_COLUMNS: [&str; 8] = [
    "X Nominal",
    "Y Nominal",
    "X Measured",
    "Y Measured",
    "X Error",
    "Y Error",
    "X meas raw",
    "Y meas raw",
];

/// Template lines at least this long (newline included) are dropped
const HEADER_LINE_LIMIT: usize = 10;

/// Template line replaced by the X offset
const X_OFFSET_LINE: usize = 3;

/// Template line replaced by the Y offset
const Y_OFFSET_LINE: usize = 4;

/// Shape and pitch of the nominal grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapLayout {
    /// Points per row
    pub columns: usize,
    /// Number of rows
    pub rows: usize,
    /// Nominal step between columns
    pub x_pitch: f64,
    /// Nominal step between rows
    pub y_pitch: f64,
}

impl Default for MapLayout {
    fn default() -> Self {
        Self {
            columns: 7,
            rows: 4,
            x_pitch: -50.0,
            y_pitch: -40.0,
        }
    }
}

impl MapLayout {
    /// Create a layout with the default pitches
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            ..Default::default()
        }
    }

    /// Total number of grid points
    pub fn len(&self) -> usize {
        self.columns * self.rows
    }

    /// Whether the layout holds no points
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Nominal X for every point, row-major
    pub fn nominal_x(&self) -> Vec<f64> {
        let row = pitch_steps(self.x_pitch, self.columns);
        (0..self.rows).flat_map(|_| row.iter().copied()).collect()
    }

    /// Nominal Y for every point, row-major
    pub fn nominal_y(&self) -> Vec<f64> {
        pitch_steps(self.y_pitch, self.rows)
            .into_iter()
            .flat_map(|y| std::iter::repeat(y).take(self.columns))
            .collect()
    }
}

/// `count` values starting at `0.0`, each one `pitch` past the previous
///
/// Accumulating from a literal zero keeps the first value `+0.0`, which
/// `0 * pitch` would turn into `-0.0` for a negative pitch.
fn pitch_steps(pitch: f64, count: usize) -> Vec<f64> {
    std::iter::successors(Some(0.0), |value| Some(value + pitch))
        .take(count)
        .collect()
}

/// Express raw readings relative to the first one (`first - value`)
pub fn relative_to_first(raw: &[f64]) -> Vec<f64> {
    match raw.first() {
        Some(&control) => raw.iter().map(|v| control - v).collect(),
        None => Vec::new(),
    }
}

/// One line of the map table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapRow {
    pub x_nominal: f64,
    pub y_nominal: f64,
    pub x_measured: f64,
    pub y_measured: f64,
    pub x_error: f64,
    pub y_error: f64,
    pub x_raw: f64,
    pub y_raw: f64,
}

impl MapRow {
    fn values(&self) -> [f64; 8] {
        [
            self.x_nominal,
            self.y_nominal,
            self.x_measured,
            self.y_measured,
            self.x_error,
            self.y_error,
            self.x_raw,
            self.y_raw,
        ]
    }
}

/// Nominal against measured table for a whole grid
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapTable {
    pub rows: Vec<MapRow>,
}

impl MapTable {
    /// Compute the table from raw X/Y readings in row-major grid order
    pub fn compute(layout: &MapLayout, x_raw: &[f64], y_raw: &[f64]) -> IoResult<Self> {
        if x_raw.len() != y_raw.len() {
            return Err(IoError::LengthMismatch {
                left: x_raw.len(),
                right: y_raw.len(),
            });
        }
        if x_raw.len() != layout.len() {
            return Err(IoError::LengthMismatch {
                left: x_raw.len(),
                right: layout.len(),
            });
        }

        let x_measured = relative_to_first(x_raw);
        let y_measured = relative_to_first(y_raw);

        let rows = layout
            .nominal_x()
            .into_iter()
            .zip(layout.nominal_y())
            .enumerate()
            .map(|(i, (x_nominal, y_nominal))| MapRow {
                x_nominal,
                y_nominal,
                x_measured: x_measured[i],
                y_measured: y_measured[i],
                x_error: x_measured[i] - x_nominal,
                y_error: y_measured[i] - y_nominal,
                x_raw: x_raw[i],
                y_raw: y_raw[i],
            })
            .collect();

        Ok(Self { rows })
    }

    /// Render the table body: three decimals, right-aligned, two-space gaps
    pub fn format_body(&self) -> String {
        let cells: Vec<[String; 8]> = self
            .rows
            .iter()
            .map(|row| row.values().map(|v| format!("{:.3}", v)))
            .collect();

        let mut widths = MAP_COLUMNS.map(str::len);
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }

        cells
            .iter()
            .map(|row| {
                row.iter()
                    .zip(widths)
                    .map(|(cell, width)| format!("{:>width$}", cell, width = width))
                    .collect::<Vec<_>>()
                    .join("  ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Build a map header from template text
///
/// Keeps only short lines (newline included in the length) and swaps the
/// offset lines for the supplied values. Line positions count every template
/// line, kept or not.
pub fn parse_map_header(template: &str, x_offset: &str, y_offset: &str) -> Vec<String> {
    template
        .split_inclusive('\n')
        .enumerate()
        .filter(|(_, line)| line.len() < HEADER_LINE_LIMIT)
        .map(|(index, line)| match index {
            X_OFFSET_LINE => format!("{}\n", x_offset),
            Y_OFFSET_LINE => format!("{}\n", y_offset),
            _ => line.to_string(),
        })
        .collect()
}

/// Read a template map file and build its header
pub fn read_map_header(
    path: impl AsRef<Path>,
    x_offset: &str,
    y_offset: &str,
) -> IoResult<Vec<String>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(IoError::FileNotFound(path.display().to_string()));
    }
    let template = fs::read_to_string(path).map_err(|e| IoError::OpenFailed(e.to_string()))?;
    Ok(parse_map_header(&template, x_offset, y_offset))
}

/// Render a full map document
pub fn render_map(header: &[String], table: &MapTable) -> String {
    let mut out = header.concat();
    out.push_str(&table.format_body());
    out
}

/// Write a map document to disk
pub fn write_map(path: impl AsRef<Path>, header: &[String], table: &MapTable) -> IoResult<()> {
    fs::write(path, render_map(header, table))?;
    Ok(())
}
