//! Measurement column reader
//!
//! The measuring machine writes one text report per axis. Fields are
//! separated by runs of two or more whitespace characters; data lines carry
//! more than six fields with the measured value in the second field. Header
//! lines repeat the word `Measured` and are skipped.

use crate::reader::{pair_coordinates, Coordinate, IoError, IoResult, PointReader};
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Minimum number of fields for a line to count as a data line
const MIN_DATA_FIELDS: usize = 7;

/// Token marking a column header line
const HEADER_MARKER: &str = "Measured";

lazy_static! {
    /// Two or more whitespace characters separate report fields
    static ref FIELD_SEPARATOR: Regex = Regex::new(r"\s{2,}").unwrap();
}

/// Parse the measured values out of a report's text
pub fn parse_measurement_column(text: &str) -> IoResult<Vec<f64>> {
    let mut values = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let fields: Vec<&str> = FIELD_SEPARATOR
            .split(line)
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .collect();

        if fields.len() < MIN_DATA_FIELDS || fields.contains(&HEADER_MARKER) {
            continue;
        }

        let value = fields[1]
            .parse::<f64>()
            .map_err(|e| IoError::InvalidFormat {
                line: index + 1,
                message: format!("'{}': {}", fields[1], e),
            })?;
        values.push(value);
    }

    Ok(values)
}

/// Read one measurement report from disk
pub fn read_measurement_column(path: impl AsRef<Path>) -> IoResult<Vec<f64>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(IoError::FileNotFound(path.display().to_string()));
    }

    let text = fs::read_to_string(path).map_err(|e| IoError::OpenFailed(e.to_string()))?;
    parse_measurement_column(&text)
}

/// Reader pairing an X report with a Y report
#[derive(Debug, Clone)]
pub struct MeasurementReader {
    x_path: String,
    y_path: String,
}

impl MeasurementReader {
    /// Create a reader over the two axis reports
    pub fn new(x_path: impl Into<String>, y_path: impl Into<String>) -> Self {
        Self {
            x_path: x_path.into(),
            y_path: y_path.into(),
        }
    }
}

impl PointReader for MeasurementReader {
    fn read_points(&self) -> IoResult<Vec<Coordinate>> {
        let xs = read_measurement_column(&self.x_path)?;
        let ys = read_measurement_column(&self.y_path)?;
        pair_coordinates(&xs, &ys)
    }

    fn format_name(&self) -> &'static str {
        "Measurement TXT"
    }

    fn paths(&self) -> Vec<&str> {
        vec![self.x_path.as_str(), self.y_path.as_str()]
    }
}
