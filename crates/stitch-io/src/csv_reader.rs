//! CSV point reader

use crate::reader::{Coordinate, IoError, IoResult, PointReader};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// CSV point table reader
///
/// Expects a header row. The `x` and `y` columns are located by name
/// (case-insensitive); when either is missing the first two columns are used.
pub struct CsvPointReader {
    path: String,
    delimiter: u8,
    x_index: usize,
    y_index: usize,
}

impl CsvPointReader {
    /// Open a CSV file, picking the delimiter from the extension
    pub fn open(path: &str) -> IoResult<Self> {
        let delimiter = if path.to_lowercase().ends_with(".tsv") {
            b'\t'
        } else {
            b','
        };
        Self::open_with_delimiter(path, delimiter)
    }

    /// Open a CSV file with an explicit delimiter
    pub fn open_with_delimiter(path: &str, delimiter: u8) -> IoResult<Self> {
        if !Path::new(path).exists() {
            return Err(IoError::FileNotFound(path.to_string()));
        }

        let mut reader = Self::csv_reader(path, delimiter)?;
        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| IoError::InvalidFormat {
                line: 1,
                message: e.to_string(),
            })?
            .iter()
            .map(|s| s.trim().to_lowercase())
            .collect();

        let (x_index, y_index) = locate_axes(&headers)?;

        Ok(Self {
            path: path.to_string(),
            delimiter,
            x_index,
            y_index,
        })
    }

    fn csv_reader(path: &str, delimiter: u8) -> IoResult<csv::Reader<BufReader<File>>> {
        let file = File::open(path).map_err(|e| IoError::OpenFailed(e.to_string()))?;
        Ok(csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(BufReader::new(file)))
    }
}

impl PointReader for CsvPointReader {
    fn read_points(&self) -> IoResult<Vec<Coordinate>> {
        let mut reader = Self::csv_reader(&self.path, self.delimiter)?;
        let mut points = Vec::new();

        for (i, result) in reader.records().enumerate() {
            // Header occupies line 1.
            let line = i + 2;
            let record = result.map_err(|e| IoError::InvalidFormat {
                line,
                message: e.to_string(),
            })?;

            let x = parse_field(record.get(self.x_index), line)?;
            let y = parse_field(record.get(self.y_index), line)?;
            points.push([x, y]);
        }

        Ok(points)
    }

    fn format_name(&self) -> &'static str {
        "CSV"
    }

    fn paths(&self) -> Vec<&str> {
        vec![self.path.as_str()]
    }
}

/// Locate the x/y columns in a lower-cased header row
fn locate_axes(headers: &[String]) -> IoResult<(usize, usize)> {
    let named_x = headers.iter().position(|h| h == "x");
    let named_y = headers.iter().position(|h| h == "y");

    match (named_x, named_y) {
        (Some(x), Some(y)) => Ok((x, y)),
        _ if headers.len() >= 2 => Ok((0, 1)),
        _ => Err(IoError::ColumnNotFound("y".to_string())),
    }
}

fn parse_field(field: Option<&str>, line: usize) -> IoResult<f64> {
    let raw = field.ok_or_else(|| IoError::InvalidFormat {
        line,
        message: "missing coordinate field".to_string(),
    })?;

    raw.parse::<f64>().map_err(|e| IoError::InvalidFormat {
        line,
        message: format!("'{}': {}", raw, e),
    })
}
