//! Point reader trait and common types
//!
//! The `PointReader` trait provides a uniform interface for loading
//! coordinate pairs from the different measurement file layouts.

use thiserror::Error;

/// Errors that can occur during I/O operations
#[derive(Debug, Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to open file: {0}")]
    OpenFailed(String),

    #[error("Invalid format at line {line}: {message}")]
    InvalidFormat { line: usize, message: String },

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Length mismatch: {left} values against {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("Unsupported file extension: {0}")]
    UnsupportedExtension(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for IoError {
    fn from(err: std::io::Error) -> Self {
        IoError::Io(err.to_string())
    }
}

/// Result type for I/O operations
pub type IoResult<T> = Result<T, IoError>;

/// A single (x, y) coordinate pair as read from disk
pub type Coordinate = [f64; 2];

/// Trait for reading ordered coordinate pairs from a point source
///
/// Implementations must preserve file order; the scan controller relies on
/// it when grid shapes are inferred from the cloud.
pub trait PointReader: Send + Sync {
    /// Read every coordinate pair in source order
    fn read_points(&self) -> IoResult<Vec<Coordinate>>;

    /// Get the format name
    fn format_name(&self) -> &'static str;

    /// Paths this reader pulls from
    fn paths(&self) -> Vec<&str>;
}

/// A boxed reader for dynamic dispatch
pub type BoxedReader = Box<dyn PointReader>;

/// Open a single-file point source
///
/// The format is auto-detected from the file extension. Measurement column
/// files come in pairs and are opened with `MeasurementReader::new` instead.
pub fn open_points(path: &str) -> IoResult<BoxedReader> {
    let extension = path
        .rsplit('.')
        .next()
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        #[cfg(feature = "csv")]
        "csv" | "tsv" => {
            use crate::csv_reader::CsvPointReader;
            Ok(Box::new(CsvPointReader::open(path)?))
        }

        _ => Err(IoError::UnsupportedExtension(extension)),
    }
}

/// List supported single-file extensions
pub fn supported_extensions() -> Vec<&'static str> {
    let mut extensions = Vec::new();

    #[cfg(feature = "csv")]
    {
        extensions.push("csv");
        extensions.push("tsv");
    }

    extensions
}

/// Pair two coordinate columns by index
///
/// Both columns must have the same length; a ragged pair would silently
/// drop or invent points.
pub fn pair_coordinates(xs: &[f64], ys: &[f64]) -> IoResult<Vec<Coordinate>> {
    if xs.len() != ys.len() {
        return Err(IoError::LengthMismatch {
            left: xs.len(),
            right: ys.len(),
        });
    }

    Ok(xs.iter().zip(ys).map(|(&x, &y)| [x, y]).collect())
}
