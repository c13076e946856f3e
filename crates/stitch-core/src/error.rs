//! Error types for stitch-core
//!
//! Provides error handling for:
//! - Scan configuration
//! - Grid shape inference
//! - Session control
//! - Curve export
//!
//! Empty or ambiguous isolations are not errors; they are reported through
//! `controller::CellOutcome`.

use stitch_io::IoError;
use thiserror::Error;

/// Main error type for stitch operations
#[derive(Error, Debug)]
pub enum StitchError {
    /// Invalid scan configuration
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Point cloud does not form the expected grid
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    /// Session control errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Export errors
    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    /// Point source errors
    #[error("Point source error: {0}")]
    Io(#[from] IoError),
}

/// Errors related to scan configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A value must be strictly positive
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: String },

    /// A value must be finite
    #[error("{field} must be finite")]
    NotFinite { field: &'static str },

    /// Viewport zoom limits are inconsistent
    #[error("Invalid zoom limits: {message}")]
    ZoomLimits { message: String },

    /// Config text could not be parsed
    #[error("Failed to parse configuration: {message}")]
    Parse { message: String },
}

/// Errors related to the grid shape of a point cloud
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// No points to infer a grid from
    #[error("Point cloud is empty")]
    Empty,

    /// Rows have different lengths
    #[error("Row {row} has {actual} points, expected {expected}")]
    Irregular {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Cloud size does not match the configured grid
    #[error("Point cloud has {points} points, grid of {rows}x{columns} expects {expected}")]
    SizeMismatch {
        points: usize,
        rows: usize,
        columns: usize,
        expected: usize,
    },
}

/// Errors related to session control
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// Manual viewport input while automation owns the viewport
    #[error("Manual input is locked while automation is running")]
    InputLocked,

    /// Automation is already running
    #[error("Automation is already running")]
    AlreadyRunning,

    /// Point cloud is empty
    #[error("Session has no points to scan")]
    EmptyCloud,
}

/// Errors related to exporting curves
#[derive(Error, Debug)]
pub enum ExportError {
    /// Nothing to export
    #[error("No curves to export")]
    NoCurves,

    /// Curves do not fill the map layout
    #[error("Curves hold {points} points, map layout expects {expected}")]
    LayoutMismatch { points: usize, expected: usize },

    /// Serialization failure
    #[error("Serialization failed: {message}")]
    Serialization { message: String },

    /// Writer failure
    #[error("Write failed: {0}")]
    Write(#[from] IoError),
}

/// Result type alias for stitch operations
pub type StitchResult<T> = Result<T, StitchError>;

/// Result type alias for configuration checks
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for grid operations
pub type GridResult<T> = Result<T, GridError>;

/// Result type alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Result type alias for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Validation utilities
pub mod validation {
    use super::*;

    /// Require a finite, strictly positive value
    pub fn positive(field: &'static str, value: f64) -> ConfigResult<()> {
        if !value.is_finite() {
            return Err(ConfigError::NotFinite { field });
        }
        if value <= 0.0 {
            return Err(ConfigError::NonPositive {
                field,
                value: value.to_string(),
            });
        }
        Ok(())
    }

    /// Require a non-zero count
    pub fn non_zero(field: &'static str, value: u64) -> ConfigResult<()> {
        if value == 0 {
            return Err(ConfigError::NonPositive {
                field,
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    /// Require a finite value
    pub fn finite(field: &'static str, value: f64) -> ConfigResult<()> {
        if !value.is_finite() {
            return Err(ConfigError::NotFinite { field });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stitch_error_display() {
        let err: StitchError = SessionError::InputLocked.into();
        assert!(err.to_string().contains("locked"));
    }

    #[test]
    fn test_grid_error_display() {
        let err = GridError::Irregular {
            row: 2,
            expected: 7,
            actual: 6,
        };
        assert!(err.to_string().contains("Row 2 has 6"));
    }

    #[test]
    fn test_io_error_converts() {
        let err: StitchError = IoError::FileNotFound("GetX.TXT".to_string()).into();
        assert!(matches!(err, StitchError::Io(_)));
        assert!(err.to_string().contains("GetX.TXT"));
    }

    #[test]
    fn test_validate_positive() {
        assert!(validation::positive("step", 0.1).is_ok());
        assert!(matches!(
            validation::positive("step", 0.0),
            Err(ConfigError::NonPositive { field: "step", .. })
        ));
        assert!(matches!(
            validation::positive("step", f64::NAN),
            Err(ConfigError::NotFinite { .. })
        ));
    }

    #[test]
    fn test_validate_non_zero() {
        assert!(validation::non_zero("rows", 3).is_ok());
        assert!(validation::non_zero("rows", 0).is_err());
    }
}
