//! Configuration for automated scans
//!
//! A scan walks `target_curve_count` rows of `points_per_row` cells,
//! shrinking the viewport by `step_distance` per tick until a single point is
//! isolated at the zoom floor.

use crate::collector::DEFAULT_DEDUP_TOLERANCE;
use crate::error::{validation, ConfigError, ConfigResult, GridResult};
use crate::grid::GridShape;
use crate::types::PointCloud;
use crate::viewport::ViewportSettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Automation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Zoom decrement per tick
    pub step_distance: f64,
    /// Wall-clock pacing between ticks in milliseconds
    pub tick_interval_ms: u64,
    /// Isolation events before advancing to the next row
    pub points_per_row: usize,
    /// Curves to collect before the session completes
    pub target_curve_count: usize,
    /// Coordinate tolerance for merging repeated isolations
    pub dedup_tolerance: f64,
    /// Require the cloud to hold exactly one point per scanned cell
    pub check_grid_shape: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            step_distance: 0.1,
            tick_interval_ms: 50,
            points_per_row: 7,
            target_curve_count: 4,
            dedup_tolerance: DEFAULT_DEDUP_TOLERANCE,
            check_grid_shape: false,
        }
    }
}

impl ScanConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration matching a grid's rows and columns
    pub fn for_grid(shape: GridShape) -> Self {
        Self {
            points_per_row: shape.columns,
            target_curve_count: shape.rows,
            check_grid_shape: true,
            ..Default::default()
        }
    }

    pub fn with_step_distance(mut self, step_distance: f64) -> Self {
        self.step_distance = step_distance;
        self
    }

    pub fn with_grid(mut self, points_per_row: usize, target_curve_count: usize) -> Self {
        self.points_per_row = points_per_row;
        self.target_curve_count = target_curve_count;
        self
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Grid this configuration scans
    pub fn grid_shape(&self) -> GridShape {
        GridShape::new(self.target_curve_count, self.points_per_row)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        validation::positive("step_distance", self.step_distance)?;
        validation::non_zero("tick_interval_ms", self.tick_interval_ms)?;
        validation::non_zero("points_per_row", self.points_per_row as u64)?;
        validation::non_zero("target_curve_count", self.target_curve_count as u64)?;
        validation::finite("dedup_tolerance", self.dedup_tolerance)?;
        if self.dedup_tolerance < 0.0 {
            return Err(ConfigError::NonPositive {
                field: "dedup_tolerance",
                value: self.dedup_tolerance.to_string(),
            });
        }
        Ok(())
    }

    /// Check the cloud against the scanned grid when shape checking is on
    pub fn validate_against(&self, cloud: &PointCloud) -> GridResult<()> {
        if !self.check_grid_shape {
            return Ok(());
        }
        self.grid_shape().check(cloud)
    }

    /// Upper bound on ticks for a full session
    ///
    /// Each cell takes at most `ceil((initial - min) / step)` narrowing ticks
    /// plus the tick that lands on the floor.
    pub fn tick_budget(&self, initial_radius: f64, min_radius: f64) -> u64 {
        let span = (initial_radius - min_radius).max(0.0);
        let per_cell = (span / self.step_distance).ceil() as u64 + 1;
        per_cell * (self.points_per_row * self.target_curve_count) as u64
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> ConfigResult<Self> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Full settings file: scan plus initial viewport
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StitchConfig {
    pub scan: ScanConfig,
    pub viewport: ViewportSettings,
}

impl StitchConfig {
    /// Load settings from a TOML string
    pub fn from_toml(toml_str: &str) -> ConfigResult<Self> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Serialize settings to TOML
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Validate both sections
    pub fn validate(&self) -> ConfigResult<()> {
        self.scan.validate()?;
        self.viewport.build().map(|_| ())
    }
}
