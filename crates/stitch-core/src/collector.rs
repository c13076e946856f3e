//! Point collector
//!
//! Buffers the points isolated during the current scan row. Repeated
//! isolations of the same grid point collapse into one entry: two points are
//! the same when both coordinates agree within the collector's tolerance.
//! The buffer is kept sorted by x ascending.

use crate::curves::Curve;
use crate::types::Point;
use serde::{Deserialize, Serialize};

/// Default tolerance for treating two isolations as the same point
pub const DEFAULT_DEDUP_TOLERANCE: f64 = 1e-9;

/// Pending points for the current row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointCollector {
    buffer: Vec<Point>,
    tolerance: f64,
}

impl Default for PointCollector {
    fn default() -> Self {
        Self::new(DEFAULT_DEDUP_TOLERANCE)
    }
}

impl PointCollector {
    /// Create a collector; negative tolerances are treated as zero
    pub fn new(tolerance: f64) -> Self {
        Self {
            buffer: Vec::new(),
            tolerance: tolerance.max(0.0),
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn set_tolerance(&mut self, tolerance: f64) {
        self.tolerance = tolerance.max(0.0);
    }

    /// Whether an equivalent point is already buffered
    pub fn contains(&self, point: &Point) -> bool {
        self.buffer
            .iter()
            .any(|p| p.approx_eq(point, self.tolerance))
    }

    /// Buffer a point unless already present; returns whether it was added
    pub fn record(&mut self, point: Point) -> bool {
        if self.contains(&point) {
            return false;
        }

        // Insert after any equal x to keep earlier recordings first.
        let index = self.buffer.partition_point(|p| p.x <= point.x);
        self.buffer.insert(index, point);
        true
    }

    /// Take the buffered points as a curve, leaving the buffer empty
    pub fn flush(&mut self) -> Curve {
        Curve::new(std::mem::take(&mut self.buffer))
    }

    /// Drop all buffered points
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn points(&self) -> &[Point] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
