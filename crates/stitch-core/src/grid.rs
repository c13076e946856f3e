//! Grid shape inference
//!
//! The scan controller walks a fixed number of cells per row. Instead of
//! trusting that count blindly, the shape can be read off the cloud: points
//! arrive row by row, and a new row starts whenever y leaves the tolerance
//! band of the current row's first point.

use crate::error::{GridError, GridResult};
use crate::types::{Point, PointCloud};
use serde::{Deserialize, Serialize};

/// Default y tolerance when splitting rows
pub const DEFAULT_ROW_TOLERANCE: f64 = 0.5;

/// Rows x columns of a regular grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: usize,
    pub columns: usize,
}

impl GridShape {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }

    pub fn len(&self) -> usize {
        self.rows * self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Infer the shape from consecutive rows of the cloud
    pub fn infer(cloud: &PointCloud, tolerance: f64) -> GridResult<Self> {
        let rows = group_rows(cloud.points(), tolerance);
        let expected = rows.first().map(Vec::len).ok_or(GridError::Empty)?;

        if let Some((row, actual)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != expected)
        {
            return Err(GridError::Irregular {
                row,
                expected,
                actual,
            });
        }

        Ok(Self {
            rows: rows.len(),
            columns: expected,
        })
    }

    /// Check that a cloud has exactly as many points as this grid
    pub fn check(&self, cloud: &PointCloud) -> GridResult<()> {
        if cloud.len() != self.len() {
            return Err(GridError::SizeMismatch {
                points: cloud.len(),
                rows: self.rows,
                columns: self.columns,
                expected: self.len(),
            });
        }
        Ok(())
    }
}

/// Split points into rows, preserving order
pub fn group_rows(points: &[Point], tolerance: f64) -> Vec<Vec<Point>> {
    let mut rows: Vec<Vec<Point>> = Vec::new();

    for point in points {
        match rows.last_mut() {
            Some(row) if (point.y - row[0].y).abs() <= tolerance => row.push(*point),
            _ => rows.push(vec![*point]),
        }
    }

    rows
}
