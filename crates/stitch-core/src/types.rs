//! Common types for stitch-core
//!
//! Points are plain `f64` pairs. A `PointCloud` is loaded once per session
//! and never mutated afterwards.

use crate::error::StitchResult;
use serde::{Deserialize, Serialize};
use stitch_io::{Coordinate, MeasurementReader, PointReader};

/// A 2D measurement point
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_array(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Whether both coordinates lie within `tolerance` of `other`
    pub fn approx_eq(&self, other: &Point, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

impl From<[f64; 2]> for Point {
    fn from(arr: [f64; 2]) -> Self {
        Self {
            x: arr[0],
            y: arr[1],
        }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Ordered, immutable set of points for one automation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointCloud {
    points: Vec<Point>,
}

impl PointCloud {
    /// Create a cloud from points in source order
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Create a cloud from raw coordinate pairs
    pub fn from_coordinates(coords: &[Coordinate]) -> Self {
        Self::new(coords.iter().copied().map(Point::from).collect())
    }

    /// Regular grid of `columns` x `rows` points, `spacing` apart, row by row
    /// from `origin`
    pub fn grid(origin: Point, columns: usize, rows: usize, spacing: f64) -> Self {
        let points = (0..rows)
            .flat_map(|r| {
                (0..columns).map(move |c| {
                    Point::new(
                        origin.x + c as f64 * spacing,
                        origin.y + r as f64 * spacing,
                    )
                })
            })
            .collect();
        Self::new(points)
    }

    /// Load from any point reader
    pub fn load(reader: &dyn PointReader) -> StitchResult<Self> {
        let coords = reader.read_points()?;
        tracing::info!(
            format = reader.format_name(),
            points = coords.len(),
            "Loaded point cloud"
        );
        Ok(Self::from_coordinates(&coords))
    }

    /// Load from a pair of measurement reports
    pub fn load_measurements(x_path: &str, y_path: &str) -> StitchResult<Self> {
        Self::load(&MeasurementReader::new(x_path, y_path))
    }

    /// Load from a single-file source such as CSV
    pub fn load_file(path: &str) -> StitchResult<Self> {
        let reader = stitch_io::open_points(path)?;
        Self::load(reader.as_ref())
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }
}

impl From<Vec<Point>> for PointCloud {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}
