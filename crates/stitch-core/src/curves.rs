//! Completed curves
//!
//! A curve is the ordered set of points isolated during one scan row. The
//! store only ever grows; a point may appear in several curves.

use crate::types::Point;
use serde::{Deserialize, Serialize};

/// Ordered points from one completed row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    points: Vec<Point>,
}

impl Curve {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
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

/// Append-only sequence of curves for one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveStore {
    curves: Vec<Curve>,
}

impl CurveStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a curve; returns its index
    pub fn append(&mut self, curve: Curve) -> usize {
        self.curves.push(curve);
        self.curves.len() - 1
    }

    /// Read-only view of every curve
    pub fn all(&self) -> &[Curve] {
        &self.curves
    }

    pub fn get(&self, index: usize) -> Option<&Curve> {
        self.curves.get(index)
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Total points across all curves
    pub fn point_count(&self) -> usize {
        self.curves.iter().map(Curve::len).sum()
    }

    /// Every point, curve by curve
    pub fn flatten(&self) -> Vec<Point> {
        self.curves
            .iter()
            .flat_map(|c| c.points().iter().copied())
            .collect()
    }

    /// Start a new session
    pub(crate) fn clear(&mut self) {
        self.curves.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_keeps_order_and_duplicates() {
        let mut store = CurveStore::new();
        let shared = Point::new(1.0, 1.0);
        assert_eq!(store.append(Curve::new(vec![shared])), 0);
        assert_eq!(store.append(Curve::new(vec![shared, Point::new(2.0, 1.0)])), 1);

        assert_eq!(store.len(), 2);
        assert_eq!(store.point_count(), 3);
        assert_eq!(store.flatten()[1], shared);
        assert_eq!(store.get(1).map(Curve::len), Some(2));
    }

}
