//! Visibility filter
//!
//! Linear scans of the point cloud against the viewport's bounding box.
//! Bounds are inclusive on every edge, so a point exactly on the border of
//! the floor-sized window still counts as isolated.

use crate::types::{Point, PointCloud};
use crate::viewport::Viewport;
use serde::{Deserialize, Serialize};

/// Points inside the viewport, in cloud order
pub fn visible(points: &PointCloud, viewport: &Viewport) -> Vec<Point> {
    let bbox = viewport.bounding_box();
    points.iter().filter(|p| bbox.contains(p)).copied().collect()
}

/// Number of points inside the viewport
pub fn count_visible(points: &PointCloud, viewport: &Viewport) -> usize {
    let bbox = viewport.bounding_box();
    points.iter().filter(|p| bbox.contains(p)).count()
}

/// Result of an isolation test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Isolation {
    /// No point in view
    Empty,
    /// Exactly one point in view
    Single(Point),
    /// More than one point in view
    Ambiguous { visible: usize },
}

impl Isolation {
    pub fn point(&self) -> Option<Point> {
        match self {
            Isolation::Single(p) => Some(*p),
            _ => None,
        }
    }

    pub fn is_single(&self) -> bool {
        matches!(self, Isolation::Single(_))
    }
}

/// Classify the current view without collecting the visible set
pub fn isolate(points: &PointCloud, viewport: &Viewport) -> Isolation {
    let bbox = viewport.bounding_box();
    let mut inside = points.iter().filter(|p| bbox.contains(p));

    match (inside.next(), inside.next()) {
        (None, _) => Isolation::Empty,
        (Some(p), None) => Isolation::Single(*p),
        (Some(_), Some(_)) => Isolation::Ambiguous {
            visible: 2 + inside.count(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grid() -> PointCloud {
        PointCloud::grid(Point::default(), 3, 3, 1.0)
    }

    #[test]
    fn test_visible_keeps_input_order() {
        let viewport = Viewport::default();
        let seen = visible(&grid(), &viewport);
        assert_eq!(
            seen,
            vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(0.0, 1.0),
                Point::new(1.0, 1.0),
            ]
        );
    }

    #[test]
    fn test_isolate_classification() {
        let cloud = grid();
        let mut viewport = Viewport::default();
        assert_eq!(isolate(&cloud, &viewport), Isolation::Ambiguous { visible: 4 });

        viewport.zoom_in(1.0);
        assert_eq!(
            isolate(&cloud, &viewport),
            Isolation::Single(Point::new(0.0, 0.0))
        );

        viewport.move_camera(0.5, 0.5);
        assert_eq!(isolate(&cloud, &viewport), Isolation::Empty);
    }

    #[test]
    fn test_count_matches_visible() {
        let cloud = grid();
        let viewport = Viewport::default();
        assert_eq!(count_visible(&cloud, &viewport), visible(&cloud, &viewport).len());
    }

    proptest! {
        #[test]
        fn test_visible_is_monotonic_in_radius(
            coords in prop::collection::vec((-5.0f64..5.0, -5.0f64..5.0), 0..40),
            cx in -3.0f64..3.0,
            cy in -3.0f64..3.0,
            radius in 0.1f64..5.0,
            shrink in 0.0f64..5.0,
        ) {
            let cloud = PointCloud::new(coords.into_iter().map(Point::from).collect());
            let mut viewport = Viewport::new(Point::new(cx, cy), radius, 0.1).unwrap();
            let before = count_visible(&cloud, &viewport);
            viewport.zoom_in(shrink);
            let after = count_visible(&cloud, &viewport);
            prop_assert!(after <= before, "shrinking grew visible set {} -> {}", before, after);
        }
    }
}
