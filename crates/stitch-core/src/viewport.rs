//! Orthographic viewport for point isolation
//!
//! The viewport is a square window of half-width `zoom_radius` around a
//! camera center. Both the scan controller and manual navigation mutate it
//! through the same `pan` and zoom operations.

use crate::error::{validation, ConfigError, ConfigResult};
use crate::types::Point;
use serde::{Deserialize, Serialize};

/// Default lower bound for the zoom radius
pub const DEFAULT_MIN_ZOOM_RADIUS: f64 = 0.1;

/// Axis-aligned visible region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl BoundingBox {
    /// Inclusive containment on all four edges
    pub fn contains(&self, point: &Point) -> bool {
        self.left <= point.x
            && point.x <= self.right
            && self.bottom <= point.y
            && point.y <= self.top
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }
}

/// Navigation speed presets for manual control
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraSpeed {
    #[default]
    Coarse,
    Fine,
    SuperFine,
}

impl CameraSpeed {
    /// Pan step for this preset
    pub fn pan_step(&self) -> f64 {
        match self {
            CameraSpeed::Coarse => 0.1,
            CameraSpeed::Fine => 0.01,
            CameraSpeed::SuperFine => 0.001,
        }
    }

    /// Zoom step for this preset
    pub fn zoom_step(&self) -> f64 {
        match self {
            CameraSpeed::Coarse => 0.1,
            CameraSpeed::Fine | CameraSpeed::SuperFine => 0.01,
        }
    }

    /// Cycle Coarse -> Fine -> SuperFine -> Coarse
    pub fn cycle(&self) -> Self {
        match self {
            CameraSpeed::Coarse => CameraSpeed::Fine,
            CameraSpeed::Fine => CameraSpeed::SuperFine,
            CameraSpeed::SuperFine => CameraSpeed::Coarse,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CameraSpeed::Coarse => "Camera Coarse",
            CameraSpeed::Fine => "Camera Fine",
            CameraSpeed::SuperFine => "Camera Super Fine",
        }
    }
}

/// Camera center, zoom radius and step sizes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center_x: f64,
    pub center_y: f64,
    zoom_radius: f64,
    min_zoom_radius: f64,
    /// Horizontal pan step (also the scan column pitch)
    pub step_x: f64,
    /// Vertical pan step (also the scan row pitch)
    pub step_y: f64,
    /// Manual zoom step
    pub zoom_step: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        let speed = CameraSpeed::default();
        Self {
            center_x: 0.0,
            center_y: 0.0,
            zoom_radius: 1.0,
            min_zoom_radius: DEFAULT_MIN_ZOOM_RADIUS,
            step_x: speed.pan_step(),
            step_y: speed.pan_step(),
            zoom_step: speed.zoom_step(),
        }
    }
}

impl Viewport {
    /// Create a viewport; the radius is raised to `min_zoom_radius` if below it
    pub fn new(center: Point, zoom_radius: f64, min_zoom_radius: f64) -> ConfigResult<Self> {
        validation::positive("min_zoom_radius", min_zoom_radius)?;
        validation::positive("zoom_radius", zoom_radius)?;
        validation::finite("center_x", center.x)?;
        validation::finite("center_y", center.y)?;

        Ok(Self {
            center_x: center.x,
            center_y: center.y,
            zoom_radius: zoom_radius.max(min_zoom_radius),
            min_zoom_radius,
            ..Default::default()
        })
    }

    /// Set pan steps
    pub fn with_steps(mut self, step_x: f64, step_y: f64) -> Self {
        self.step_x = step_x;
        self.step_y = step_y;
        self
    }

    /// Set the manual zoom step
    pub fn with_zoom_step(mut self, zoom_step: f64) -> Self {
        self.zoom_step = zoom_step;
        self
    }

    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }

    pub fn zoom_radius(&self) -> f64 {
        self.zoom_radius
    }

    pub fn min_zoom_radius(&self) -> f64 {
        self.min_zoom_radius
    }

    /// Whether the radius sits on its floor
    pub fn at_min_zoom(&self) -> bool {
        self.zoom_radius <= self.min_zoom_radius
    }

    /// Shift the visible world; positive `dx` moves it rightward
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.center_x -= dx;
        self.center_y -= dy;
    }

    /// Move the camera itself (the opposite of `pan`)
    pub fn move_camera(&mut self, dx: f64, dy: f64) {
        self.pan(-dx, -dy);
    }

    /// Shrink the radius, never below the floor
    pub fn zoom_in(&mut self, step: f64) {
        self.zoom_radius = (self.zoom_radius - step).max(self.min_zoom_radius);
    }

    /// Grow the radius
    pub fn zoom_out(&mut self, step: f64) {
        self.zoom_radius += step;
    }

    /// Set the radius directly, clamped to the floor
    pub fn set_zoom_radius(&mut self, radius: f64) {
        self.zoom_radius = radius.max(self.min_zoom_radius);
    }

    /// Apply a speed preset to the pan and zoom steps
    pub fn set_speed(&mut self, speed: CameraSpeed) {
        self.step_x = speed.pan_step();
        self.step_y = speed.pan_step();
        self.zoom_step = speed.zoom_step();
    }

    /// Visible region
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox {
            left: self.center_x - self.zoom_radius,
            right: self.center_x + self.zoom_radius,
            bottom: self.center_y - self.zoom_radius,
            top: self.center_y + self.zoom_radius,
        }
    }
}

/// Serializable viewport setup for config files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    pub center_x: f64,
    pub center_y: f64,
    pub zoom_radius: f64,
    pub min_zoom_radius: f64,
    pub step_x: f64,
    pub step_y: f64,
    pub zoom_step: f64,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        let viewport = Viewport::default();
        Self {
            center_x: viewport.center_x,
            center_y: viewport.center_y,
            zoom_radius: viewport.zoom_radius,
            min_zoom_radius: viewport.min_zoom_radius,
            step_x: viewport.step_x,
            step_y: viewport.step_y,
            zoom_step: viewport.zoom_step,
        }
    }
}

impl ViewportSettings {
    /// Build a viewport, validating steps and limits
    pub fn build(&self) -> ConfigResult<Viewport> {
        validation::finite("step_x", self.step_x)?;
        validation::finite("step_y", self.step_y)?;
        validation::positive("zoom_step", self.zoom_step)?;
        if self.zoom_radius < self.min_zoom_radius {
            return Err(ConfigError::ZoomLimits {
                message: format!(
                    "zoom_radius {} is below min_zoom_radius {}",
                    self.zoom_radius, self.min_zoom_radius
                ),
            });
        }

        Ok(Viewport::new(
            Point::new(self.center_x, self.center_y),
            self.zoom_radius,
            self.min_zoom_radius,
        )?
        .with_steps(self.step_x, self.step_y)
        .with_zoom_step(self.zoom_step))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_viewport_default() {
        let viewport = Viewport::default();
        assert_eq!(viewport.center(), Point::new(0.0, 0.0));
        assert_eq!(viewport.zoom_radius(), 1.0);
        assert_eq!(viewport.min_zoom_radius(), DEFAULT_MIN_ZOOM_RADIUS);
    }

    #[test]
    fn test_pan_sign_convention() {
        let mut viewport = Viewport::default();
        viewport.pan(1.0, 0.5);
        // World moves right, so the camera center moves left.
        assert_eq!(viewport.center_x, -1.0);
        assert_eq!(viewport.center_y, -0.5);

        viewport.move_camera(1.0, 0.5);
        assert_eq!(viewport.center(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_zoom_in_clamps_to_floor() {
        let mut viewport = Viewport::default();
        viewport.zoom_in(0.5);
        assert_eq!(viewport.zoom_radius(), 0.5);
        viewport.zoom_in(10.0);
        assert_eq!(viewport.zoom_radius(), DEFAULT_MIN_ZOOM_RADIUS);
        assert!(viewport.at_min_zoom());
    }

    #[test]
    fn test_zoom_out_unbounded() {
        let mut viewport = Viewport::default();
        viewport.zoom_out(1000.0);
        assert_eq!(viewport.zoom_radius(), 1001.0);
    }

    #[test]
    fn test_bounding_box() {
        let viewport = Viewport::new(Point::new(2.0, -1.0), 0.5, 0.1).unwrap();
        let bbox = viewport.bounding_box();
        assert_eq!(bbox.left, 1.5);
        assert_eq!(bbox.right, 2.5);
        assert_eq!(bbox.bottom, -1.5);
        assert_eq!(bbox.top, -0.5);
        assert_eq!(bbox.width(), 1.0);
    }

    #[test]
    fn test_bounding_box_edges_inclusive() {
        let bbox = Viewport::default().bounding_box();
        assert!(bbox.contains(&Point::new(1.0, -1.0)));
        assert!(!bbox.contains(&Point::new(1.0 + 1e-9, 0.0)));
    }

    #[test]
    fn test_new_rejects_bad_limits() {
        assert!(Viewport::new(Point::default(), 1.0, 0.0).is_err());
        assert!(Viewport::new(Point::default(), -1.0, 0.1).is_err());
        assert!(Viewport::new(Point::new(f64::NAN, 0.0), 1.0, 0.1).is_err());
        // Radius below the floor is raised to it.
        let viewport = Viewport::new(Point::default(), 0.05, 0.1).unwrap();
        assert_eq!(viewport.zoom_radius(), 0.1);
    }

    #[test]
    fn test_speed_presets() {
        let mut viewport = Viewport::default();
        viewport.set_speed(CameraSpeed::SuperFine);
        assert_eq!(viewport.step_x, 0.001);
        assert_eq!(viewport.zoom_step, 0.01);
        assert_eq!(CameraSpeed::SuperFine.cycle(), CameraSpeed::Coarse);
    }

    #[test]
    fn test_settings_build() {
        let settings = ViewportSettings {
            step_x: 1.0,
            step_y: 2.0,
            ..Default::default()
        };
        let viewport = settings.build().unwrap();
        assert_eq!(viewport.step_x, 1.0);
        assert_eq!(viewport.step_y, 2.0);

        let bad = ViewportSettings {
            zoom_radius: 0.01,
            ..Default::default()
        };
        assert!(matches!(bad.build(), Err(ConfigError::ZoomLimits { .. })));
    }

    #[derive(Debug, Clone, Copy)]
    enum ZoomOp {
        In(f64),
        Out(f64),
        Set(f64),
    }

    fn zoom_op() -> impl Strategy<Value = ZoomOp> {
        prop_oneof![
            (-10.0f64..50.0).prop_map(ZoomOp::In),
            (0.0f64..50.0).prop_map(ZoomOp::Out),
            (-50.0f64..50.0).prop_map(ZoomOp::Set),
        ]
    }

    proptest! {
        #[test]
        fn prop_zoom_never_below_floor(
            radius in 0.001f64..100.0,
            floor in 0.001f64..10.0,
            ops in prop::collection::vec(zoom_op(), 0..40),
        ) {
            let mut viewport = Viewport::new(Point::default(), radius, floor).unwrap();
            prop_assert!(viewport.zoom_radius() >= viewport.min_zoom_radius());

            for op in ops {
                match op {
                    ZoomOp::In(step) => viewport.zoom_in(step),
                    ZoomOp::Out(step) => viewport.zoom_out(step),
                    ZoomOp::Set(value) => viewport.set_zoom_radius(value),
                }
                prop_assert!(viewport.zoom_radius() >= viewport.min_zoom_radius());
            }
        }
    }
}
