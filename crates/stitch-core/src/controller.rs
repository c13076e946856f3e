//! Scan controller
//!
//! A tick-driven state machine that isolates grid points one at a time.
//! Every tick shrinks the viewport by `step_distance`. Once the radius hits
//! its floor the current cell is decided (one point, none, or several), the
//! radius is re-armed to its starting value and the camera steps one column
//! to the right. After `points_per_row` cells the camera returns to the start
//! of the row, moves up one row, and the buffered points become a curve.
//!
//! ```text
//! Idle --start--> Narrowing --floor--> RowStepping --row full--> RowComplete
//!                    ^  |                  |                         |
//!                    +--+------------------+-------------------------+
//!                                 curves >= target --> SessionComplete
//! ```

use crate::collector::PointCollector;
use crate::config::ScanConfig;
use crate::curves::CurveStore;
use crate::error::ConfigResult;
use crate::types::{Point, PointCloud};
use crate::viewport::Viewport;
use crate::visibility::{self, Isolation};
use serde::{Deserialize, Serialize};

/// Controller states
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanState {
    /// Not automating; manual input allowed
    #[default]
    Idle,
    /// Shrinking toward the zoom floor
    Narrowing,
    /// A cell was just decided and the camera stepped to the next column
    RowStepping,
    /// A row was just flushed into a curve
    RowComplete,
    /// Target curve count reached; no further ticks are processed
    SessionComplete,
}

impl ScanState {
    /// Whether ticks are processed in this state
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ScanState::Narrowing | ScanState::RowStepping | ScanState::RowComplete
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScanState::Idle => "Idle",
            ScanState::Narrowing => "Narrowing",
            ScanState::RowStepping => "Row Stepping",
            ScanState::RowComplete => "Row Complete",
            ScanState::SessionComplete => "Session Complete",
        }
    }
}

/// What happened at a cell once the zoom floor was reached
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CellOutcome {
    /// Exactly one point was visible; `recorded` is false for a repeat
    Isolated { point: Point, recorded: bool },
    /// Nothing visible at the floor
    Empty,
    /// Several points visible at the floor; nothing recorded
    Ambiguous { visible: usize },
}

impl CellOutcome {
    /// Whether the caller should surface a data-quality warning
    pub fn is_warning(&self) -> bool {
        matches!(self, CellOutcome::Ambiguous { .. })
    }
}

/// A decided cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellReport {
    pub row: usize,
    pub column: usize,
    pub outcome: CellOutcome,
}

/// Result of one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Ticks processed so far in this run
    pub tick: u64,
    /// State after the tick
    pub state: ScanState,
    /// Radius after the tick
    pub zoom_radius: f64,
    /// Isolation test at the shrunken radius; `None` if the tick was ignored
    pub isolation: Option<Isolation>,
    /// Cell decided on this tick
    pub cell: Option<CellReport>,
    /// Index of the curve appended on this tick
    pub completed_curve: Option<usize>,
}

/// Mutable state the controller drives during a tick
pub struct ScanContext<'a> {
    pub viewport: &'a mut Viewport,
    pub cloud: &'a PointCloud,
    pub collector: &'a mut PointCollector,
    pub curves: &'a mut CurveStore,
}

/// Automation state machine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanController {
    state: ScanState,
    config: ScanConfig,
    home_radius: f64,
    row_steps: usize,
    ticks: u64,
}

impl ScanController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Cells decided in the current row
    pub fn row_steps(&self) -> usize {
        self.row_steps
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Radius restored after every decided cell
    pub fn home_radius(&self) -> f64 {
        self.home_radius
    }

    /// Arm the controller; the viewport's current radius becomes the home radius
    ///
    /// Invalid configurations leave the controller untouched.
    pub fn start(&mut self, config: ScanConfig, viewport: &Viewport) -> ConfigResult<()> {
        config.validate()?;

        tracing::info!(
            points_per_row = config.points_per_row,
            target_curve_count = config.target_curve_count,
            step_distance = config.step_distance,
            home_radius = viewport.zoom_radius(),
            "Starting automation"
        );

        self.home_radius = viewport.zoom_radius();
        self.config = config;
        self.row_steps = 0;
        self.ticks = 0;
        self.state = ScanState::Narrowing;
        Ok(())
    }

    /// Stop ticking; buffered points and stored curves are left as they are
    pub fn stop(&mut self) {
        if self.state.is_active() {
            tracing::info!(
                ticks = self.ticks,
                row_steps = self.row_steps,
                "Automation stopped"
            );
            self.state = ScanState::Idle;
        }
    }

    /// Advance one tick
    pub fn tick(&mut self, ctx: ScanContext<'_>) -> TickReport {
        if !self.state.is_active() {
            return self.report(ctx.viewport, None, None, None);
        }

        self.ticks += 1;
        ctx.viewport.zoom_in(self.config.step_distance);
        let isolation = visibility::isolate(ctx.cloud, ctx.viewport);

        if !ctx.viewport.at_min_zoom() {
            self.state = ScanState::Narrowing;
            return self.report(ctx.viewport, Some(isolation), None, None);
        }

        let cell = CellReport {
            row: ctx.curves.len(),
            column: self.row_steps,
            outcome: self.decide(isolation, ctx.collector),
        };
        tracing::debug!(
            row = cell.row,
            column = cell.column,
            outcome = ?cell.outcome,
            "Cell decided"
        );

        // Re-arm and step to the next column.
        let step_x = ctx.viewport.step_x;
        let step_y = ctx.viewport.step_y;
        ctx.viewport.set_zoom_radius(self.home_radius);
        ctx.viewport.move_camera(step_x, 0.0);
        self.row_steps += 1;
        self.state = ScanState::RowStepping;

        let mut completed_curve = None;
        if self.row_steps >= self.config.points_per_row {
            ctx.viewport
                .move_camera(-(self.config.points_per_row as f64) * step_x, step_y);
            let curve = ctx.collector.flush();
            let points = curve.len();
            let index = ctx.curves.append(curve);
            tracing::info!(row = index, points, "Row complete");

            self.row_steps = 0;
            self.state = ScanState::RowComplete;
            completed_curve = Some(index);
        }

        if ctx.curves.len() >= self.config.target_curve_count {
            tracing::info!(
                curves = ctx.curves.len(),
                ticks = self.ticks,
                "Session complete"
            );
            self.state = ScanState::SessionComplete;
        }

        self.report(ctx.viewport, Some(isolation), Some(cell), completed_curve)
    }

    fn decide(&self, isolation: Isolation, collector: &mut PointCollector) -> CellOutcome {
        match isolation {
            Isolation::Single(point) => CellOutcome::Isolated {
                point,
                recorded: collector.record(point),
            },
            Isolation::Empty => CellOutcome::Empty,
            Isolation::Ambiguous { visible } => {
                tracing::warn!(
                    visible,
                    column = self.row_steps,
                    "Several points visible at minimum zoom; cell skipped"
                );
                CellOutcome::Ambiguous { visible }
            }
        }
    }

    fn report(
        &self,
        viewport: &Viewport,
        isolation: Option<Isolation>,
        cell: Option<CellReport>,
        completed_curve: Option<usize>,
    ) -> TickReport {
        TickReport {
            tick: self.ticks,
            state: self.state,
            zoom_radius: viewport.zoom_radius(),
            isolation,
            cell,
            completed_curve,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    struct Rig {
        viewport: Viewport,
        cloud: PointCloud,
        collector: PointCollector,
        curves: CurveStore,
        controller: ScanController,
    }

    impl Rig {
        fn new(cloud: PointCloud, home_radius: f64) -> Self {
            let viewport = Viewport::new(Point::default(), home_radius, 0.1)
                .unwrap()
                .with_steps(1.0, 1.0);
            Self {
                viewport,
                cloud,
                collector: PointCollector::default(),
                curves: CurveStore::new(),
                controller: ScanController::new(),
            }
        }

        fn tick(&mut self) -> TickReport {
            self.controller.tick(ScanContext {
                viewport: &mut self.viewport,
                cloud: &self.cloud,
                collector: &mut self.collector,
                curves: &mut self.curves,
            })
        }

        fn tick_until_cell(&mut self) -> TickReport {
            loop {
                let report = self.tick();
                if report.cell.is_some() || !report.state.is_active() {
                    return report;
                }
            }
        }
    }

    fn config(points_per_row: usize, target: usize) -> ScanConfig {
        ScanConfig::default().with_grid(points_per_row, target)
    }

    #[test]
    fn test_idle_controller_ignores_ticks() {
        let mut rig = Rig::new(PointCloud::grid(Point::default(), 3, 3, 1.0), 1.0);
        let report = rig.tick();
        assert_eq!(report.state, ScanState::Idle);
        assert!(report.isolation.is_none());
        assert_eq!(rig.viewport.zoom_radius(), 1.0);
    }

    #[test]
    fn test_start_rejects_invalid_config() {
        let mut controller = ScanController::new();
        let result = controller.start(config(0, 3), &Viewport::default());
        assert!(matches!(result, Err(ConfigError::NonPositive { .. })));
        assert_eq!(controller.state(), ScanState::Idle);
    }

    #[test]
    fn test_narrowing_then_isolation_rearms() {
        let mut rig = Rig::new(PointCloud::grid(Point::default(), 3, 3, 1.0), 1.0);
        rig.controller.start(config(3, 3), &rig.viewport).unwrap();

        let first = rig.tick();
        assert_eq!(first.state, ScanState::Narrowing);
        assert!(first.cell.is_none());
        assert!(first.zoom_radius < 1.0);

        let report = rig.tick_until_cell();
        assert_eq!(report.state, ScanState::RowStepping);
        assert_eq!(
            report.cell.map(|c| c.outcome),
            Some(CellOutcome::Isolated {
                point: Point::new(0.0, 0.0),
                recorded: true
            })
        );
        assert_eq!(rig.viewport.zoom_radius(), 1.0);
        assert_eq!(rig.viewport.center(), Point::new(1.0, 0.0));
        assert_eq!(rig.controller.row_steps(), 1);
        assert_eq!(rig.collector.len(), 1);
    }

    #[test]
    fn test_empty_cell_still_steps() {
        // Single point far from the first cell.
        let cloud = PointCloud::new(vec![Point::new(1.0, 0.0)]);
        let mut rig = Rig::new(cloud, 0.5);
        rig.controller.start(config(2, 1), &rig.viewport).unwrap();

        let report = rig.tick_until_cell();
        assert_eq!(report.cell.map(|c| c.outcome), Some(CellOutcome::Empty));
        assert_eq!(rig.viewport.center_x, 1.0);

        let report = rig.tick_until_cell();
        assert!(matches!(
            report.cell.map(|c| c.outcome),
            Some(CellOutcome::Isolated { .. })
        ));
        assert_eq!(report.completed_curve, Some(0));
        assert_eq!(report.state, ScanState::SessionComplete);
        assert_eq!(rig.curves.get(0).map(|c| c.len()), Some(1));
    }

    #[test]
    fn test_ambiguous_cell_not_recorded() {
        let cloud = PointCloud::new(vec![Point::new(0.0, 0.0), Point::new(0.05, 0.05)]);
        let mut rig = Rig::new(cloud, 1.0);
        rig.controller.start(config(1, 1), &rig.viewport).unwrap();

        let report = rig.tick_until_cell();
        let outcome = report.cell.map(|c| c.outcome);
        assert_eq!(outcome, Some(CellOutcome::Ambiguous { visible: 2 }));
        assert!(outcome.is_some_and(|o| o.is_warning()));
        assert_eq!(report.completed_curve, Some(0));
        assert!(rig.curves.get(0).is_some_and(|c| c.is_empty()));
    }

    #[test]
    fn test_row_complete_returns_camera() {
        let mut rig = Rig::new(PointCloud::grid(Point::default(), 2, 2, 1.0), 1.0);
        rig.controller.start(config(2, 2), &rig.viewport).unwrap();

        rig.tick_until_cell();
        let report = rig.tick_until_cell();
        assert_eq!(report.state, ScanState::RowComplete);
        assert_eq!(report.completed_curve, Some(0));
        assert_eq!(rig.viewport.center(), Point::new(0.0, 1.0));
        assert!(rig.collector.is_empty());
        assert_eq!(rig.controller.row_steps(), 0);
    }

    #[test]
    fn test_stop_mid_row_keeps_buffer() {
        let mut rig = Rig::new(PointCloud::grid(Point::default(), 3, 3, 1.0), 1.0);
        rig.controller.start(config(3, 3), &rig.viewport).unwrap();
        rig.tick_until_cell();
        rig.tick();

        rig.controller.stop();
        assert_eq!(rig.controller.state(), ScanState::Idle);
        assert!(rig.curves.is_empty());
        assert_eq!(rig.collector.len(), 1);

        let ignored = rig.tick();
        assert!(ignored.isolation.is_none());
    }

    #[test]
    fn test_session_complete_is_terminal() {
        let mut rig = Rig::new(PointCloud::new(vec![Point::default()]), 0.1);
        rig.controller.start(config(1, 1), &rig.viewport).unwrap();

        let report = rig.tick();
        assert_eq!(report.state, ScanState::SessionComplete);
        let ticks = rig.controller.ticks();

        let after = rig.tick();
        assert_eq!(after.state, ScanState::SessionComplete);
        assert_eq!(rig.controller.ticks(), ticks);
        assert_eq!(rig.curves.len(), 1);
    }
}
