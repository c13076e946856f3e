//! Scan session management
//!
//! A session owns everything one point-isolation run touches:
//! - The point cloud (fixed once loaded)
//! - The viewport shared by manual navigation and automation
//! - The row buffer and the completed curves
//! - The scan controller
//!
//! Callers issue commands and read `SessionSnapshot`s; they never reach into
//! the controller. Manual viewport input is refused while automation runs so
//! the viewport only ever has one writer.

use crate::collector::PointCollector;
use crate::config::ScanConfig;
use crate::controller::{CellReport, ScanContext, ScanController, ScanState, TickReport};
use crate::curves::CurveStore;
use crate::error::{SessionError, SessionResult, StitchResult};
use crate::types::{Point, PointCloud};
use crate::viewport::{BoundingBox, CameraSpeed, Viewport};
use crate::visibility::{self, Isolation};
use serde::{Deserialize, Serialize};

/// A point-isolation session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSession {
    /// Unique session identifier
    pub id: String,

    /// Session creation timestamp
    pub created_at: String,

    cloud: PointCloud,
    viewport: Viewport,
    collector: PointCollector,
    curves: CurveStore,
    controller: ScanController,
    manual_record: bool,
}

impl ScanSession {
    /// Create a session over a loaded cloud
    pub fn new(cloud: PointCloud, viewport: Viewport) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            cloud,
            viewport,
            collector: PointCollector::default(),
            curves: CurveStore::new(),
            controller: ScanController::new(),
            manual_record: false,
        }
    }

    /// Load a pair of measurement reports; read failures surface before any
    /// session state exists
    pub fn load_measurements(x_path: &str, y_path: &str, viewport: Viewport) -> StitchResult<Self> {
        let cloud = PointCloud::load_measurements(x_path, y_path)?;
        Ok(Self::new(cloud, viewport))
    }

    pub fn cloud(&self) -> &PointCloud {
        &self.cloud
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn collector(&self) -> &PointCollector {
        &self.collector
    }

    pub fn curves(&self) -> &CurveStore {
        &self.curves
    }

    pub fn state(&self) -> ScanState {
        self.controller.state()
    }

    /// Whether automation currently owns the viewport
    pub fn is_automating(&self) -> bool {
        self.controller.is_active()
    }

    pub fn manual_record_enabled(&self) -> bool {
        self.manual_record
    }

    /// Points inside the current viewport
    pub fn visible(&self) -> Vec<Point> {
        visibility::visible(&self.cloud, &self.viewport)
    }

    // ===== Automation =====

    /// Validate `config` and begin a fresh automated run
    ///
    /// On success the row buffer and curve store are cleared and the current
    /// zoom radius becomes the radius restored after each cell. On failure
    /// nothing changes.
    pub fn start_automation(&mut self, config: ScanConfig) -> StitchResult<()> {
        if self.is_automating() {
            return Err(SessionError::AlreadyRunning.into());
        }
        if self.cloud.is_empty() {
            return Err(SessionError::EmptyCloud.into());
        }
        config.validate()?;
        config.validate_against(&self.cloud)?;

        self.collector.set_tolerance(config.dedup_tolerance);
        self.collector.clear();
        self.curves.clear();
        self.controller.start(config, &self.viewport)?;
        Ok(())
    }

    /// Stop automation; always safe, nothing is rolled back
    pub fn stop_automation(&mut self) {
        self.controller.stop();
    }

    /// Advance the automation by one tick
    pub fn tick(&mut self) -> TickReport {
        self.controller.tick(ScanContext {
            viewport: &mut self.viewport,
            cloud: &self.cloud,
            collector: &mut self.collector,
            curves: &mut self.curves,
        })
    }

    /// Tick without pacing until automation stops or `max_ticks` is spent
    pub fn run_to_completion(&mut self, max_ticks: u64) -> RunSummary {
        let mut summary = RunSummary::default();

        while self.is_automating() && summary.ticks < max_ticks {
            let report = self.tick();
            summary.ticks += 1;
            if let Some(cell) = report.cell.filter(|c| c.outcome.is_warning()) {
                summary.warnings.push(cell);
            }
        }

        summary.state = self.state();
        summary.curves = self.curves.len();
        if self.is_automating() {
            tracing::warn!(max_ticks, "Tick limit reached before the session completed");
        }
        summary
    }

    // ===== Manual control =====

    fn ensure_manual(&self) -> SessionResult<()> {
        if self.is_automating() {
            return Err(SessionError::InputLocked);
        }
        Ok(())
    }

    /// Pan the view; records an isolated point when manual recording is on
    pub fn pan(&mut self, dx: f64, dy: f64) -> SessionResult<Option<Point>> {
        self.ensure_manual()?;
        self.viewport.pan(dx, dy);
        Ok(self.auto_record())
    }

    /// Shrink the view radius
    pub fn zoom_in(&mut self, step: f64) -> SessionResult<Option<Point>> {
        self.ensure_manual()?;
        self.viewport.zoom_in(step);
        Ok(self.auto_record())
    }

    /// Grow the view radius
    pub fn zoom_out(&mut self, step: f64) -> SessionResult<Option<Point>> {
        self.ensure_manual()?;
        self.viewport.zoom_out(step);
        Ok(self.auto_record())
    }

    /// Switch the manual navigation speed
    pub fn set_speed(&mut self, speed: CameraSpeed) -> SessionResult<()> {
        self.ensure_manual()?;
        self.viewport.set_speed(speed);
        tracing::debug!(speed = speed.name(), "Camera speed changed");
        Ok(())
    }

    /// Enable or disable recording on every manual viewport change
    pub fn toggle_manual_record(&mut self, enabled: bool) {
        self.manual_record = enabled;
    }

    /// Test the current view and record the point if it is isolated
    pub fn record_visible(&mut self) -> SessionResult<Isolation> {
        self.ensure_manual()?;
        let isolation = visibility::isolate(&self.cloud, &self.viewport);
        if let Isolation::Single(point) = isolation {
            self.collector.record(point);
        }
        Ok(isolation)
    }

    /// Move the buffered points into a new curve; an empty buffer is discarded
    pub fn confirm_current_curve(&mut self) -> SessionResult<Option<usize>> {
        self.ensure_manual()?;
        if self.collector.is_empty() {
            return Ok(None);
        }
        let index = self.curves.append(self.collector.flush());
        tracing::info!(curve = index, "Curve confirmed");
        Ok(Some(index))
    }

    fn auto_record(&mut self) -> Option<Point> {
        if !self.manual_record {
            return None;
        }
        let point = visibility::isolate(&self.cloud, &self.viewport).point()?;
        self.collector.record(point).then_some(point)
    }

    /// Read-only view of the session for display
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id.clone(),
            state: self.state(),
            center: self.viewport.center(),
            zoom_radius: self.viewport.zoom_radius(),
            bounding_box: self.viewport.bounding_box(),
            visible_count: visibility::count_visible(&self.cloud, &self.viewport),
            buffered: self.collector.points().to_vec(),
            curve_count: self.curves.len(),
            row_steps: self.controller.row_steps(),
            ticks: self.controller.ticks(),
            manual_record: self.manual_record,
        }
    }
}

/// Display state of a session at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: String,
    pub state: ScanState,
    pub center: Point,
    pub zoom_radius: f64,
    pub bounding_box: BoundingBox,
    pub visible_count: usize,
    pub buffered: Vec<Point>,
    pub curve_count: usize,
    pub row_steps: usize,
    pub ticks: u64,
    pub manual_record: bool,
}

/// Outcome of an unpaced run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub state: ScanState,
    pub curves: usize,
    /// Cells where several points were visible at minimum zoom
    pub warnings: Vec<CellReport>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::CellOutcome;
    use crate::error::{GridError, StitchError};

    fn grid_session() -> ScanSession {
        let viewport = Viewport::default().with_steps(1.0, 1.0);
        ScanSession::new(PointCloud::grid(Point::default(), 3, 3, 1.0), viewport)
    }

    #[test]
    fn test_session_creation() {
        let session = grid_session();
        assert!(!session.id.is_empty());
        assert_eq!(session.state(), ScanState::Idle);
        assert!(session.curves().is_empty());
    }

    #[test]
    fn test_manual_input_locked_while_automating() {
        let mut session = grid_session();
        session
            .start_automation(ScanConfig::default().with_grid(3, 3))
            .unwrap();

        assert_eq!(session.pan(1.0, 0.0), Err(SessionError::InputLocked));
        assert_eq!(session.zoom_in(0.1), Err(SessionError::InputLocked));
        assert_eq!(session.zoom_out(0.1), Err(SessionError::InputLocked));
        assert_eq!(
            session.confirm_current_curve(),
            Err(SessionError::InputLocked)
        );

        session.stop_automation();
        assert!(session.pan(1.0, 0.0).is_ok());
    }

    #[test]
    fn test_start_twice_rejected() {
        let mut session = grid_session();
        let config = ScanConfig::default().with_grid(3, 3);
        session.start_automation(config.clone()).unwrap();
        assert!(matches!(
            session.start_automation(config),
            Err(StitchError::Session(SessionError::AlreadyRunning))
        ));
    }

    #[test]
    fn test_start_checks_grid_shape() {
        let mut session = grid_session();
        let config = ScanConfig {
            check_grid_shape: true,
            ..ScanConfig::default().with_grid(4, 3)
        };
        assert!(matches!(
            session.start_automation(config),
            Err(StitchError::Grid(GridError::SizeMismatch { .. }))
        ));
        assert_eq!(session.state(), ScanState::Idle);
    }

    #[test]
    fn test_empty_cloud_rejected() {
        let mut session = ScanSession::new(PointCloud::default(), Viewport::default());
        assert!(matches!(
            session.start_automation(ScanConfig::default()),
            Err(StitchError::Session(SessionError::EmptyCloud))
        ));
    }

    #[test]
    fn test_manual_record_on_zoom() {
        let mut session = grid_session();
        session.toggle_manual_record(true);

        // Radius 1.0 sees four points.
        assert_eq!(session.pan(0.0, 0.0).unwrap(), None);
        assert_eq!(session.zoom_in(0.5).unwrap(), Some(Point::new(0.0, 0.0)));
        // Already buffered.
        assert_eq!(session.zoom_in(0.5).unwrap(), None);
        assert_eq!(session.collector().len(), 1);

        assert_eq!(session.confirm_current_curve().unwrap(), Some(0));
        assert_eq!(session.confirm_current_curve().unwrap(), None);
    }

    #[test]
    fn test_manual_record_disabled() {
        let mut session = grid_session();
        assert_eq!(session.zoom_in(1.0).unwrap(), None);
        assert!(session.collector().is_empty());

        let isolation = session.record_visible().unwrap();
        assert!(isolation.is_single());
        assert_eq!(session.collector().len(), 1);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut session = grid_session();
        session.pan(-1.0, 0.0).unwrap();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.center, Point::new(1.0, 0.0));
        assert_eq!(snapshot.visible_count, 6);
        assert_eq!(snapshot.state, ScanState::Idle);
    }

    #[test]
    fn test_run_to_completion_respects_limit() {
        let mut session = grid_session();
        session
            .start_automation(ScanConfig::default().with_grid(3, 3))
            .unwrap();
        let summary = session.run_to_completion(5);
        assert_eq!(summary.ticks, 5);
        assert_eq!(summary.state, ScanState::Narrowing);
    }

    #[test]
    fn test_ambiguous_cell_reported_in_summary() {
        let cloud = PointCloud::new(vec![Point::new(0.0, 0.0), Point::new(0.05, 0.0)]);
        let viewport = Viewport::new(Point::default(), 1.0, 0.1)
            .unwrap()
            .with_steps(1.0, 1.0);
        let mut session = ScanSession::new(cloud, viewport);
        session
            .start_automation(ScanConfig::default().with_grid(1, 1))
            .unwrap();

        let summary = session.run_to_completion(1000);
        assert_eq!(summary.state, ScanState::SessionComplete);
        assert_eq!(summary.curves, 1);
        assert_eq!(summary.warnings.len(), 1);
        assert_eq!((summary.warnings[0].row, summary.warnings[0].column), (0, 0));
        assert_eq!(
            summary.warnings[0].outcome,
            CellOutcome::Ambiguous { visible: 2 }
        );
        assert!(session.curves().get(0).is_some_and(|c| c.is_empty()));
    }


    #[test]
    fn test_set_speed_applies_preset() {
        let mut session = grid_session();
        session.set_speed(CameraSpeed::Fine).unwrap();
        assert_eq!(session.viewport().step_x, CameraSpeed::Fine.pan_step());

        session
            .start_automation(ScanConfig::default().with_grid(3, 3))
            .unwrap();
        assert_eq!(
            session.set_speed(CameraSpeed::Coarse),
            Err(SessionError::InputLocked)
        );
    }
}
