//! Control commands
//!
//! The control surface exposed to a front end, as data. A GUI or a script
//! sends `ControlCommand`s and gets a `CommandOutcome` back:
//!
//! ```json
//! {"Pan": {"dx": 0.1, "dy": 0.0}}
//! {"StartAutomation": {"step_distance": 0.1, "points_per_row": 7}}
//! "ConfirmCurve"
//! ```

use crate::config::ScanConfig;
use crate::controller::TickReport;
use crate::error::StitchResult;
use crate::session::ScanSession;
use crate::types::Point;
use crate::viewport::CameraSpeed;
use crate::visibility::Isolation;
use serde::{Deserialize, Serialize};

/// Commands accepted by a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ControlCommand {
    /// Begin an automated run
    StartAutomation(ScanConfig),

    /// Stop the automated run
    StopAutomation,

    /// Advance automation by one tick
    Tick,

    /// Pan the view
    Pan { dx: f64, dy: f64 },

    /// Shrink the view; `None` uses the viewport's zoom step
    ZoomIn { step: Option<f64> },

    /// Grow the view; `None` uses the viewport's zoom step
    ZoomOut { step: Option<f64> },

    /// Change the manual navigation speed
    SetSpeed(CameraSpeed),

    /// Enable or disable recording on manual moves
    ToggleManualRecord(bool),

    /// Record the visible point if it is isolated
    RecordVisible,

    /// Move buffered points into a curve
    ConfirmCurve,
}

/// Result of applying a command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CommandOutcome {
    /// Command applied, nothing to report
    Done,

    /// Viewport moved; holds the point recorded by manual recording, if any
    Moved(Option<Point>),

    /// Isolation test result
    Isolation(Isolation),

    /// Index of the confirmed curve, or `None` if the buffer was empty
    CurveConfirmed(Option<usize>),

    /// Automation tick result
    Ticked(TickReport),
}

impl ControlCommand {
    /// Parse a command from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize a command to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl ScanSession {
    /// Apply a control command
    pub fn apply(&mut self, command: ControlCommand) -> StitchResult<CommandOutcome> {
        let outcome = match command {
            ControlCommand::StartAutomation(config) => {
                self.start_automation(config)?;
                CommandOutcome::Done
            }
            ControlCommand::StopAutomation => {
                self.stop_automation();
                CommandOutcome::Done
            }
            ControlCommand::Tick => CommandOutcome::Ticked(self.tick()),
            ControlCommand::Pan { dx, dy } => CommandOutcome::Moved(self.pan(dx, dy)?),
            ControlCommand::ZoomIn { step } => {
                let step = step.unwrap_or(self.viewport().zoom_step);
                CommandOutcome::Moved(self.zoom_in(step)?)
            }
            ControlCommand::ZoomOut { step } => {
                let step = step.unwrap_or(self.viewport().zoom_step);
                CommandOutcome::Moved(self.zoom_out(step)?)
            }
            ControlCommand::SetSpeed(speed) => {
                self.set_speed(speed)?;
                CommandOutcome::Done
            }
            ControlCommand::ToggleManualRecord(enabled) => {
                self.toggle_manual_record(enabled);
                CommandOutcome::Done
            }
            ControlCommand::RecordVisible => CommandOutcome::Isolation(self.record_visible()?),
            ControlCommand::ConfirmCurve => {
                CommandOutcome::CurveConfirmed(self.confirm_current_curve()?)
            }
        };
        Ok(outcome)
    }
}
