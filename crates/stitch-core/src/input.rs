//! Keyboard input for manual navigation
//!
//! Maps key presses onto `ControlCommand`s:
//! - Arrow keys pan by the viewport's step sizes
//! - `+` / `-` zoom by the viewport's zoom step
//! - Space records the isolated point, Enter confirms the current curve
//! - Escape stops automation

use crate::command::ControlCommand;
use crate::session::ScanSession;
use serde::{Deserialize, Serialize};

/// Keyboard key codes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    // Navigation
    Up,
    Down,
    Left,
    Right,

    // Zoom
    Plus,
    Minus,

    // Letters
    R,

    // Special
    Space,
    Enter,
    Escape,

    // Unknown
    Unknown(u32),
}

/// Modifier key state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool, // Cmd on macOS
}

impl Modifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    /// Check if this matches the expected modifiers exactly
    pub fn matches(&self, expected: &Modifiers) -> bool {
        self.shift == expected.shift
            && self.ctrl == expected.ctrl
            && self.alt == expected.alt
            && self.meta == expected.meta
    }
}

/// Keyboard event
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeyEvent {
    /// The key that was pressed/released
    pub key: Key,
    /// Whether the key was pressed (true) or released (false)
    pub pressed: bool,
    /// Modifier state at time of event
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn pressed(key: Key, modifiers: Modifiers) -> Self {
        Self {
            key,
            pressed: true,
            modifiers,
        }
    }

    pub fn released(key: Key, modifiers: Modifiers) -> Self {
        Self {
            key,
            pressed: false,
            modifiers,
        }
    }
}

/// Action bound to a key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    // Camera
    PanLeft,
    PanRight,
    PanUp,
    PanDown,
    ZoomIn,
    ZoomOut,

    // Collection
    RecordVisible,
    ConfirmCurve,
    ToggleManualRecord,

    // Automation
    StopAutomation,
}

impl Action {
    /// Resolve the action against the session's current settings
    pub fn to_command(&self, session: &ScanSession) -> ControlCommand {
        let viewport = session.viewport();
        match self {
            // Pan moves the content; the view center shifts the other way.
            Action::PanLeft => ControlCommand::Pan {
                dx: -viewport.step_x,
                dy: 0.0,
            },
            Action::PanRight => ControlCommand::Pan {
                dx: viewport.step_x,
                dy: 0.0,
            },
            Action::PanUp => ControlCommand::Pan {
                dx: 0.0,
                dy: viewport.step_y,
            },
            Action::PanDown => ControlCommand::Pan {
                dx: 0.0,
                dy: -viewport.step_y,
            },
            Action::ZoomIn => ControlCommand::ZoomIn { step: None },
            Action::ZoomOut => ControlCommand::ZoomOut { step: None },
            Action::RecordVisible => ControlCommand::RecordVisible,
            Action::ConfirmCurve => ControlCommand::ConfirmCurve,
            Action::ToggleManualRecord => {
                ControlCommand::ToggleManualRecord(!session.manual_record_enabled())
            }
            Action::StopAutomation => ControlCommand::StopAutomation,
        }
    }
}

/// Keyboard shortcut definition
#[derive(Clone, Debug)]
pub struct Shortcut {
    pub key: Key,
    pub modifiers: Modifiers,
    pub action: Action,
}

impl Shortcut {
    pub fn new(key: Key, modifiers: Modifiers, action: Action) -> Self {
        Self {
            key,
            modifiers,
            action,
        }
    }

    /// Check if this shortcut matches a key event
    pub fn matches(&self, event: &KeyEvent) -> bool {
        event.pressed && event.key == self.key && event.modifiers.matches(&self.modifiers)
    }
}

/// Default keyboard shortcuts
pub fn default_shortcuts() -> Vec<Shortcut> {
    vec![
        // Camera
        Shortcut::new(Key::Left, Modifiers::new(), Action::PanLeft),
        Shortcut::new(Key::Right, Modifiers::new(), Action::PanRight),
        Shortcut::new(Key::Up, Modifiers::new(), Action::PanUp),
        Shortcut::new(Key::Down, Modifiers::new(), Action::PanDown),
        Shortcut::new(Key::Plus, Modifiers::new(), Action::ZoomIn),
        Shortcut::new(Key::Plus, Modifiers::new().with_shift(), Action::ZoomIn),
        Shortcut::new(Key::Minus, Modifiers::new(), Action::ZoomOut),
        // Collection
        Shortcut::new(Key::Space, Modifiers::new(), Action::RecordVisible),
        Shortcut::new(Key::Enter, Modifiers::new(), Action::ConfirmCurve),
        Shortcut::new(Key::R, Modifiers::new(), Action::ToggleManualRecord),
        // Automation
        Shortcut::new(Key::Escape, Modifiers::new(), Action::StopAutomation),
    ]
}

/// Active key bindings
#[derive(Clone, Debug)]
pub struct KeyBindings {
    shortcuts: Vec<Shortcut>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            shortcuts: default_shortcuts(),
        }
    }
}

impl KeyBindings {
    pub fn new(shortcuts: Vec<Shortcut>) -> Self {
        Self { shortcuts }
    }

    pub fn shortcuts(&self) -> &[Shortcut] {
        &self.shortcuts
    }

    /// Find the action for a key event
    pub fn find_action(&self, event: &KeyEvent) -> Option<Action> {
        self.shortcuts
            .iter()
            .find(|s| s.matches(event))
            .map(|s| s.action)
    }

    /// Translate a key event into a command for `session`
    pub fn command_for(&self, event: &KeyEvent, session: &ScanSession) -> Option<ControlCommand> {
        self.find_action(event)
            .map(|action| action.to_command(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Point, PointCloud};
    use crate::viewport::Viewport;

    fn session() -> ScanSession {
        ScanSession::new(
            PointCloud::grid(Point::default(), 3, 3, 1.0),
            Viewport::default(),
        )
    }

    fn press(key: Key) -> KeyEvent {
        KeyEvent::pressed(key, Modifiers::new())
    }

    #[test]
    fn test_shortcut_matching() {
        let shortcut = Shortcut::new(Key::Left, Modifiers::new(), Action::PanLeft);
        assert!(shortcut.matches(&press(Key::Left)));
        assert!(!shortcut.matches(&KeyEvent::released(Key::Left, Modifiers::new())));
        assert!(!shortcut.matches(&KeyEvent::pressed(
            Key::Left,
            Modifiers::new().with_ctrl()
        )));
    }

    #[test]
    fn test_arrow_keys_use_step_sizes() {
        let session = session();
        let bindings = KeyBindings::default();

        assert_eq!(
            bindings.command_for(&press(Key::Left), &session),
            Some(ControlCommand::Pan { dx: -0.1, dy: 0.0 })
        );
        assert_eq!(
            bindings.command_for(&press(Key::Down), &session),
            Some(ControlCommand::Pan { dx: 0.0, dy: -0.1 })
        );
    }

    #[test]
    fn test_arrow_keys_pan_session() {
        let mut session = session();
        let bindings = KeyBindings::default();

        let command = bindings.command_for(&press(Key::Right), &session).unwrap();
        session.apply(command).unwrap();
        // center -= dx
        assert!((session.viewport().center_x - -0.1).abs() < 1e-12);

        let command = bindings.command_for(&press(Key::Down), &session).unwrap();
        session.apply(command).unwrap();
        assert!((session.viewport().center_y - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_plus_zooms_in() {
        let mut session = session();
        let plus = KeyEvent::pressed(Key::Plus, Modifiers::new().with_shift());
        let command = KeyBindings::default().command_for(&plus, &session).unwrap();
        session.apply(command).unwrap();
        assert!((session.viewport().zoom_radius() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_toggle_manual_record_flips() {
        let mut session = session();
        let action = Action::ToggleManualRecord;
        session.apply(action.to_command(&session)).unwrap();
        assert!(session.manual_record_enabled());
        session.apply(action.to_command(&session)).unwrap();
        assert!(!session.manual_record_enabled());
    }

    #[test]
    fn test_collection_keys() {
        let session = session();
        let bindings = KeyBindings::default();
        assert_eq!(
            bindings.command_for(&press(Key::Space), &session),
            Some(ControlCommand::RecordVisible)
        );
        assert_eq!(
            bindings.command_for(&press(Key::Enter), &session),
            Some(ControlCommand::ConfirmCurve)
        );
        assert_eq!(
            bindings.command_for(&press(Key::Escape), &session),
            Some(ControlCommand::StopAutomation)
        );
    }

    #[test]
    fn test_unbound_key() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.find_action(&press(Key::Unknown(42))), None);
    }
}
