//! Input events delivered to the editor.
//!
//! Pointer positions are already in board (world) coordinates; the viewport
//! transform happens before events reach the core.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    /// True when a click should add to / toggle the selection.
    pub fn multi_select(&self) -> bool {
        self.shift || self.ctrl || self.meta
    }

    /// Platform command key (Ctrl or Cmd).
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A normalized pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub point: Point,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            point: Point::new(x, y),
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Discrete keyboard commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCommand {
    Delete,
    Group,
    Ungroup,
    BringToFront,
    SendToBack,
    BringForward,
    SendBackward,
    Undo,
    Redo,
    /// Abort the gesture in progress.
    Cancel,
    SelectAll,
}

impl KeyCommand {
    /// Map a key name plus modifiers to a command, using the usual
    /// whiteboard shortcuts.
    pub fn from_key(key: &str, modifiers: Modifiers) -> Option<Self> {
        let cmd = modifiers.command();
        let shift = modifiers.shift;
        let key = key.to_ascii_lowercase();
        match key.as_str() {
            "delete" | "backspace" => Some(KeyCommand::Delete),
            "escape" => Some(KeyCommand::Cancel),
            "g" if cmd && shift => Some(KeyCommand::Ungroup),
            "g" if cmd => Some(KeyCommand::Group),
            "z" if cmd && shift => Some(KeyCommand::Redo),
            "z" if cmd => Some(KeyCommand::Undo),
            "y" if cmd => Some(KeyCommand::Redo),
            "a" if cmd => Some(KeyCommand::SelectAll),
            "]" if cmd && shift => Some(KeyCommand::BringToFront),
            "]" if cmd => Some(KeyCommand::BringForward),
            "[" if cmd && shift => Some(KeyCommand::SendToBack),
            "[" if cmd => Some(KeyCommand::SendBackward),
            _ => None,
        }
    }
}
