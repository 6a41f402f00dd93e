//! Input scripts: recorded pointer and key events replayed against an editor.
//!
//! A script is a JSON array of steps:
//! ```json
//! [
//!   { "type": "tool", "tool": "rectangle" },
//!   { "type": "down", "x": 0, "y": 0 },
//!   { "type": "move", "x": 120, "y": 80 },
//!   { "type": "up", "x": 120, "y": 80 },
//!   { "type": "key", "key": "g", "ctrl": true }
//! ]
//! ```

use serde::{Deserialize, Serialize};
use slateboard_core::{
    DocumentSnapshot, Editor, EditorEffect, KeyCommand, LayerError, Modifiers, PointerEvent, ToolKind,
};
use std::fmt;
use thiserror::Error;

/// One recorded input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptStep {
    Down {
        x: f64,
        y: f64,
        #[serde(flatten)]
        modifiers: Modifiers,
    },
    Move {
        x: f64,
        y: f64,
        #[serde(flatten)]
        modifiers: Modifiers,
    },
    Up {
        x: f64,
        y: f64,
        #[serde(flatten)]
        modifiers: Modifiers,
    },
    /// A key press, mapped through the standard shortcuts.
    Key {
        key: String,
        #[serde(flatten)]
        modifiers: Modifiers,
    },
    /// A command issued directly (menu item, toolbar button).
    Command { command: KeyCommand },
    Tool { tool: ToolKind },
    Zoom { ratio: f64 },
    Cancel,
    /// A snapshot arriving from another client.
    Remote { snapshot: DocumentSnapshot },
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("step {index}: no command bound to key {key:?}")]
    UnboundKey { index: usize, key: String },
    #[error("step {index}: zoom ratio must be positive, got {ratio}")]
    BadZoom { index: usize, ratio: f64 },
}

/// Parse a script from JSON.
pub fn parse(json: &str) -> Result<Vec<ScriptStep>, serde_json::Error> {
    serde_json::from_str(json)
}

/// What a replay did to the board.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayReport {
    pub steps: usize,
    pub commits: usize,
    pub restores: usize,
    pub rejected: Vec<(usize, LayerError)>,
}

impl fmt::Display for ReplayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} steps, {} commits, {} undo/redo",
            self.steps, self.commits, self.restores
        )?;
        for (index, err) in &self.rejected {
            write!(f, "\n  step {}: rejected: {}", index, err)?;
        }
        Ok(())
    }
}

fn pointer(x: f64, y: f64, modifiers: Modifiers) -> PointerEvent {
    PointerEvent::new(x, y).with_modifiers(modifiers)
}

/// Feed every step to the editor in order.
pub fn replay(editor: &mut Editor, steps: &[ScriptStep]) -> Result<ReplayReport, ScriptError> {
    let mut report = ReplayReport::default();

    for (index, step) in steps.iter().enumerate() {
        let effects = match step {
            ScriptStep::Down { x, y, modifiers } => editor.pointer_down(pointer(*x, *y, *modifiers)),
            ScriptStep::Move { x, y, modifiers } => editor.pointer_move(pointer(*x, *y, *modifiers)),
            ScriptStep::Up { x, y, modifiers } => editor.pointer_up(pointer(*x, *y, *modifiers)),
            ScriptStep::Key { key, modifiers } => match KeyCommand::from_key(key, *modifiers) {
                Some(command) => editor.key(command),
                None => {
                    return Err(ScriptError::UnboundKey {
                        index,
                        key: key.clone(),
                    });
                }
            },
            ScriptStep::Command { command } => editor.key(*command),
            ScriptStep::Tool { tool } => editor.set_tool(*tool),
            ScriptStep::Zoom { ratio } => {
                if *ratio <= 0.0 || !ratio.is_finite() {
                    return Err(ScriptError::BadZoom { index, ratio: *ratio });
                }
                editor.set_zoom(*ratio);
                Vec::new()
            }
            ScriptStep::Cancel => editor.cancel_gesture(),
            ScriptStep::Remote { snapshot } => editor.apply_remote(snapshot.clone()),
        };

        for effect in effects {
            match effect {
                EditorEffect::Committed(shapes) => {
                    log::debug!("step {}: committed {} shapes", index, shapes.len());
                    report.commits += 1;
                }
                EditorEffect::Restored(_) => report.restores += 1,
                EditorEffect::Rejected(err) => report.rejected.push((index, err)),
                EditorEffect::SelectionChanged(_) | EditorEffect::SetCursor(_) | EditorEffect::RenderNeeded => {}
            }
        }
        report.steps += 1;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use slateboard_core::{Document, EditorConfig, SnapMode, check_z_order};

    fn editor() -> Editor {
        let mut config = EditorConfig::default();
        config.snap.mode = SnapMode::None;
        Editor::new(Document::new(), config)
    }

    #[test]
    fn test_parse_steps() {
        let steps = parse(
            r#"[
                {"type": "tool", "tool": "ellipse"},
                {"type": "down", "x": 1, "y": 2, "shift": true},
                {"type": "command", "command": "bring_to_front"},
                {"type": "cancel"}
            ]"#,
        )
        .unwrap();

        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0], ScriptStep::Tool { tool: ToolKind::Ellipse });
        assert_eq!(
            steps[1],
            ScriptStep::Down {
                x: 1.0,
                y: 2.0,
                modifiers: Modifiers::SHIFT
            }
        );
        assert_eq!(steps[3], ScriptStep::Cancel);
    }

    #[test]
    fn test_replay_draw_and_group() {
        let steps = parse(
            r#"[
                {"type": "tool", "tool": "rectangle"},
                {"type": "down", "x": 0, "y": 0},
                {"type": "move", "x": 50, "y": 50},
                {"type": "up", "x": 50, "y": 50},
                {"type": "tool", "tool": "rectangle"},
                {"type": "down", "x": 100, "y": 0},
                {"type": "move", "x": 150, "y": 50},
                {"type": "up", "x": 150, "y": 50},
                {"type": "key", "key": "a", "ctrl": true},
                {"type": "key", "key": "g", "ctrl": true}
            ]"#,
        )
        .unwrap();

        let mut editor = editor();
        let report = replay(&mut editor, &steps).unwrap();

        assert_eq!(report.steps, 10);
        assert_eq!(report.commits, 3);
        assert!(report.rejected.is_empty());
        assert_eq!(editor.shapes().len(), 1);
        assert!(editor.shapes()[0].is_component());
        check_z_order(editor.shapes()).unwrap();
    }

    #[test]
    fn test_replay_records_rejection() {
        let steps = parse(r#"[{"type": "command", "command": "group"}]"#).unwrap();
        let mut editor = editor();
        let report = replay(&mut editor, &steps).unwrap();

        assert_eq!(report.commits, 0);
        assert_eq!(report.rejected, vec![(0, LayerError::EmptySelection)]);
        assert!(report.to_string().contains("rejected"));
    }

    #[test]
    fn test_unbound_key_stops_replay() {
        let steps = parse(r#"[{"type": "key", "key": "q"}]"#).unwrap();
        let mut editor = editor();
        let result = replay(&mut editor, &steps);
        assert!(matches!(result, Err(ScriptError::UnboundKey { index: 0, .. })));
    }

    #[test]
    fn test_bad_zoom() {
        let steps = vec![ScriptStep::Zoom { ratio: 0.0 }];
        let mut editor = editor();
        assert!(matches!(
            replay(&mut editor, &steps),
            Err(ScriptError::BadZoom { index: 0, .. })
        ));
    }
}
