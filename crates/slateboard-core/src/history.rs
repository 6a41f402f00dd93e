//! Undo/redo history of committed shape collections.

use crate::shapes::Shape;

/// Maximum number of undo states to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// Snapshot-based undo/redo stacks.
///
/// `record` takes the state *before* a change; `undo` and `redo` take the
/// current state and hand back the one to restore.
#[derive(Debug, Clone, Default)]
pub struct History {
    undo_stack: Vec<Vec<Shape>>,
    redo_stack: Vec<Vec<Shape>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push the pre-change state (call once per committed change).
    pub fn record(&mut self, before: Vec<Shape>) {
        self.undo_stack.push(before);

        // New changes invalidate the redo branch
        self.redo_stack.clear();

        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Undo the last change, returning the state to restore.
    pub fn undo(&mut self, current: Vec<Shape>) -> Option<Vec<Shape>> {
        let snapshot = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(snapshot)
    }

    /// Redo the last undone change, returning the state to restore.
    pub fn redo(&mut self, current: Vec<Shape>) -> Option<Vec<Shape>> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(snapshot)
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
