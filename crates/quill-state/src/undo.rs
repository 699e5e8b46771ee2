//! Snapshot-based undo/redo.
//!
//! Discrete normal-mode edits push one snapshot each; a contiguous insert
//! run coalesces into a single snapshot taken lazily at its first
//! mutation (leaving insert mode ends the run). Whole-buffer snapshots
//! are acceptable at this layer's scale; differential storage can replace
//! them behind the same interface.

use quill_text::{Buffer, Position};

pub const UNDO_HISTORY_MAX: usize = 100;

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub buffer: Buffer,
    pub cursor: Position,
}

#[derive(Debug, Default)]
pub struct UndoEngine {
    undo: Vec<Snapshot>,
    redo: Vec<Snapshot>,
}

impl UndoEngine {
    pub fn push_snapshot(&mut self, buffer: Buffer, cursor: Position) {
        if self.undo.len() >= UNDO_HISTORY_MAX {
            self.undo.remove(0);
        }
        self.undo.push(Snapshot { buffer, cursor });
        self.redo.clear();
        tracing::trace!(target: "state.undo", depth = self.undo.len(), "push_snapshot");
    }

    /// Swap the current content for the most recent snapshot.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let snap = self.undo.pop()?;
        self.redo.push(current);
        tracing::trace!(target: "state.undo", depth = self.undo.len(), "undo_pop");
        Some(snap)
    }

    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let snap = self.redo.pop()?;
        self.undo.push(current);
        tracing::trace!(target: "state.undo", depth = self.redo.len(), "redo_pop");
        Some(snap)
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }
}
