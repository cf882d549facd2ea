//! Undo/redo management for document edits.
//!
//! Provides:
//! - `UndoManager` trait for abstracting undo implementations
//! - `History`, the bounded step stack used by [`RichDocument`](crate::RichDocument)
//!
//! A step holds every op of one user edit or one committed transaction, so
//! undoing it reverts all of them together.

use smol_str::SmolStr;

use crate::marks::Marks;
use crate::types::{BlockId, BlockKind, Caret};

/// Trait for managing undo/redo operations.
///
/// Implementations must actually perform the undo/redo, not just track state.
pub trait UndoManager {
    /// Check if undo is available.
    fn can_undo(&self) -> bool;

    /// Check if redo is available.
    fn can_redo(&self) -> bool;

    /// Perform undo. Returns true if successful.
    fn undo(&mut self) -> bool;

    /// Perform redo. Returns true if successful.
    fn redo(&mut self) -> bool;

    /// Clear all undo/redo history.
    fn clear_history(&mut self);
}

/// A recorded edit operation.
#[derive(Debug, Clone)]
pub(crate) enum EditOp {
    /// Text replaced at `pos` (either side may be empty).
    Text {
        block: BlockId,
        pos: usize,
        deleted: SmolStr,
        inserted: SmolStr,
        marks_before: Marks,
        marks_after: Marks,
    },
    Kind {
        block: BlockId,
        before: BlockKind,
        after: BlockKind,
    },
    Marks {
        block: BlockId,
        before: Marks,
        after: Marks,
    },
    /// `block` split at `at`; the tail became `new_block`.
    Split {
        block: BlockId,
        at: usize,
        new_block: BlockId,
        new_kind: BlockKind,
        marks_before: Marks,
    },
}

/// One undoable unit.
#[derive(Debug, Clone)]
pub(crate) struct UndoStep {
    pub ops: Vec<EditOp>,
    pub caret_before: Caret,
    pub caret_after: Caret,
}

#[derive(Debug, Clone)]
pub(crate) struct History {
    undo_stack: Vec<UndoStep>,
    redo_stack: Vec<UndoStep>,
    max_steps: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(100)
    }
}

impl History {
    pub fn new(max_steps: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_steps,
        }
    }

    /// Record a new step. Clears redo.
    pub fn record(&mut self, step: UndoStep) {
        self.redo_stack.clear();
        self.undo_stack.push(step);

        // Trim if over max
        while self.undo_stack.len() > self.max_steps {
            self.undo_stack.remove(0);
        }
    }

    pub fn pop_undo(&mut self) -> Option<UndoStep> {
        self.undo_stack.pop()
    }

    pub fn pop_redo(&mut self) -> Option<UndoStep> {
        self.redo_stack.pop()
    }

    pub fn push_redo(&mut self, step: UndoStep) {
        self.redo_stack.push(step);
    }

    /// Push back a redone step without touching the redo stack.
    pub fn push_undo(&mut self, step: UndoStep) {
        self.undo_stack.push(step);
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
