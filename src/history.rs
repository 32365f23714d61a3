//! Undo/redo history over full-text snapshots
//!
//! Maintains two stacks: snapshots that can be restored by undo and
//! snapshots that can be restored by redo. Every new edit clears the redo
//! stack (branching history is not supported). The undo stack is bounded;
//! when it grows past [`UNDO_LIMIT`] the oldest snapshot is dropped.
//!
//! ```text
//! history.push(text_before_edit);
//! // apply the edit
//! if let Some(previous) = history.undo(&current_text) { /* restore */ }
//! ```

use std::collections::VecDeque;

/// Maximum number of undo snapshots retained
pub const UNDO_LIMIT: usize = 200;

/// Linear undo/redo history for the document
#[derive(Debug, Default)]
pub struct History {
    undo_stack: VecDeque<String>,
    redo_stack: Vec<String>,
}

impl History {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the buffer state from before an edit
    ///
    /// A snapshot equal to the most recent undo entry is not stored twice.
    /// The redo stack is cleared either way.
    pub fn push(&mut self, previous: impl Into<String>) {
        let previous = previous.into();
        if self.undo_stack.back() != Some(&previous) {
            self.undo_stack.push_back(previous);
            if self.undo_stack.len() > UNDO_LIMIT {
                self.undo_stack.pop_front();
            }
        }
        self.redo_stack.clear();
    }

    /// Step back one edit
    ///
    /// `current` is the buffer as it is now; it becomes redoable. Returns
    /// `None` when there is nothing to undo.
    pub fn undo(&mut self, current: &str) -> Option<String> {
        let previous = self.undo_stack.pop_back()?;
        self.redo_stack.push(current.to_string());
        Some(previous)
    }

    /// Step forward one undone edit
    ///
    /// `current` is the buffer as it is now; it becomes undoable again.
    /// Returns `None` when there is nothing to redo.
    pub fn redo(&mut self, current: &str) -> Option<String> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push_back(current.to_string());
        if self.undo_stack.len() > UNDO_LIMIT {
            self.undo_stack.pop_front();
        }
        Some(next)
    }

    /// Forget everything (the document was replaced)
    pub fn reset(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }
}
