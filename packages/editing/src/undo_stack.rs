//! # Undo/Redo Stack
//!
//! Keeps the records of finished editing contexts.
//!
//! ## Design
//!
//! - One record per command; its operations are undone newest first
//! - Undo moves the record to the redo stack and yields its starting selection
//! - Redo replays the operations and yields the ending selection
//! - New records clear the redo stack
//! - Records without operations are not kept
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//! let mut context = EditingContext::new(&mut doc, "insertText", selection);
//! // ... mutate through the context ...
//! stack.push(context.finish());
//!
//! let restored = stack.undo(&mut doc)?;
//! let redone = stack.redo(&mut doc)?;
//! ```

use crate::context::EditRecord;
use crate::log::{redo_operations, undo_operations};
use crate::selection::Selection;
use scribe_dom::{Document, DomResult};
use tracing::debug;

/// Undo/redo stack of command records
#[derive(Debug)]
pub struct UndoStack {
    /// Applied records (most recent last)
    undo_stack: Vec<EditRecord>,

    /// Undone records (most recent last)
    redo_stack: Vec<EditRecord>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    /// Create an undo stack with custom max levels
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
        }
    }

    /// Record a finished command. Returns false when the record was empty
    /// and nothing was kept.
    pub fn push(&mut self, record: EditRecord) -> bool {
        if record.operations.is_empty() {
            return false;
        }
        debug!(command = %record.name, operations = record.operations.len(), "push undo record");
        self.undo_stack.push(record);

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // A new edit invalidates the undone future
        self.redo_stack.clear();
        true
    }

    /// Undo the most recent record. Returns the selection from before that
    /// command ran, or `None` when there was nothing to undo.
    pub fn undo(&mut self, doc: &mut Document) -> DomResult<Option<Selection>> {
        let Some(record) = self.undo_stack.pop() else {
            return Ok(None);
        };
        debug!(command = %record.name, "undo");
        if let Err(error) = undo_operations(&record.operations, doc) {
            self.undo_stack.push(record);
            return Err(error);
        }
        let selection = record.starting_selection;
        self.redo_stack.push(record);
        Ok(Some(selection))
    }

    /// Redo the most recently undone record. Returns its ending selection
    /// (its starting one if the command never set an ending selection).
    pub fn redo(&mut self, doc: &mut Document) -> DomResult<Option<Selection>> {
        let Some(record) = self.redo_stack.pop() else {
            return Ok(None);
        };
        debug!(command = %record.name, "redo");
        if let Err(error) = redo_operations(&record.operations, doc) {
            self.redo_stack.push(record);
            return Err(error);
        }
        let selection = record.ending_selection.unwrap_or(record.starting_selection);
        self.undo_stack.push(record);
        Ok(Some(selection))
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the number of undo levels available
    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of redo levels available
    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drop the undone records. Used when the tree changed outside a
    /// pushed record.
    pub fn clear_redo(&mut self) {
        self.redo_stack.clear();
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Command name of the next undo
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|record| record.name.as_str())
    }

    /// Command name of the next redo
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|record| record.name.as_str())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
