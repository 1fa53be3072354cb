//! # Operation Log
//!
//! Append-only record of the operations one editing session applied, in
//! application order. The log also owns the per-session table that routes
//! repeated style changes on one element into a single `SetStyle` entry.

use crate::errors::EditingResult;
use crate::operations::{Operation, SetStyle};
use scribe_dom::{Document, DomResult, NodeId};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct OperationLog {
    operations: Vec<Operation>,

    /// Element -> index of its consolidated `SetStyle` entry
    styled_elements: HashMap<NodeId, usize>,
}

impl OperationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Operation> {
        self.operations.get(index)
    }

    pub fn last(&self) -> Option<&Operation> {
        self.operations.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter()
    }

    pub fn as_slice(&self) -> &[Operation] {
        &self.operations
    }

    /// The `SetStyle` entry for `element`, created and appended on first
    /// touch so the entry keeps the position of the first style change.
    pub fn style_entry_mut(&mut self, doc: &Document, element: NodeId) -> EditingResult<&mut SetStyle> {
        let index = match self.styled_elements.get(&element) {
            Some(&index) => index,
            None => {
                let entry = SetStyle::new(doc, element)?;
                self.operations.push(Operation::SetStyle(entry));
                let index = self.operations.len() - 1;
                self.styled_elements.insert(element, index);
                index
            }
        };
        match &mut self.operations[index] {
            Operation::SetStyle(entry) => Ok(entry),
            _ => unreachable!("style table points at a non-style operation"),
        }
    }

    /// Undo every operation, newest first.
    pub fn undo_all(&self, doc: &mut Document) -> DomResult<()> {
        undo_operations(&self.operations, doc)
    }

    /// Redo every operation, oldest first.
    pub fn redo_all(&self, doc: &mut Document) -> DomResult<()> {
        redo_operations(&self.operations, doc)
    }

    /// Drop the style table and hand out the operations.
    pub fn into_operations(self) -> Vec<Operation> {
        self.operations
    }
}

pub(crate) fn undo_operations(operations: &[Operation], doc: &mut Document) -> DomResult<()> {
    for operation in operations.iter().rev() {
        operation.undo(doc)?;
    }
    Ok(())
}

pub(crate) fn redo_operations(operations: &[Operation], doc: &mut Document) -> DomResult<()> {
    for operation in operations {
        operation.redo(doc)?;
    }
    Ok(())
}
