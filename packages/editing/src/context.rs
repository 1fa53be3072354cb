//! # Editing Context
//!
//! The only way commands mutate the tree. Every mutation builds the matching
//! [`Operation`], applies it right away and appends it to the session's log,
//! so the log is always an exact, undoable record of what the command did.
//!
//! ## Lifecycle
//!
//! ```text
//! new(starting selection) → mutations / splits → set_ending_selection → finish
//!                                                 (frozen from here on)
//! ```
//!
//! The context holds the document's only mutable borrow while it lives, so
//! two live contexts against one tree cannot exist.

use crate::config::EditingConfig;
use crate::errors::{EditingError, EditingResult};
use crate::log::OperationLog;
use crate::operations::{
    require_attribute_name, require_child_of, AppendChild, InsertBefore, Operation, RemoveAttribute,
    RemoveChild, ReplaceChild, SetAttribute, SplitText,
};
use crate::selection::{BoundaryPoint, Selection};
use scribe_dom::{Document, NodeId};
use std::borrow::Cow;
use tracing::{debug, trace, warn};

/// What a finished session leaves behind: the unit pushed on the undo stack.
#[derive(Debug, Clone)]
pub struct EditRecord {
    /// Name of the command that produced the record
    pub name: String,

    /// Operations in application order
    pub operations: Vec<Operation>,

    /// Selection to restore on undo
    pub starting_selection: Selection,

    /// Selection to restore on redo (if the command set one)
    pub ending_selection: Option<Selection>,
}

pub struct EditingContext<'doc> {
    document: &'doc mut Document,
    config: Cow<'doc, EditingConfig>,
    name: String,
    log: OperationLog,
    starting_selection: Selection,
    ending_selection: Option<Selection>,
}

impl<'doc> EditingContext<'doc> {
    pub fn new(document: &'doc mut Document, name: impl Into<String>, starting_selection: Selection) -> Self {
        Self::build(document, Cow::Owned(EditingConfig::default()), name.into(), starting_selection)
    }

    pub fn with_config(
        document: &'doc mut Document,
        config: &'doc EditingConfig,
        name: impl Into<String>,
        starting_selection: Selection,
    ) -> Self {
        Self::build(document, Cow::Borrowed(config), name.into(), starting_selection)
    }

    fn build(
        document: &'doc mut Document,
        config: Cow<'doc, EditingConfig>,
        name: String,
        starting_selection: Selection,
    ) -> Self {
        debug!(context = %name, "editing context opened");
        Self {
            document,
            config,
            name,
            log: OperationLog::new(),
            starting_selection,
            ending_selection: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read-only view of the tree; mutations go through the context.
    pub fn document(&self) -> &Document {
        self.document
    }

    pub fn config(&self) -> &EditingConfig {
        &self.config
    }

    pub fn operations(&self) -> &[Operation] {
        self.log.as_slice()
    }

    pub fn log(&self) -> &OperationLog {
        &self.log
    }

    /// Selection before the command ran; restored by undo.
    pub fn starting_selection(&self) -> Selection {
        self.starting_selection
    }

    /// Selection after the command ran; restored by redo.
    pub fn ending_selection(&self) -> EditingResult<Selection> {
        self.ending_selection.ok_or_else(|| {
            EditingError::protocol(&self.name, "You should set ending selection at end of command.")
        })
    }

    pub fn is_frozen(&self) -> bool {
        self.ending_selection.is_some()
    }

    /// Turn the session into its undo record. Works on an unfrozen context
    /// too, so a failed command's partial log can still be undone.
    pub fn finish(self) -> EditRecord {
        debug!(context = %self.name, operations = self.log.len(), "editing context finished");
        EditRecord {
            name: self.name,
            operations: self.log.into_operations(),
            starting_selection: self.starting_selection,
            ending_selection: self.ending_selection,
        }
    }

    pub(crate) fn assert_editing_in_progress(&self) -> EditingResult<()> {
        if self.ending_selection.is_none() {
            return Ok(());
        }
        warn!(context = %self.name, "mutation attempted after ending selection was set");
        Err(EditingError::protocol(
            &self.name,
            "You can't mutate DOM tree once you set ending selection.",
        ))
    }

    fn record(&mut self, operation: Operation) -> EditingResult<()> {
        trace!(context = %self.name, operation = operation.name(), "apply");
        operation.execute(self.document)?;
        self.log.push(operation);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Node creation (not logged: new nodes are detached)
    // ------------------------------------------------------------------

    pub fn create_element(&mut self, tag: &str) -> EditingResult<NodeId> {
        Ok(self.document.create_element(tag)?)
    }

    pub fn create_text_node(&mut self, text: &str) -> NodeId {
        self.document.create_text_node(text)
    }

    pub fn clone_node(&mut self, node: NodeId) -> EditingResult<NodeId> {
        Ok(self.document.clone_node(node)?)
    }

    /// True when walking parent links from `node` reaches the document node.
    pub fn in_document(&self, node: NodeId) -> bool {
        let root = self.document.root();
        node == root || self.document.is_descendant_of(node, root)
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Append `child` to `parent`. A child that already has a parent is
    /// removed from it first, which is logged as its own operation.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> EditingResult<()> {
        self.assert_editing_in_progress()?;
        if let Some(old_parent) = self.document.parent(child) {
            self.remove_child(old_parent, child)?;
        }
        let operation = AppendChild::new(self.document, parent, child)?;
        self.record(Operation::AppendChild(operation))
    }

    /// Insert `child` before `reference`; without a reference this is
    /// `append_child`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> EditingResult<()> {
        self.assert_editing_in_progress()?;
        let Some(reference) = reference else {
            return self.append_child(parent, child);
        };
        self.require_reference(parent, reference)?;
        if let Some(old_parent) = self.document.parent(child) {
            self.remove_child(old_parent, child)?;
        }
        let operation = InsertBefore::new(self.document, parent, child, reference)?;
        self.record(Operation::InsertBefore(operation))
    }

    pub fn insert_after(&mut self, parent: NodeId, child: NodeId, reference: NodeId) -> EditingResult<()> {
        self.assert_editing_in_progress()?;
        self.require_reference(parent, reference)?;
        if let Some(old_parent) = self.document.parent(child) {
            self.remove_child(old_parent, child)?;
        }
        let next = self.document.next_sibling(reference);
        self.insert_before(parent, child, next)
    }

    fn require_reference(&self, parent: NodeId, reference: NodeId) -> EditingResult<()> {
        if self.document.parent(reference) == Some(parent) {
            return Ok(());
        }
        Err(EditingError::invalid_argument(format!(
            "Parent of refChild {} must be {}",
            self.document.describe(reference),
            self.document.describe(parent)
        )))
    }

    /// Move every child of `old_parent`, in order, to just before `reference`.
    pub fn insert_children_before(&mut self, old_parent: NodeId, reference: NodeId) -> EditingResult<()> {
        let new_parent = self.document.parent(reference).ok_or_else(|| {
            EditingError::invalid_argument(format!(
                "refNode {} must have a parent.",
                self.document.describe(reference)
            ))
        })?;
        let mut child = self.document.first_child(old_parent);
        while let Some(current) = child {
            child = self.document.next_sibling(current);
            self.insert_before(new_parent, current, Some(reference))?;
        }
        Ok(())
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> EditingResult<()> {
        self.assert_editing_in_progress()?;
        let operation = RemoveChild::new(self.document, parent, child)?;
        self.record(Operation::RemoveChild(operation))
    }

    pub fn replace_child(&mut self, parent: NodeId, new_child: NodeId, old_child: NodeId) -> EditingResult<()> {
        self.assert_editing_in_progress()?;
        require_child_of(self.document, parent, old_child)?;
        if let Some(old_parent) = self.document.parent(new_child) {
            self.remove_child(old_parent, new_child)?;
        }
        let operation = ReplaceChild::new(self.document, parent, new_child, old_child)?;
        self.record(Operation::ReplaceChild(operation))
    }

    // ------------------------------------------------------------------
    // Attributes and style
    // ------------------------------------------------------------------

    pub fn set_attribute(&mut self, element: NodeId, name: &str, value: &str) -> EditingResult<()> {
        self.assert_editing_in_progress()?;
        let operation = SetAttribute::new(self.document, element, name, value)?;
        self.record(Operation::SetAttribute(operation))
    }

    /// Remove an attribute; nothing is recorded when it is already absent.
    pub fn remove_attribute(&mut self, element: NodeId, name: &str) -> EditingResult<()> {
        self.assert_editing_in_progress()?;
        require_attribute_name(name)?;
        if !self.document.has_attribute(element, name) {
            return Ok(());
        }
        let operation = RemoveAttribute::new(self.document, element, name)?;
        self.record(Operation::RemoveAttribute(operation))
    }

    /// Assign an inline style property. All style changes to one element in
    /// this session share the log entry created by the first of them.
    pub fn set_style(&mut self, element: NodeId, property: &str, value: &str) -> EditingResult<()> {
        self.assert_editing_in_progress()?;
        if !scribe_dom::style::is_valid_property_name(property) {
            return Err(EditingError::invalid_argument(format!(
                "Unknown CSS property name {:?}",
                property
            )));
        }
        trace!(context = %self.name, property, value, "setStyle");
        let document = &mut *self.document;
        let entry = self.log.style_entry_mut(document, element)?;
        entry.set_property(property, value)?;
        entry.redo(document)?;
        Ok(())
    }

    pub fn remove_style(&mut self, element: NodeId, property: &str) -> EditingResult<()> {
        self.set_style(element, property, "")
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    /// Split a text node at a character offset and return the new node that
    /// holds the suffix.
    pub fn split_text(&mut self, node: NodeId, offset: usize) -> EditingResult<NodeId> {
        self.assert_editing_in_progress()?;
        if !self.document.is_text(node) {
            return Err(EditingError::invalid_argument(format!(
                "{} must be a text node",
                self.document.describe(node)
            )));
        }
        let max = self.document.max_offset(node);
        if offset > max {
            return Err(EditingError::InvalidOffset {
                node: self.document.describe(node),
                offset,
                max,
            });
        }
        let new_node = self.document.split_text(node, offset)?;
        let operation = SplitText::new(self.document, node, new_node)?;
        trace!(context = %self.name, offset, "splitText");
        self.log.push(Operation::SplitText(operation));
        Ok(new_node)
    }

    // ------------------------------------------------------------------
    // Ending selection
    // ------------------------------------------------------------------

    /// Set the selection the command ends with. Freezes the session: every
    /// later mutation fails with a protocol violation.
    pub fn set_ending_selection(&mut self, selection: Selection) -> EditingResult<()> {
        if self.ending_selection.is_some() {
            return Err(EditingError::DuplicateFinalization(self.name.clone()));
        }
        self.validate_boundary(selection.anchor())?;
        self.validate_boundary(selection.focus())?;
        debug!(context = %self.name, "ending selection set");
        self.ending_selection = Some(selection);
        Ok(())
    }

    fn validate_boundary(&self, point: BoundaryPoint) -> EditingResult<()> {
        if !self.in_document(point.node) {
            let parent = self
                .document
                .parent(point.node)
                .map(|parent| self.document.describe(parent))
                .unwrap_or_else(|| "none".to_string());
            return Err(EditingError::NodeNotInTree {
                node: format!("{} (parent={})", self.document.describe(point.node), parent),
            });
        }
        let max = self.document.max_offset(point.node);
        if point.offset > max {
            return Err(EditingError::InvalidOffset {
                node: self.document.describe(point.node),
                offset: point.offset,
                max,
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for EditingContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditingContext")
            .field("name", &self.name)
            .field("operations", &self.log.len())
            .field("starting_selection", &self.starting_selection)
            .field("ending_selection", &self.ending_selection)
            .finish()
    }
}
