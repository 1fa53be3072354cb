//! # Reversible Operations
//!
//! One variant per kind of tree mutation. Each variant captures, when it is
//! constructed, exactly the pre-state it needs to invert itself, so
//! `redo` followed by `undo` leaves the tree as it was.
//!
//! ## Variants
//!
//! | Variant | redo | undo |
//! |---|---|---|
//! | `AppendChild` | append child to parent | remove child |
//! | `InsertBefore` | insert child before reference | remove child |
//! | `RemoveChild` | remove child | re-insert before the old next sibling |
//! | `ReplaceChild` | swap old child for new child | swap back |
//! | `SetAttribute` | set value | restore or remove the old value |
//! | `RemoveAttribute` | remove | restore the old value |
//! | `SetStyle` | restore original style text, replay all changes | restore original style text |
//! | `SplitText` | truncate text, insert the suffix node | re-join, remove the suffix node |

use crate::errors::{EditingError, EditingResult};
use scribe_dom::{is_valid_name, Document, DomError, DomResult, NodeId};

/// A recorded, reversible tree mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    AppendChild(AppendChild),
    InsertBefore(InsertBefore),
    RemoveChild(RemoveChild),
    ReplaceChild(ReplaceChild),
    SetAttribute(SetAttribute),
    RemoveAttribute(RemoveAttribute),
    SetStyle(SetStyle),
    SplitText(SplitText),
}

impl Operation {
    /// Apply the forward effect.
    pub fn redo(&self, doc: &mut Document) -> DomResult<()> {
        match self {
            Operation::AppendChild(op) => op.redo(doc),
            Operation::InsertBefore(op) => op.redo(doc),
            Operation::RemoveChild(op) => op.redo(doc),
            Operation::ReplaceChild(op) => op.redo(doc),
            Operation::SetAttribute(op) => op.redo(doc),
            Operation::RemoveAttribute(op) => op.redo(doc),
            Operation::SetStyle(op) => op.redo(doc),
            Operation::SplitText(op) => op.redo(doc),
        }
    }

    /// Apply the exact inverse of `redo`.
    pub fn undo(&self, doc: &mut Document) -> DomResult<()> {
        match self {
            Operation::AppendChild(op) => op.undo(doc),
            Operation::InsertBefore(op) => op.undo(doc),
            Operation::RemoveChild(op) => op.undo(doc),
            Operation::ReplaceChild(op) => op.undo(doc),
            Operation::SetAttribute(op) => op.undo(doc),
            Operation::RemoveAttribute(op) => op.undo(doc),
            Operation::SetStyle(op) => op.undo(doc),
            Operation::SplitText(op) => op.undo(doc),
        }
    }

    /// First application of a freshly constructed operation.
    pub fn execute(&self, doc: &mut Document) -> DomResult<()> {
        self.redo(doc)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::AppendChild(_) => "appendChild",
            Operation::InsertBefore(_) => "insertBefore",
            Operation::RemoveChild(_) => "removeChild",
            Operation::ReplaceChild(_) => "replaceChild",
            Operation::SetAttribute(_) => "setAttribute",
            Operation::RemoveAttribute(_) => "removeAttribute",
            Operation::SetStyle(_) => "setStyle",
            Operation::SplitText(_) => "splitText",
        }
    }
}

fn require_detached(doc: &Document, child: NodeId) -> EditingResult<()> {
    match doc.parent(child) {
        None => Ok(()),
        Some(parent) => Err(EditingError::invalid_argument(format!(
            "{} must not have a parent, but it is a child of {}",
            doc.describe(child),
            doc.describe(parent)
        ))),
    }
}

pub(crate) fn require_child_of(doc: &Document, parent: NodeId, child: NodeId) -> EditingResult<()> {
    let actual = doc.parent(child);
    if actual == Some(parent) {
        return Ok(());
    }
    let actual = actual
        .map(|node| doc.outer_html(node))
        .unwrap_or_else(|| "no parent".to_string());
    Err(EditingError::invalid_argument(format!(
        "A parent of {} must be {} instead of {}",
        doc.describe(child),
        doc.outer_html(parent),
        actual
    )))
}

fn require_element(doc: &Document, element: NodeId) -> EditingResult<()> {
    if doc.is_element(element) {
        Ok(())
    } else {
        Err(EditingError::invalid_argument(format!(
            "Node {} must be an Element",
            doc.describe(element)
        )))
    }
}

pub(crate) fn require_attribute_name(name: &str) -> EditingResult<()> {
    if !is_valid_name(name) {
        return Err(EditingError::invalid_argument(format!(
            "Attribute name {:?} is not a valid name",
            name
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppendChild {
    parent: NodeId,
    child: NodeId,
}

impl AppendChild {
    pub fn new(doc: &Document, parent: NodeId, child: NodeId) -> EditingResult<Self> {
        require_detached(doc, child)?;
        Ok(Self { parent, child })
    }

    pub fn parent(&self) -> NodeId {
        self.parent
    }

    pub fn child(&self) -> NodeId {
        self.child
    }

    fn redo(&self, doc: &mut Document) -> DomResult<()> {
        doc.append_child(self.parent, self.child)
    }

    fn undo(&self, doc: &mut Document) -> DomResult<()> {
        doc.remove_child(self.parent, self.child)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertBefore {
    parent: NodeId,
    child: NodeId,
    reference: NodeId,
}

impl InsertBefore {
    pub fn new(doc: &Document, parent: NodeId, child: NodeId, reference: NodeId) -> EditingResult<Self> {
        require_detached(doc, child)?;
        require_child_of(doc, parent, reference)?;
        Ok(Self {
            parent,
            child,
            reference,
        })
    }

    pub fn parent(&self) -> NodeId {
        self.parent
    }

    pub fn child(&self) -> NodeId {
        self.child
    }

    pub fn reference(&self) -> NodeId {
        self.reference
    }

    fn redo(&self, doc: &mut Document) -> DomResult<()> {
        doc.insert_before(self.parent, self.child, Some(self.reference))
    }

    fn undo(&self, doc: &mut Document) -> DomResult<()> {
        doc.remove_child(self.parent, self.child)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoveChild {
    parent: NodeId,
    child: NodeId,
    next_sibling: Option<NodeId>,
}

impl RemoveChild {
    pub fn new(doc: &Document, parent: NodeId, child: NodeId) -> EditingResult<Self> {
        require_child_of(doc, parent, child)?;
        Ok(Self {
            parent,
            child,
            next_sibling: doc.next_sibling(child),
        })
    }

    pub fn parent(&self) -> NodeId {
        self.parent
    }

    pub fn child(&self) -> NodeId {
        self.child
    }

    fn redo(&self, doc: &mut Document) -> DomResult<()> {
        doc.remove_child(self.parent, self.child)
    }

    fn undo(&self, doc: &mut Document) -> DomResult<()> {
        doc.insert_before(self.parent, self.child, self.next_sibling)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplaceChild {
    parent: NodeId,
    new_child: NodeId,
    old_child: NodeId,
}

impl ReplaceChild {
    pub fn new(doc: &Document, parent: NodeId, new_child: NodeId, old_child: NodeId) -> EditingResult<Self> {
        require_child_of(doc, parent, old_child)?;
        require_detached(doc, new_child)?;
        Ok(Self {
            parent,
            new_child,
            old_child,
        })
    }

    pub fn new_child(&self) -> NodeId {
        self.new_child
    }

    pub fn old_child(&self) -> NodeId {
        self.old_child
    }

    fn redo(&self, doc: &mut Document) -> DomResult<()> {
        doc.replace_child(self.parent, self.new_child, self.old_child)
    }

    fn undo(&self, doc: &mut Document) -> DomResult<()> {
        doc.replace_child(self.parent, self.old_child, self.new_child)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetAttribute {
    element: NodeId,
    name: String,
    new_value: String,
    old_value: Option<String>,
}

impl SetAttribute {
    pub fn new(doc: &Document, element: NodeId, name: &str, new_value: &str) -> EditingResult<Self> {
        require_element(doc, element)?;
        require_attribute_name(name)?;
        Ok(Self {
            element,
            name: name.to_string(),
            new_value: new_value.to_string(),
            old_value: doc.get_attribute(element, name).map(str::to_string),
        })
    }

    pub fn element(&self) -> NodeId {
        self.element
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn old_value(&self) -> Option<&str> {
        self.old_value.as_deref()
    }

    fn redo(&self, doc: &mut Document) -> DomResult<()> {
        doc.set_attribute(self.element, &self.name, &self.new_value)
    }

    fn undo(&self, doc: &mut Document) -> DomResult<()> {
        match &self.old_value {
            Some(old_value) => doc.set_attribute(self.element, &self.name, old_value),
            None => doc.remove_attribute(self.element, &self.name).map(|_| ()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoveAttribute {
    element: NodeId,
    name: String,
    old_value: String,
}

impl RemoveAttribute {
    pub fn new(doc: &Document, element: NodeId, name: &str) -> EditingResult<Self> {
        require_element(doc, element)?;
        let old_value = doc
            .get_attribute(element, name)
            .ok_or_else(|| EditingError::MissingAttribute {
                element,
                name: name.to_string(),
            })?;
        Ok(Self {
            element,
            name: name.to_string(),
            old_value: old_value.to_string(),
        })
    }

    pub fn element(&self) -> NodeId {
        self.element
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn redo(&self, doc: &mut Document) -> DomResult<()> {
        doc.remove_attribute(self.element, &self.name).map(|_| ())
    }

    fn undo(&self, doc: &mut Document) -> DomResult<()> {
        doc.set_attribute(self.element, &self.name, &self.old_value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyleChange {
    pub property: String,
    pub value: String,
}

/// Consolidated inline style changes of one element.
///
/// Every `set_style` on the same element within a session lands in the
/// same entry; `redo` always starts again from the style text captured at
/// construction, so calling it after each added change is safe.
#[derive(Debug, Clone, PartialEq)]
pub struct SetStyle {
    element: NodeId,
    old_style_text: Option<String>,
    changes: Vec<StyleChange>,
}

impl SetStyle {
    pub fn new(doc: &Document, element: NodeId) -> EditingResult<Self> {
        require_element(doc, element)?;
        Ok(Self {
            element,
            old_style_text: doc.get_attribute(element, "style").map(str::to_string),
            changes: Vec::new(),
        })
    }

    pub fn element(&self) -> NodeId {
        self.element
    }

    pub fn changes(&self) -> &[StyleChange] {
        &self.changes
    }

    pub fn old_style_text(&self) -> Option<&str> {
        self.old_style_text.as_deref()
    }

    /// Record one more property assignment. Takes effect on the next `redo`.
    pub fn set_property(&mut self, property: &str, value: &str) -> EditingResult<()> {
        if !scribe_dom::style::is_valid_property_name(property) {
            return Err(EditingError::invalid_argument(format!(
                "Unknown CSS property name {:?}",
                property
            )));
        }
        self.changes.push(StyleChange {
            property: property.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    pub(crate) fn redo(&self, doc: &mut Document) -> DomResult<()> {
        self.undo(doc)?;
        for change in &self.changes {
            doc.set_style_property(self.element, &change.property, &change.value)?;
        }
        Ok(())
    }

    pub(crate) fn undo(&self, doc: &mut Document) -> DomResult<()> {
        match &self.old_style_text {
            Some(style_text) => doc.set_attribute(self.element, "style", style_text),
            None => doc.remove_attribute(self.element, "style").map(|_| ()),
        }
    }
}

/// Records a text split the host tree already performed.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitText {
    text_node: NodeId,
    new_node: NodeId,
}

impl SplitText {
    pub fn new(doc: &Document, text_node: NodeId, new_node: NodeId) -> EditingResult<Self> {
        for node in [text_node, new_node] {
            if !doc.is_text(node) {
                return Err(EditingError::invalid_argument(format!(
                    "{} must be a text node",
                    doc.describe(node)
                )));
            }
        }
        Ok(Self {
            text_node,
            new_node,
        })
    }

    pub fn text_node(&self) -> NodeId {
        self.text_node
    }

    pub fn new_node(&self) -> NodeId {
        self.new_node
    }

    fn redo(&self, doc: &mut Document) -> DomResult<()> {
        let text = doc.text(self.text_node).ok_or(DomError::NotText(self.text_node))?;
        let suffix_len = doc
            .text(self.new_node)
            .ok_or(DomError::NotText(self.new_node))?
            .chars()
            .count();
        let keep = text.chars().count().saturating_sub(suffix_len);
        let prefix: String = text.chars().take(keep).collect();
        doc.set_text(self.text_node, &prefix)?;
        if let Some(parent) = doc.parent(self.text_node) {
            let next = doc.next_sibling(self.text_node);
            doc.insert_before(parent, self.new_node, next)?;
        }
        Ok(())
    }

    fn undo(&self, doc: &mut Document) -> DomResult<()> {
        let suffix = doc
            .text(self.new_node)
            .ok_or(DomError::NotText(self.new_node))?
            .to_string();
        let mut joined = doc
            .text(self.text_node)
            .ok_or(DomError::NotText(self.text_node))?
            .to_string();
        joined.push_str(&suffix);
        doc.set_text(self.text_node, &joined)?;
        if let Some(parent) = doc.parent(self.new_node) {
            doc.remove_child(parent, self.new_node)?;
        }
        Ok(())
    }
}
