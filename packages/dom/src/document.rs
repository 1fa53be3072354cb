//! # Document Tree
//!
//! Arena-backed mutable node tree: every node of a document lives in one
//! `indextree` arena and is addressed by a `NodeId`. Detached nodes stay in
//! the arena, so a node removed from the tree can be inserted again later
//! (which is what undo relies on).
//!
//! The mutation methods here are raw host mutations: they change the tree
//! immediately and record nothing. Recording happens one layer up.

use crate::content::is_phrasing_tag;
use crate::error::{DomError, DomResult};
use crate::style;
use indextree::{Arena, NodeId};
use std::collections::BTreeMap;

/// What goes in each arena slot
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    /// Document root, parent of all top-level nodes
    Document,
    /// Element with tag and attributes
    Element(ElementData),
    /// Character content
    Text(String),
}

/// Element data (tag + attributes)
#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    tag: String,
    attributes: BTreeMap<String, String>,
}

impl ElementData {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }
}

/// Mutable document tree
///
/// Removing a node only detaches it. Its arena slot is kept for the life of
/// the document so logged operations can put it back on undo; memory grows
/// with the number of nodes ever created.
#[derive(Debug, Clone)]
pub struct Document {
    arena: Arena<NodeData>,
    root: NodeId,
}

impl Document {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(NodeData::Document);
        Self { arena, root }
    }

    /// The document node. It is never detached.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.arena
            .get(id)
            .filter(|node| !node.is_removed())
            .map(|node| node.get())
    }

    // ------------------------------------------------------------------
    // Classification
    // ------------------------------------------------------------------

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.data(id), Some(NodeData::Text(_)))
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.data(id), Some(NodeData::Element(_)))
    }

    pub fn is_document(&self, id: NodeId) -> bool {
        matches!(self.data(id), Some(NodeData::Document))
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.data(id) {
            Some(NodeData::Element(element)) => Some(element),
            _ => None,
        }
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(ElementData::tag)
    }

    /// Text nodes and inline-level elements are phrasing content.
    pub fn is_phrasing(&self, id: NodeId) -> bool {
        match self.data(id) {
            Some(NodeData::Text(_)) => true,
            Some(NodeData::Element(element)) => is_phrasing_tag(element.tag()),
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|node| node.parent())
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|node| node.first_child())
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|node| node.last_child())
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|node| node.next_sibling())
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|node| node.previous_sibling())
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.first_child(id), move |&child| self.next_sibling(child))
    }

    /// Strict ancestors, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&ancestor| self.parent(ancestor))
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).count()
    }

    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children(id).nth(index)
    }

    /// Position of `id` among its siblings.
    pub fn node_index(&self, id: NodeId) -> usize {
        std::iter::successors(self.previous_sibling(id), |&sibling| {
            self.previous_sibling(sibling)
        })
        .count()
    }

    /// Largest valid boundary offset: character length for text, child
    /// count for everything else.
    pub fn max_offset(&self, id: NodeId) -> usize {
        match self.data(id) {
            Some(NodeData::Text(text)) => text.chars().count(),
            Some(_) => self.child_count(id),
            None => 0,
        }
    }

    /// True when `ancestor` is a strict ancestor of `id`.
    pub fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(id).any(|candidate| candidate == ancestor)
    }

    /// True when `id` is `container` or one of its descendants.
    pub fn contains(&self, container: NodeId, id: NodeId) -> bool {
        container == id || self.is_descendant_of(id, container)
    }

    /// Next node in pre-order.
    pub fn next_node(&self, id: NodeId) -> Option<NodeId> {
        self.first_child(id)
            .or_else(|| self.next_node_skipping_children(id))
    }

    /// Next node in pre-order that is not a descendant of `id`.
    pub fn next_node_skipping_children(&self, id: NodeId) -> Option<NodeId> {
        let mut runner = Some(id);
        while let Some(node) = runner {
            if let Some(sibling) = self.next_sibling(node) {
                return Some(sibling);
            }
            runner = self.parent(node);
        }
        None
    }

    // ------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------

    pub fn create_element(&mut self, tag: &str) -> DomResult<NodeId> {
        if !is_valid_name(tag) {
            return Err(DomError::InvalidCharacter(tag.to_string()));
        }
        Ok(self.arena.new_node(NodeData::Element(ElementData::new(tag))))
    }

    pub fn create_text_node(&mut self, text: &str) -> NodeId {
        self.arena.new_node(NodeData::Text(text.to_string()))
    }

    /// Shallow clone: same tag and attributes (or same text), no children,
    /// no parent.
    pub fn clone_node(&mut self, id: NodeId) -> DomResult<NodeId> {
        let data = self.data(id).cloned().ok_or(DomError::Removed(id))?;
        if matches!(data, NodeData::Document) {
            return Err(DomError::hierarchy("the document node cannot be cloned"));
        }
        Ok(self.arena.new_node(data))
    }

    // ------------------------------------------------------------------
    // Attributes and style
    // ------------------------------------------------------------------

    fn element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        match self.arena.get_mut(id).map(|node| node.get_mut()) {
            Some(NodeData::Element(element)) => Ok(element),
            _ => Err(DomError::NotAnElement(id)),
        }
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)
            .and_then(|element| element.attributes.get(&name.to_ascii_lowercase()))
            .map(String::as_str)
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.get_attribute(id, name).is_some()
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        if !is_valid_name(name) {
            return Err(DomError::InvalidCharacter(name.to_string()));
        }
        self.element_mut(id)?
            .attributes
            .insert(name.to_ascii_lowercase(), value.to_string());
        Ok(())
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<Option<String>> {
        Ok(self
            .element_mut(id)?
            .attributes
            .remove(&name.to_ascii_lowercase()))
    }

    /// Assign one inline style property; an empty value removes it.
    pub fn set_style_property(&mut self, id: NodeId, property: &str, value: &str) -> DomResult<()> {
        if !style::is_valid_property_name(property) {
            return Err(DomError::InvalidCharacter(property.to_string()));
        }
        let current = self.element(id).ok_or(DomError::NotAnElement(id))?;
        let old_text = current.attributes.get("style").cloned();
        let new_text = style::assign_property(old_text.as_deref().unwrap_or(""), property, value);
        if old_text.is_none() && new_text.is_empty() {
            return Ok(());
        }
        self.set_attribute(id, "style", &new_text)
    }

    pub fn style_property(&self, id: NodeId, property: &str) -> Option<String> {
        let text = self.get_attribute(id, "style")?;
        let property = property.trim().to_ascii_lowercase();
        style::parse_declarations(text)
            .into_iter()
            .find(|(name, _)| *name == property)
            .map(|(_, value)| value)
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.data(id) {
            Some(NodeData::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn set_text(&mut self, id: NodeId, content: &str) -> DomResult<()> {
        match self.arena.get_mut(id).map(|node| node.get_mut()) {
            Some(NodeData::Text(text)) => {
                *text = content.to_string();
                Ok(())
            }
            _ => Err(DomError::NotText(id)),
        }
    }

    /// Split a text node at a character offset.
    ///
    /// The original node keeps the prefix. A new text node holding the
    /// suffix is returned; when the original has a parent the new node is
    /// inserted as its next sibling.
    pub fn split_text(&mut self, id: NodeId, offset: usize) -> DomResult<NodeId> {
        let text = self.text(id).ok_or(DomError::NotText(id))?;
        let max = text.chars().count();
        if offset > max {
            return Err(DomError::IndexSize { offset, max });
        }
        let byte_index = char_to_byte(text, offset);
        let suffix = text[byte_index..].to_string();
        let prefix = text[..byte_index].to_string();

        let new_node = self.create_text_node(&suffix);
        self.set_text(id, &prefix)?;
        if self.parent(id).is_some() {
            id.checked_insert_after(new_node, &mut self.arena)
                .map_err(|e| DomError::hierarchy(format!("{:?}", e)))?;
        }
        Ok(new_node)
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    fn check_insertion(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        match self.data(parent) {
            None => return Err(DomError::Removed(parent)),
            Some(NodeData::Text(_)) => {
                return Err(DomError::hierarchy("text nodes cannot have children"))
            }
            Some(_) => {}
        }
        match self.data(child) {
            None => Err(DomError::Removed(child)),
            Some(NodeData::Document) => {
                Err(DomError::hierarchy("the document node cannot be inserted"))
            }
            Some(_) if self.contains(child, parent) => Err(DomError::hierarchy(format!(
                "{} cannot be inserted into its own subtree",
                self.describe(child)
            ))),
            Some(_) => Ok(()),
        }
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.check_insertion(parent, child)?;
        parent
            .checked_append(child, &mut self.arena)
            .map_err(|e| DomError::hierarchy(format!("{:?}", e)))
    }

    /// Insert `child` immediately before `reference`, or append it when
    /// `reference` is `None`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<()> {
        let Some(reference) = reference else {
            return self.append_child(parent, child);
        };
        if self.parent(reference) != Some(parent) {
            return Err(DomError::NotAChild {
                parent,
                child: reference,
            });
        }
        self.check_insertion(parent, child)?;
        if child == reference {
            return Ok(());
        }
        reference
            .checked_insert_before(child, &mut self.arena)
            .map_err(|e| DomError::hierarchy(format!("{:?}", e)))
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        child.detach(&mut self.arena);
        Ok(())
    }

    /// Put `new_child` where `old_child` is and detach `old_child`.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    ) -> DomResult<()> {
        if self.parent(old_child) != Some(parent) {
            return Err(DomError::NotAChild {
                parent,
                child: old_child,
            });
        }
        if new_child == old_child {
            return Ok(());
        }
        self.check_insertion(parent, new_child)?;
        old_child
            .checked_insert_before(new_child, &mut self.arena)
            .map_err(|e| DomError::hierarchy(format!("{:?}", e)))?;
        old_child.detach(&mut self.arena);
        Ok(())
    }

    /// Short human-readable label for messages, e.g. `<b>` or `#text "foo"`.
    pub fn describe(&self, id: NodeId) -> String {
        match self.data(id) {
            Some(NodeData::Document) => "#document".to_string(),
            Some(NodeData::Element(element)) => format!("<{}>", element.tag()),
            Some(NodeData::Text(text)) => format!("#text {:?}", text),
            None => format!("<removed {:?}>", id),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Tag and attribute names: non-empty, no whitespace, quotes, `/`, `=`,
/// `<` or `>`.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '/' | '=' | '<' | '>'))
}

fn char_to_byte(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}
