//! # Tree Splitting
//!
//! Structural rearrangements built only out of context mutations, so each
//! step they take lands in the log and undoes with the rest of the command.
//!
//! ```text
//! split_node(<b>AB|CD</b>, C)       → <b>AB</b><b>CD</b>   returns right <b>
//! split_node_left(<b>AB|CD</b>, C)  → <b>AB</b><b>CD</b>   returns left <b>
//! split_tree(<p>, C) on <p><i>AB|C</i></p>
//!                                   → <p><i>AB</i></p><p><i>C</i></p>
//! ```

use crate::context::EditingContext;
use crate::errors::{EditingError, EditingResult};
use scribe_dom::NodeId;
use tracing::trace;

impl<'doc> EditingContext<'doc> {
    /// Move `ref_child` and every following sibling into a shallow clone of
    /// `element` inserted right after it. Returns the node that now holds
    /// `ref_child`: `element` itself when `ref_child` is already first.
    pub fn split_node(&mut self, element: NodeId, ref_child: NodeId) -> EditingResult<NodeId> {
        self.assert_editing_in_progress()?;
        let parent = self.require_parent(element)?;
        self.require_child(element, ref_child)?;
        if self.document().first_child(element) == Some(ref_child) {
            return Ok(element);
        }
        trace!(element = %self.document().describe(element), "splitNode");

        let new_element = self.clone_node(element)?;
        for name in self.config().strip_on_split.clone() {
            self.remove_attribute(new_element, &name)?;
        }
        let mut sibling = Some(ref_child);
        while let Some(current) = sibling {
            sibling = self.document().next_sibling(current);
            self.append_child(new_element, current)?;
        }
        self.insert_after(parent, new_element, element)?;
        Ok(new_element)
    }

    /// Move every child before `ref_child` into a shallow clone of `element`
    /// inserted right before it, and return that clone. The stripped
    /// attributes leave the original, so an `id` stays with the left part.
    pub fn split_node_left(&mut self, element: NodeId, ref_child: NodeId) -> EditingResult<NodeId> {
        self.assert_editing_in_progress()?;
        let parent = self.require_parent(element)?;
        self.require_child(element, ref_child)?;
        if self.document().first_child(element) == Some(ref_child) {
            return Err(EditingError::invalid_argument(format!(
                "refChild {} must not be a first child of {}",
                self.document().describe(ref_child),
                self.document().describe(element)
            )));
        }
        trace!(element = %self.document().describe(element), "splitNodeLeft");

        let new_element = self.clone_node(element)?;
        for name in self.config().strip_on_split.clone() {
            self.remove_attribute(element, &name)?;
        }
        let mut child = self.document().first_child(element);
        while let Some(current) = child {
            if current == ref_child {
                break;
            }
            child = self.document().next_sibling(current);
            self.append_child(new_element, current)?;
        }
        self.insert_before(parent, new_element, Some(element))?;
        Ok(new_element)
    }

    /// Split every element from `ref_node`'s parent up to and including
    /// `element`, so `ref_node` and everything after it end up in a new
    /// subtree right after `element`. Returns the new top-level element.
    pub fn split_tree(&mut self, element: NodeId, ref_node: NodeId) -> EditingResult<NodeId> {
        self.require_descendant(element, ref_node)?;
        let mut last_node = ref_node;
        let mut runner = self.document().parent(ref_node);
        while let Some(current) = runner {
            if current == element || !self.document().is_element(current) {
                break;
            }
            last_node = self.split_node(current, last_node)?;
            runner = self.document().parent(current);
        }
        self.split_node(element, last_node)
    }

    /// Mirror of [`split_tree`](Self::split_tree): everything before
    /// `ref_node` moves into a new subtree right before `element`, which is
    /// returned.
    pub fn split_tree_left(&mut self, element: NodeId, ref_node: NodeId) -> EditingResult<NodeId> {
        self.require_descendant(element, ref_node)?;
        let mut last_node = ref_node;
        let mut runner = self.document().parent(ref_node);
        while let Some(current) = runner {
            if current == element || !self.document().is_element(current) {
                break;
            }
            self.split_node_left(current, last_node)?;
            last_node = current;
            runner = self.document().parent(current);
        }
        self.split_node_left(element, last_node)
    }

    /// Hoist the children of `parent` that come before `stop_child` (all of
    /// them without one) to just before `parent`, then drop `parent` if
    /// nothing is left in it.
    pub fn unwrap_element(&mut self, parent: NodeId, stop_child: Option<NodeId>) -> EditingResult<()> {
        if let Some(stop_child) = stop_child {
            self.require_child(parent, stop_child)?;
        }
        let ancestor = self.require_parent(parent)?;
        let mut child = self.document().first_child(parent);
        while let Some(current) = child {
            if Some(current) == stop_child {
                break;
            }
            child = self.document().next_sibling(current);
            self.insert_before(ancestor, current, Some(parent))?;
        }
        if self.document().first_child(parent).is_some() {
            return Ok(());
        }
        self.remove_child(ancestor, parent)
    }

    fn require_parent(&self, node: NodeId) -> EditingResult<NodeId> {
        self.document().parent(node).ok_or_else(|| {
            EditingError::invalid_argument(format!(
                "Parent {} must have a parent.",
                self.document().describe(node)
            ))
        })
    }

    fn require_child(&self, parent: NodeId, child: NodeId) -> EditingResult<()> {
        if self.document().parent(child) == Some(parent) {
            return Ok(());
        }
        Err(EditingError::invalid_argument(format!(
            "{} should be a child of {}",
            self.document().describe(child),
            self.document().describe(parent)
        )))
    }

    fn require_descendant(&self, element: NodeId, ref_node: NodeId) -> EditingResult<()> {
        if self.document().is_descendant_of(ref_node, element) {
            return Ok(());
        }
        Err(EditingError::invalid_argument(format!(
            "refNode {} must be a descendant of {}",
            self.document().describe(ref_node),
            self.document().describe(element)
        )))
    }
}

#[cfg(test)]
mod tests {
    use crate::context::EditingContext;
    use crate::selection::{BoundaryPoint, Selection};
    use scribe_dom::{parse, Document, NodeId};

    fn caret(doc: &Document) -> Selection {
        Selection::collapsed(BoundaryPoint::new(doc.root(), 0))
    }

    fn first(doc: &Document) -> NodeId {
        doc.first_child(doc.root()).unwrap()
    }

    #[test]
    fn test_split_node_moves_tail() {
        let mut doc = parse("<div><b id=\"x\">ABCD</b></div>").unwrap();
        let b = doc.first_child(first(&doc)).unwrap();
        let text = doc.first_child(b).unwrap();
        let c = doc.split_text(text, 2).unwrap();
        let selection = caret(&doc);

        let mut context = EditingContext::new(&mut doc, "split", selection);
        let right = context.split_node(b, c).unwrap();
        assert_ne!(right, b);
        assert_eq!(
            context.document().to_html(),
            "<div><b id=\"x\">AB</b><b>CD</b></div>"
        );
    }

    #[test]
    fn test_split_node_at_first_child_is_noop() {
        let mut doc = parse("<p><b>AB</b></p>").unwrap();
        let b = doc.first_child(first(&doc)).unwrap();
        let text = doc.first_child(b).unwrap();
        let selection = caret(&doc);

        let mut context = EditingContext::new(&mut doc, "split", selection);
        assert_eq!(context.split_node(b, text).unwrap(), b);
        assert!(context.operations().is_empty());
    }

    #[test]
    fn test_split_node_left_keeps_id_on_left_clone() {
        let mut doc = parse("<p id=\"p1\">A<br>B</p>").unwrap();
        let root = doc.root();
        let p = first(&doc);
        let br = doc.child_at(p, 1).unwrap();
        let selection = caret(&doc);

        let mut context = EditingContext::new(&mut doc, "split", selection);
        let left = context.split_node_left(p, br).unwrap();
        assert_eq!(context.document().child_at(root, 0), Some(left));
        assert_eq!(
            context.document().to_html(),
            "<p id=\"p1\">A</p><p><br>B</p>"
        );
    }

    #[test]
    fn test_split_node_left_rejects_first_child() {
        let mut doc = parse("<p>A<br></p>").unwrap();
        let p = first(&doc);
        let a = doc.first_child(p).unwrap();
        let selection = caret(&doc);

        let mut context = EditingContext::new(&mut doc, "split", selection);
        assert!(context.split_node_left(p, a).is_err());
    }

    #[test]
    fn test_split_tree() {
        let mut doc = parse("<p><i>AB<br>C</i></p>").unwrap();
        let p = first(&doc);
        let i = doc.first_child(p).unwrap();
        let br = doc.child_at(i, 1).unwrap();
        let selection = caret(&doc);

        let mut context = EditingContext::new(&mut doc, "split", selection);
        let new_tree = context.split_tree(p, br).unwrap();
        assert_ne!(new_tree, p);
        assert_eq!(
            context.document().to_html(),
            "<p><i>AB</i></p><p><i><br>C</i></p>"
        );
    }

    #[test]
    fn test_split_tree_left() {
        let mut doc = parse("<p><i>AB<br>C</i></p>").unwrap();
        let p = first(&doc);
        let i = doc.first_child(p).unwrap();
        let br = doc.child_at(i, 1).unwrap();
        let selection = caret(&doc);

        let mut context = EditingContext::new(&mut doc, "split", selection);
        context.split_tree_left(p, br).unwrap();
        assert_eq!(
            context.document().to_html(),
            "<p><i>AB</i></p><p><i><br>C</i></p>"
        );
    }

    #[test]
    fn test_unwrap_element() {
        let mut doc = parse("<p><b>A<i>B</i></b></p>").unwrap();
        let p = first(&doc);
        let b = doc.first_child(p).unwrap();
        let selection = caret(&doc);

        let mut context = EditingContext::new(&mut doc, "unwrap", selection);
        context.unwrap_element(b, None).unwrap();
        assert_eq!(context.document().to_html(), "<p>A<i>B</i></p>");
    }

    #[test]
    fn test_unwrap_element_until_stop_child() {
        let mut doc = parse("<p><b>A<i>B</i></b></p>").unwrap();
        let p = first(&doc);
        let b = doc.first_child(p).unwrap();
        let i = doc.last_child(b).unwrap();
        let selection = caret(&doc);

        let mut context = EditingContext::new(&mut doc, "unwrap", selection);
        context.unwrap_element(b, Some(i)).unwrap();
        assert_eq!(context.document().to_html(), "<p>A<b><i>B</i></b></p>");
    }
}
