//! # Effective Nodes
//!
//! The nodes a formatting command has to act on for a normalized selection:
//! the selected nodes plus the ancestors that are entirely covered by the
//! selection and satisfy the command's predicate. When such an ancestor
//! chain starts mid-way through inline content, the enclosing inline tree is
//! split first so the covered part can be handled as whole elements.
//!
//! ```text
//! <a>^foo<b>bar</b>|</a>   → container: parent of <a>, nodes: [<a>, foo, <b>, bar]
//! ```

use crate::context::EditingContext;
use crate::errors::{EditingError, EditingResult};
use crate::selection::{compute_selected_nodes, Selection};
use scribe_dom::{Document, NodeId};
use tracing::debug;

/// Result of [`EditingContext::set_up_effective_nodes`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EffectiveNodes {
    /// Where the ancestor walk stopped. `None` when nothing is selected, when
    /// the predicate rejects the first selected node itself, or when the walk
    /// ran past the document node.
    pub container: Option<NodeId>,

    /// Covered ancestors outermost first, followed by the selected nodes in
    /// tree order.
    pub nodes: Vec<NodeId>,
}

impl EffectiveNodes {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Flat form: the container slot first, then every node.
    pub fn to_vec(&self) -> Vec<Option<NodeId>> {
        std::iter::once(self.container)
            .chain(self.nodes.iter().copied().map(Some))
            .collect()
    }
}

impl<'doc> EditingContext<'doc> {
    /// [`set_up_effective_nodes_with_splitter`](Self::set_up_effective_nodes_with_splitter)
    /// splitting with [`split_tree`](Self::split_tree).
    pub fn set_up_effective_nodes<P>(&mut self, selection: &Selection, predicate: P) -> EditingResult<EffectiveNodes>
    where
        P: FnMut(&Document, NodeId) -> bool,
    {
        self.set_up_effective_nodes_with_splitter(selection, predicate, Self::split_tree)
    }

    pub fn set_up_effective_nodes_with_splitter<P, S>(
        &mut self,
        selection: &Selection,
        mut predicate: P,
        mut splitter: S,
    ) -> EditingResult<EffectiveNodes>
    where
        P: FnMut(&Document, NodeId) -> bool,
        S: FnMut(&mut Self, NodeId, NodeId) -> EditingResult<NodeId>,
    {
        if !selection.is_normalized(self.document()) {
            return Err(EditingError::invalid_argument(
                "Effective nodes need a normalized selection",
            ));
        }
        let selected = compute_selected_nodes(self.document(), selection);
        let Some(&start) = selected.first() else {
            return Ok(EffectiveNodes::default());
        };

        let mut need_splits = Vec::new();
        let mut runner = Some(start);
        {
            let doc = self.document();
            if doc.is_text(start) {
                let inline_parent = doc.parent(start).is_some_and(|parent| doc.is_phrasing(parent));
                if doc.previous_sibling(start).is_some() && inline_parent {
                    need_splits.push(start);
                }
                runner = doc.parent(start);
            }
            while let Some(current) = runner {
                if !predicate(doc, current) {
                    break;
                }
                let inline_parent = doc
                    .parent(current)
                    .is_some_and(|parent| doc.is_element(parent) && doc.is_phrasing(parent));
                if (!need_splits.is_empty() || doc.previous_sibling(current).is_some()) && inline_parent {
                    need_splits.push(current);
                }
                runner = doc.parent(current);
            }
        }

        if runner == Some(start) {
            return Ok(EffectiveNodes {
                container: None,
                nodes: selected,
            });
        }

        if let (Some(&innermost), Some(&outermost)) = (need_splits.first(), need_splits.last()) {
            if let Some(old_tree) = self.document().parent(outermost) {
                debug!(
                    tree = %self.document().describe(old_tree),
                    splits = need_splits.len(),
                    "splitting inline ancestors"
                );
                let new_tree = splitter(&mut *self, old_tree, innermost)?;
                if Some(old_tree) == runner {
                    runner = Some(new_tree);
                }
            }
        }

        let mut ancestors = Vec::new();
        let mut ancestor = self.document().parent(start);
        while let Some(current) = ancestor {
            if Some(current) == runner {
                break;
            }
            ancestors.push(current);
            ancestor = self.document().parent(current);
        }
        ancestors.reverse();
        ancestors.extend(selected);

        Ok(EffectiveNodes {
            container: runner,
            nodes: ancestors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::{BoundaryPoint, SelectionDirection};
    use scribe_dom::parse;

    fn inline(doc: &Document, node: NodeId) -> bool {
        doc.is_phrasing(node)
    }

    #[test]
    fn test_empty_selection_has_no_effective_nodes() {
        let mut doc = parse("<p>ab</p>").unwrap();
        let p = doc.first_child(doc.root()).unwrap();
        let selection = Selection::collapsed(BoundaryPoint::new(p, 0));

        let mut context = EditingContext::new(&mut doc, "effective", selection);
        let effective = context.set_up_effective_nodes(&selection, inline).unwrap();
        assert_eq!(effective.to_vec(), vec![None]);
    }

    #[test]
    fn test_covered_inline_ancestor_is_included() {
        // <p><a>^foo<b>bar</b>|</a>baz</p>
        let mut doc = parse("<p><a>foo<b>bar</b></a>baz</p>").unwrap();
        let p = doc.first_child(doc.root()).unwrap();
        let a = doc.first_child(p).unwrap();
        let selection = Selection::new(a, 0, a, 2, SelectionDirection::AnchorIsStart);

        let mut context = EditingContext::new(&mut doc, "effective", selection);
        let effective = context.set_up_effective_nodes(&selection, inline).unwrap();
        assert_eq!(effective.container, Some(p));
        assert_eq!(effective.nodes[0], a);
        assert_eq!(effective.nodes.len(), 4);
        assert!(context.operations().is_empty());
    }

    #[test]
    fn test_predicate_rejecting_start_node() {
        let mut doc = parse("<p><b>x</b>y</p>").unwrap();
        let p = doc.first_child(doc.root()).unwrap();
        let b = doc.first_child(p).unwrap();
        let selection = Selection::new(p, 0, p, 1, SelectionDirection::AnchorIsStart);

        let mut context = EditingContext::new(&mut doc, "effective", selection);
        let effective = context
            .set_up_effective_nodes(&selection, |_: &Document, _: NodeId| false)
            .unwrap();
        assert_eq!(effective.to_vec(), vec![None, Some(b)]);
    }

    #[test]
    fn test_rejects_unnormalized_selection() {
        let mut doc = parse("<p>ab</p>").unwrap();
        let p = doc.first_child(doc.root()).unwrap();
        let text = doc.first_child(p).unwrap();
        let selection = Selection::new(text, 0, text, 1, SelectionDirection::AnchorIsStart);

        let mut context = EditingContext::new(&mut doc, "effective", selection);
        assert!(context.set_up_effective_nodes(&selection, inline).is_err());
    }
}
