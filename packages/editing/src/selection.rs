//! Selections as immutable values.
//!
//! A boundary point `(node, offset)` is a character index when `node` is a
//! text node and a child index otherwise; `offset == child_count` means
//! "after the last child".

use scribe_dom::{Document, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundaryPoint {
    pub node: NodeId,
    pub offset: usize,
}

impl BoundaryPoint {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectionDirection {
    #[default]
    AnchorIsStart,
    FocusIsStart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    anchor: BoundaryPoint,
    focus: BoundaryPoint,
    direction: SelectionDirection,
}

impl Selection {
    pub fn new(
        anchor_node: NodeId,
        anchor_offset: usize,
        focus_node: NodeId,
        focus_offset: usize,
        direction: SelectionDirection,
    ) -> Self {
        Self {
            anchor: BoundaryPoint::new(anchor_node, anchor_offset),
            focus: BoundaryPoint::new(focus_node, focus_offset),
            direction,
        }
    }

    pub fn from_points(anchor: BoundaryPoint, focus: BoundaryPoint, direction: SelectionDirection) -> Self {
        Self {
            anchor,
            focus,
            direction,
        }
    }

    /// A caret at `point`.
    pub fn collapsed(point: BoundaryPoint) -> Self {
        Self::from_points(point, point, SelectionDirection::AnchorIsStart)
    }

    pub fn anchor(&self) -> BoundaryPoint {
        self.anchor
    }

    pub fn focus(&self) -> BoundaryPoint {
        self.focus
    }

    pub fn anchor_node(&self) -> NodeId {
        self.anchor.node
    }

    pub fn anchor_offset(&self) -> usize {
        self.anchor.offset
    }

    pub fn focus_node(&self) -> NodeId {
        self.focus.node
    }

    pub fn focus_offset(&self) -> usize {
        self.focus.offset
    }

    pub fn direction(&self) -> SelectionDirection {
        self.direction
    }

    pub fn start(&self) -> BoundaryPoint {
        match self.direction {
            SelectionDirection::AnchorIsStart => self.anchor,
            SelectionDirection::FocusIsStart => self.focus,
        }
    }

    pub fn end(&self) -> BoundaryPoint {
        match self.direction {
            SelectionDirection::AnchorIsStart => self.focus,
            SelectionDirection::FocusIsStart => self.anchor,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.focus
    }

    pub fn is_caret(&self) -> bool {
        self.is_empty()
    }

    /// Empty, or neither boundary point sits on a text node.
    pub fn is_normalized(&self, doc: &Document) -> bool {
        self.is_empty() || (!doc.is_text(self.anchor.node) && !doc.is_text(self.focus.node))
    }
}

/// Nodes in tree order from the start boundary up to, but not including,
/// the node at the end boundary.
///
/// The boundary node of a point `(container, offset)` is the child at
/// `offset`, or the node following `container` when `offset` is past the
/// last child. Expects a normalized selection; an empty one selects nothing.
pub fn compute_selected_nodes(doc: &Document, selection: &Selection) -> Vec<NodeId> {
    if selection.is_empty() {
        return Vec::new();
    }
    let start = boundary_node(doc, selection.start());
    let end = boundary_node(doc, selection.end());

    let mut nodes = Vec::new();
    let mut runner = start;
    while let Some(node) = runner {
        if Some(node) == end {
            break;
        }
        nodes.push(node);
        runner = doc.next_node(node);
    }
    nodes
}

fn boundary_node(doc: &Document, point: BoundaryPoint) -> Option<NodeId> {
    if doc.is_text(point.node) {
        return if point.offset == 0 {
            Some(point.node)
        } else {
            doc.next_node_skipping_children(point.node)
        };
    }
    doc.child_at(point.node, point.offset)
        .or_else(|| doc.next_node_skipping_children(point.node))
}
