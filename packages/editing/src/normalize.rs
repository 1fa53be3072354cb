//! # Selection Normalization
//!
//! Turns boundary points that sit inside text into container + child-index
//! points, splitting text through the context where a boundary falls between
//! two characters. Runs in two passes over the anchor and the focus:
//!
//! 1. split: interior text offsets become splits (or snap to the text's edge
//!    when they fall inside edge whitespace)
//! 2. containers: `(text, 0)` and `(text, len)` become `(parent, index)` and
//!    `(parent, index + 1)`
//!
//! Both passes leave element-anchored points alone, so normalizing a
//! normalized selection changes nothing.

use crate::context::EditingContext;
use crate::errors::{EditingError, EditingResult};
use crate::selection::{BoundaryPoint, Selection};
use scribe_dom::{Document, NodeId};
use tracing::{instrument, trace};

/// Anchor and focus while they are being rewritten.
#[derive(Debug, Clone, Copy)]
struct Boundaries {
    anchor: BoundaryPoint,
    focus: BoundaryPoint,
}

impl Boundaries {
    fn points_mut(&mut self) -> [&mut BoundaryPoint; 2] {
        [&mut self.anchor, &mut self.focus]
    }

    fn use_container_if_possible(&mut self, doc: &Document, target: BoundaryPoint) {
        if !doc.is_text(target.node) {
            return;
        }
        let Some(container) = doc.parent(target.node) else {
            return;
        };
        let index = doc.node_index(target.node);
        let offset = if target.offset == 0 { index } else { index + 1 };
        for point in self.points_mut() {
            if *point == target {
                *point = BoundaryPoint::new(container, offset);
            }
        }
    }
}

impl<'doc> EditingContext<'doc> {
    /// Canonical form of `selection`. May split text nodes; every split is
    /// logged like any other mutation.
    #[instrument(skip(self, selection), fields(context = self.name(), empty = selection.is_empty()))]
    pub fn normalize_selection(&mut self, selection: Selection) -> EditingResult<Selection> {
        if selection.is_empty() {
            return Ok(selection);
        }
        let mut boundaries = Boundaries {
            anchor: selection.anchor(),
            focus: selection.focus(),
        };

        let anchor = boundaries.anchor;
        self.split_if_needed(&mut boundaries, anchor)?;
        let focus = boundaries.focus;
        self.split_if_needed(&mut boundaries, focus)?;

        let anchor = boundaries.anchor;
        boundaries.use_container_if_possible(self.document(), anchor);
        let focus = boundaries.focus;
        boundaries.use_container_if_possible(self.document(), focus);

        Ok(Selection::from_points(
            boundaries.anchor,
            boundaries.focus,
            selection.direction(),
        ))
    }

    fn split_if_needed(&mut self, boundaries: &mut Boundaries, target: BoundaryPoint) -> EditingResult<()> {
        let BoundaryPoint { node, offset } = target;
        if offset == 0 || !self.document().is_text(node) {
            return Ok(());
        }
        let length = self.document().max_offset(node);
        if offset == length {
            return Ok(());
        }
        if offset > length {
            return Err(EditingError::InvalidOffset {
                node: self.document().describe(node),
                offset,
                max: length,
            });
        }

        if self.config().snap_boundary_whitespace {
            if let Some(snapped) = self.snap_to_edge(node, offset, length) {
                trace!(offset, snapped, "boundary snapped over whitespace");
                for point in boundaries.points_mut() {
                    if *point == target {
                        point.offset = snapped;
                    }
                }
                return Ok(());
            }
        }

        let container = self.document().parent(node);
        let node_index = self.document().node_index(node);
        let new_node = self.split_text(node, offset)?;
        for point in boundaries.points_mut() {
            if Some(point.node) == container {
                if point.offset > node_index {
                    point.offset += 1;
                }
            } else if point.node == node && point.offset >= offset {
                *point = BoundaryPoint::new(new_node, point.offset - offset);
            }
        }
        Ok(())
    }

    /// Offset to use instead of splitting when `offset` lies in the leading
    /// whitespace of a first child or the trailing whitespace of a last child.
    fn snap_to_edge(&self, node: NodeId, offset: usize, length: usize) -> Option<usize> {
        let doc = self.document();
        let text = doc.text(node)?;
        if doc.previous_sibling(node).is_none() {
            let leading = length - text.trim_start().chars().count();
            if offset <= leading {
                return Some(0);
            }
        }
        if doc.next_sibling(node).is_none() {
            let visible = text.trim_end().chars().count();
            if offset >= visible {
                return Some(length);
            }
        }
        None
    }
}
