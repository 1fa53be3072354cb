use crate::content::is_void_tag;
use crate::document::{Document, NodeData};
use indextree::NodeId;
use std::fmt::Write;

/// Serializer converts a subtree back to markup.
///
/// Attributes come out sorted by name, so two trees with the same content
/// serialize identically no matter in which order attributes were set.
pub struct Serializer<'doc> {
    doc: &'doc Document,
}

impl<'doc> Serializer<'doc> {
    pub fn new(doc: &'doc Document) -> Self {
        Self { doc }
    }

    /// Markup for `node` itself; the document node serializes its children.
    pub fn outer(&self, node: NodeId) -> String {
        let mut output = String::new();
        self.serialize_node(node, &mut output);
        output
    }

    pub fn inner(&self, node: NodeId) -> String {
        let mut output = String::new();
        for child in self.doc.children(node) {
            self.serialize_node(child, &mut output);
        }
        output
    }

    fn serialize_node(&self, node: NodeId, output: &mut String) {
        match self.doc.data(node) {
            Some(NodeData::Document) => {
                for child in self.doc.children(node) {
                    self.serialize_node(child, output);
                }
            }
            Some(NodeData::Text(text)) => output.push_str(&escape_text(text)),
            Some(NodeData::Element(element)) => {
                let _ = write!(output, "<{}", element.tag());
                for (name, value) in element.attributes() {
                    let _ = write!(output, " {}=\"{}\"", name, escape_attribute(value));
                }
                output.push('>');
                if is_void_tag(element.tag()) && self.doc.first_child(node).is_none() {
                    return;
                }
                for child in self.doc.children(node) {
                    self.serialize_node(child, output);
                }
                let _ = write!(output, "</{}>", element.tag());
            }
            None => {}
        }
    }
}

pub fn serialize(doc: &Document, node: NodeId) -> String {
    Serializer::new(doc).outer(node)
}

impl Document {
    pub fn outer_html(&self, node: NodeId) -> String {
        Serializer::new(self).outer(node)
    }

    pub fn inner_html(&self, node: NodeId) -> String {
        Serializer::new(self).inner(node)
    }

    /// Markup of the whole document.
    pub fn to_html(&self) -> String {
        self.inner_html(self.root())
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
