use crate::content::is_void_tag;
use crate::document::Document;
use crate::error::{ParseError, ParseResult};
use crate::tokenizer::{tokenize, tokenize_tag, TagToken, Token};
use indextree::NodeId;
use std::ops::Range;
use tracing::trace;

/// Markup parser that builds nodes into an existing [`Document`].
///
/// Handles the subset of HTML the editor needs: nested elements, quoted or
/// bare attributes, void and self-closing elements, comments (dropped) and a
/// handful of character references. Text is kept verbatim otherwise, so
/// leading and trailing whitespace survive.
pub struct Parser<'src, 'doc> {
    tokens: Vec<(Token<'src>, Range<usize>)>,
    pos: usize,
    doc: &'doc mut Document,
}

struct OpenElement {
    node: NodeId,
    tag: String,
}

impl<'src, 'doc> Parser<'src, 'doc> {
    pub fn new(source: &'src str, doc: &'doc mut Document) -> ParseResult<Self> {
        let tokens = tokenize(source).map_err(|pos| ParseError::Lexer { pos })?;
        Ok(Self {
            tokens,
            pos: 0,
            doc,
        })
    }

    /// Parse every token, appending top-level nodes to `container`.
    /// Returns the top-level nodes in order.
    pub fn parse_into(&mut self, container: NodeId) -> ParseResult<Vec<NodeId>> {
        let mut top_level = Vec::new();
        let mut stack: Vec<OpenElement> = Vec::new();

        while let Some((token, span)) = self.advance() {
            let parent = stack.last().map(|open| open.node).unwrap_or(container);
            match token {
                Token::Text(raw) => {
                    let node = self.doc.create_text_node(&decode_entities(raw));
                    self.attach(parent, node, span.start)?;
                    if stack.is_empty() {
                        top_level.push(node);
                    }
                }
                Token::StartTag(raw) => {
                    let (node, tag, self_closing) = self.parse_start_tag(raw, span.start)?;
                    self.attach(parent, node, span.start)?;
                    if stack.is_empty() {
                        top_level.push(node);
                    }
                    if !self_closing && !is_void_tag(&tag) {
                        stack.push(OpenElement { node, tag });
                    }
                }
                Token::EndTag(raw) => {
                    let tag = raw[2..raw.len() - 1].trim().to_ascii_lowercase();
                    if is_void_tag(&tag) {
                        continue;
                    }
                    match stack.pop() {
                        Some(open) if open.tag == tag => {}
                        Some(open) => {
                            return Err(ParseError::UnexpectedEndTag {
                                pos: span.start,
                                tag,
                                expected: open.tag,
                            })
                        }
                        None => {
                            return Err(ParseError::UnexpectedEndTag {
                                pos: span.start,
                                tag,
                                expected: String::new(),
                            })
                        }
                    }
                }
            }
        }

        if let Some(open) = stack.pop() {
            return Err(ParseError::UnclosedTag { tag: open.tag });
        }
        Ok(top_level)
    }

    fn advance(&mut self) -> Option<(Token<'src>, Range<usize>)> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn attach(&mut self, parent: NodeId, node: NodeId, pos: usize) -> ParseResult<()> {
        self.doc
            .append_child(parent, node)
            .map_err(|e| ParseError::invalid_tag(pos, e.to_string()))
    }

    fn parse_start_tag(&mut self, raw: &str, pos: usize) -> ParseResult<(NodeId, String, bool)> {
        let inner = &raw[1..raw.len() - 1];
        let tokens = tokenize_tag(inner).map_err(|offset| ParseError::Lexer { pos: pos + 1 + offset })?;
        let mut tokens = tokens.into_iter().peekable();

        let tag = match tokens.next() {
            Some(TagToken::Name(name)) => name.to_ascii_lowercase(),
            _ => return Err(ParseError::invalid_tag(pos, "missing tag name")),
        };
        let node = self
            .doc
            .create_element(&tag)
            .map_err(|e| ParseError::invalid_tag(pos, e.to_string()))?;

        let mut self_closing = false;
        while let Some(token) = tokens.next() {
            match token {
                TagToken::Name(name) => {
                    let value = if tokens.peek() == Some(&TagToken::Equals) {
                        tokens.next();
                        match tokens.next() {
                            Some(TagToken::Quoted(value)) | Some(TagToken::Name(value)) => {
                                decode_entities(value)
                            }
                            _ => {
                                return Err(ParseError::invalid_tag(
                                    pos,
                                    format!("attribute {} has no value", name),
                                ))
                            }
                        }
                    } else {
                        String::new()
                    };
                    self.doc
                        .set_attribute(node, name, &value)
                        .map_err(|e| ParseError::invalid_tag(pos, e.to_string()))?;
                }
                TagToken::Slash if tokens.peek().is_none() => self_closing = true,
                other => {
                    return Err(ParseError::invalid_tag(
                        pos,
                        format!("unexpected {:?} in <{}>", other, tag),
                    ))
                }
            }
        }

        trace!(tag = %tag, self_closing, "parsed start tag");
        Ok((node, tag, self_closing))
    }
}

/// Parse markup into a fresh document; top-level nodes become children of
/// the document node.
pub fn parse(source: &str) -> ParseResult<Document> {
    let mut doc = Document::new();
    let root = doc.root();
    Parser::new(source, &mut doc)?.parse_into(root)?;
    Ok(doc)
}

/// Parse markup into detached nodes owned by `doc`.
///
/// The nodes are built under a scratch element and then detached, so the
/// returned nodes have no parent.
pub fn parse_fragment(doc: &mut Document, source: &str) -> ParseResult<Vec<NodeId>> {
    let scratch = doc
        .create_element("template")
        .map_err(|e| ParseError::invalid_tag(0, e.to_string()))?;
    let nodes = Parser::new(source, doc)?.parse_into(scratch)?;
    for &node in &nodes {
        doc.remove_child(scratch, node)
            .map_err(|e| ParseError::invalid_tag(0, e.to_string()))?;
    }
    Ok(nodes)
}

fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    raw.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}
