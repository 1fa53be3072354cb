use indextree::NodeId;
use thiserror::Error;

pub type DomResult<T> = Result<T, DomError>;
pub type ParseResult<T> = Result<T, ParseError>;

/// Failures raised by raw tree mutations and queries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomError {
    #[error("Node {0:?} is not an element")]
    NotAnElement(NodeId),

    #[error("Node {0:?} is not a text node")]
    NotText(NodeId),

    #[error("Node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },

    #[error("Hierarchy request error: {0}")]
    HierarchyRequest(String),

    #[error("Offset {offset} is out of range, max is {max}")]
    IndexSize { offset: usize, max: usize },

    #[error("Invalid name: {0:?}")]
    InvalidCharacter(String),

    #[error("Node {0:?} was removed from the arena")]
    Removed(NodeId),
}

impl DomError {
    pub fn hierarchy(message: impl Into<String>) -> Self {
        Self::HierarchyRequest(message.into())
    }
}

/// Failures raised while reading markup.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected end tag </{tag}> at {pos}, expected </{expected}>")]
    UnexpectedEndTag {
        pos: usize,
        tag: String,
        expected: String,
    },

    #[error("Unclosed tag <{tag}> at end of input")]
    UnclosedTag { tag: String },

    #[error("Invalid tag at {pos}: {message}")]
    InvalidTag { pos: usize, message: String },

    #[error("Lexer error at {pos}")]
    Lexer { pos: usize },
}

impl ParseError {
    pub fn invalid_tag(pos: usize, message: impl Into<String>) -> Self {
        Self::InvalidTag {
            pos,
            message: message.into(),
        }
    }
}
