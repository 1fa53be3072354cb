//! # Scribe DOM
//!
//! The document tree the editing core mutates: an arena of nodes addressed by
//! [`NodeId`], with navigation, attribute and inline-style storage, shallow
//! cloning, text splitting, and markup parsing/serialization for tests and
//! tools.

pub mod content;
pub mod document;
pub mod error;
pub mod parser;
pub mod serializer;
pub mod style;
pub mod tokenizer;

pub use content::{is_phrasing_tag, is_void_tag};
pub use document::{is_valid_name, Document, ElementData, NodeData};
pub use error::{DomError, DomResult, ParseError, ParseResult};
pub use indextree::NodeId;
pub use parser::{parse, parse_fragment, Parser};
pub use serializer::{serialize, Serializer};
