//! Error types for the editing core

use scribe_dom::{DomError, NodeId, ParseError};
use thiserror::Error;

pub type EditingResult<T> = Result<T, EditingError>;

/// Failures of a single editing session. All of them abort the current
/// command; operations already applied stay in the log.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditingError {
    #[error("Protocol violation in {context}: {message}")]
    ProtocolViolation { context: String, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid offset {offset} on {node}, max is {max}")]
    InvalidOffset {
        node: String,
        offset: usize,
        max: usize,
    },

    #[error("Ending selection of {0} is already set")]
    DuplicateFinalization(String),

    #[error("Node {node} is not in the document tree")]
    NodeNotInTree { node: String },

    #[error("No such command {0}")]
    UnknownCommand(String),

    #[error("You can not remove non-existing attribute {name} of {element:?}")]
    MissingAttribute { element: NodeId, name: String },

    #[error("Tree error: {0}")]
    Dom(#[from] DomError),
}

impl EditingError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn protocol(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProtocolViolation {
            context: context.into(),
            message: message.into(),
        }
    }
}

/// Errors of the editor facade: session failures plus loading and
/// configuration problems.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Editing error: {0}")]
    Editing(#[from] EditingError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl From<DomError> for EditorError {
    fn from(e: DomError) -> Self {
        EditorError::Editing(EditingError::Dom(e))
    }
}
