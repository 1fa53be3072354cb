//! # Scribe Editing
//!
//! Reversible structural editing of a [`Document`](scribe_dom::Document)
//! tree with selection tracking.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ Editor: document + selection + undo history │
//! └─────────────────────────────────────────────┘
//!                     ↓ exec_command
//! ┌─────────────────────────────────────────────┐
//! │ EditingContext: one command's session       │
//! │  - mutation API (logged, applied eagerly)   │
//! │  - splitting, normalization, effective nodes│
//! │  - ending-selection latch                   │
//! └─────────────────────────────────────────────┘
//!                     ↓ finish
//! ┌─────────────────────────────────────────────┐
//! │ EditRecord → UndoStack                      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Every mutation is an operation**: the log is the exact history
//! 2. **Undo replays inverses**: operations capture their own pre-state
//! 3. **Frozen after finishing**: no mutation once the ending selection is set
//!
//! ## Usage
//!
//! ```rust,ignore
//! use scribe_editing::{CommandOutput, CommandRegistry, EditingConfig, Editor};
//!
//! let mut registry = CommandRegistry::new();
//! registry.register("normalize", |context, _, _| {
//!     let selection = context.starting_selection();
//!     Ok(CommandOutput::Selection(context.normalize_selection(selection)?))
//! });
//!
//! let mut editor = Editor::from_markup("<p>hello</p>", registry, EditingConfig::default())?;
//! editor.exec_command("normalize", None, None)?;
//! editor.undo()?;
//! ```

mod commands;
mod config;
mod context;
mod effective;
mod editor;
mod errors;
mod log;
mod normalize;
mod operations;
mod selection;
mod split;
mod undo_stack;

pub use commands::{CommandFn, CommandOutput, CommandRegistry};
pub use config::{EditingConfig, DEFAULT_CONFIG_NAME};
pub use context::{EditRecord, EditingContext};
pub use effective::EffectiveNodes;
pub use editor::Editor;
pub use errors::{EditingError, EditingResult, EditorError};
pub use log::OperationLog;
pub use operations::{
    AppendChild, InsertBefore, Operation, RemoveAttribute, RemoveChild, ReplaceChild, SetAttribute,
    SetStyle, SplitText, StyleChange,
};
pub use selection::{compute_selected_nodes, BoundaryPoint, Selection, SelectionDirection};
pub use undo_stack::UndoStack;

// Re-export the tree types commands work with
pub use scribe_dom::{Document, NodeId};
