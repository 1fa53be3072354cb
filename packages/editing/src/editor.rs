//! # Editor
//!
//! Owns a document together with its current selection, the command
//! registry and the undo history. Each `exec_command` runs in a fresh
//! [`EditingContext`] whose record becomes one undo step. A command that
//! fails part way leaves its record pending until it is undone or the next
//! command runs.

use crate::commands::{CommandOutput, CommandRegistry};
use crate::config::EditingConfig;
use crate::context::{EditRecord, EditingContext};
use crate::errors::{EditingResult, EditorError};
use crate::log::undo_operations;
use crate::selection::{BoundaryPoint, Selection};
use crate::undo_stack::UndoStack;
use scribe_dom::{parse, Document};
use std::path::Path;
use tracing::{debug, instrument, warn};

#[derive(Debug)]
pub struct Editor {
    document: Document,
    selection: Selection,
    registry: CommandRegistry,
    config: EditingConfig,
    undo_stack: UndoStack,
    failed_record: Option<EditRecord>,
}

impl Editor {
    pub fn new(document: Document, registry: CommandRegistry, config: EditingConfig) -> Self {
        let selection = Selection::collapsed(BoundaryPoint::new(document.root(), 0));
        let undo_stack = UndoStack::with_max_levels(config.undo_limit);
        Self {
            document,
            selection,
            registry,
            config,
            undo_stack,
            failed_record: None,
        }
    }

    pub fn from_markup(markup: &str, registry: CommandRegistry, config: EditingConfig) -> Result<Self, EditorError> {
        Ok(Self::new(parse(markup)?, registry, config))
    }

    /// Like [`from_markup`](Self::from_markup), reading the configuration
    /// from `config_dir`.
    pub fn open(markup: &str, registry: CommandRegistry, config_dir: impl AsRef<Path>) -> Result<Self, EditorError> {
        let config = EditingConfig::load(config_dir)?;
        Self::from_markup(markup, registry, config)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    pub fn config(&self) -> &EditingConfig {
        &self.config
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut CommandRegistry {
        &mut self.registry
    }

    pub fn undo_stack(&self) -> &UndoStack {
        &self.undo_stack
    }

    pub fn to_html(&self) -> String {
        self.document.to_html()
    }

    /// Run a registered command as one undoable step.
    ///
    /// The command's returned selection becomes the ending selection unless
    /// the command set one itself. A failing command is not pushed to the
    /// undo stack; its already-applied mutations stay in the tree and are
    /// kept as [`failed_record`](Self::failed_record) so they can be undone.
    #[instrument(skip(self))]
    pub fn exec_command(
        &mut self,
        name: &str,
        user_interface: Option<bool>,
        value: Option<&str>,
    ) -> Result<CommandOutput, EditorError> {
        self.failed_record = None;
        let mut context = EditingContext::with_config(&mut self.document, &self.config, name, self.selection);
        let result = run_command(&mut context, &self.registry, name, user_interface, value);
        let record = context.finish();

        match result {
            Ok(output) => {
                if let Some(ending) = record.ending_selection {
                    self.selection = ending;
                }
                self.undo_stack.push(record);
                Ok(output)
            }
            Err(error) => {
                warn!(operations = record.operations.len(), %error, "command failed");
                if !record.operations.is_empty() {
                    self.undo_stack.clear_redo();
                    self.failed_record = Some(record);
                }
                Err(error.into())
            }
        }
    }

    /// Record of the last command if it failed after mutating the tree.
    pub fn failed_record(&self) -> Option<&EditRecord> {
        self.failed_record.as_ref()
    }

    /// Revert the mutations of a failed command and restore the selection
    /// it started with. Returns false when no failed command is pending.
    pub fn undo_failed(&mut self) -> Result<bool, EditorError> {
        let Some(record) = self.failed_record.take() else {
            return Ok(false);
        };
        debug!(command = %record.name, "undo failed command");
        if let Err(error) = undo_operations(&record.operations, &mut self.document) {
            self.failed_record = Some(record);
            return Err(error.into());
        }
        self.selection = record.starting_selection;
        Ok(true)
    }

    /// Undo the last command and restore the selection it started with.
    /// A pending failed command is reverted first. Returns false when there
    /// was nothing to undo.
    pub fn undo(&mut self) -> Result<bool, EditorError> {
        if self.undo_failed()? {
            return Ok(true);
        }
        match self.undo_stack.undo(&mut self.document)? {
            Some(selection) => {
                self.selection = selection;
                Ok(true)
            }
            None => {
                debug!("nothing to undo");
                Ok(false)
            }
        }
    }

    /// Redo the last undone command and restore the selection it ended with.
    pub fn redo(&mut self) -> Result<bool, EditorError> {
        if self.failed_record.is_some() {
            debug!("nothing to redo over a failed command");
            return Ok(false);
        }
        match self.undo_stack.redo(&mut self.document)? {
            Some(selection) => {
                self.selection = selection;
                Ok(true)
            }
            None => {
                debug!("nothing to redo");
                Ok(false)
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        self.failed_record.is_some() || self.undo_stack.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.failed_record.is_none() && self.undo_stack.can_redo()
    }
}

fn run_command(
    context: &mut EditingContext<'_>,
    registry: &CommandRegistry,
    name: &str,
    user_interface: Option<bool>,
    value: Option<&str>,
) -> EditingResult<CommandOutput> {
    let output = context.exec_command(registry, name, user_interface, value)?;
    if !context.is_frozen() {
        if let Some(selection) = output.selection() {
            context.set_ending_selection(selection)?;
        }
    }
    Ok(output)
}
