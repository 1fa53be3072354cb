//! # Commands
//!
//! Editing commands are plain functions looked up by name. The crate ships
//! none; hosts register their own and hand the registry to
//! [`EditingContext::exec_command`] or an [`Editor`](crate::Editor).

use crate::context::EditingContext;
use crate::errors::{EditingError, EditingResult};
use crate::selection::Selection;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// What a command returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutput {
    /// The command ran (or declined, with `false`) without producing a
    /// selection of its own.
    Handled(bool),

    /// Selection the command ends with.
    Selection(Selection),
}

impl CommandOutput {
    pub fn selection(&self) -> Option<Selection> {
        match self {
            CommandOutput::Selection(selection) => Some(*selection),
            CommandOutput::Handled(_) => None,
        }
    }
}

/// Signature of a registered command: context, user-interface flag, value.
pub type CommandFn =
    dyn Fn(&mut EditingContext<'_>, bool, &str) -> EditingResult<CommandOutput> + Send + Sync;

/// Name-keyed table of commands.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Box<CommandFn>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `command` under `name`, replacing any earlier one.
    pub fn register<F>(&mut self, name: impl Into<String>, command: F)
    where
        F: Fn(&mut EditingContext<'_>, bool, &str) -> EditingResult<CommandOutput> + Send + Sync + 'static,
    {
        self.commands.insert(name.into(), Box::new(command));
    }

    pub fn lookup(&self, name: &str) -> EditingResult<&CommandFn> {
        self.commands
            .get(name)
            .map(|command| &**command)
            .ok_or_else(|| EditingError::UnknownCommand(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.names())
            .finish()
    }
}

impl<'doc> EditingContext<'doc> {
    /// Run a registered command inside this context. `user_interface`
    /// defaults to `false` and `value` to the empty string.
    #[instrument(skip(self, registry), fields(context = self.name()))]
    pub fn exec_command(
        &mut self,
        registry: &CommandRegistry,
        name: &str,
        user_interface: Option<bool>,
        value: Option<&str>,
    ) -> EditingResult<CommandOutput> {
        self.assert_editing_in_progress()?;
        let command = registry.lookup(name)?;
        debug!("executing command");
        command(self, user_interface.unwrap_or(false), value.unwrap_or(""))
    }
}
