//! Script commands
//!
//! Commands are the lines of a job's `before_script`, `script` and
//! `after_script` sections. They are appended through a [`Script`]
//! accumulator handed to the job's phase blocks.

use crate::yaml::{Yaml, YamlExport};
use std::fmt;

/// A single command executed by a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    /// A line of shell passed through verbatim.
    Shell(String),
}

impl Command {
    /// Creates a shell command
    pub fn shell(command: impl Into<String>) -> Self {
        Self::Shell(command.into())
    }
}

impl YamlExport for Command {
    fn to_yaml(&self) -> Yaml {
        match self {
            Self::Shell(command) => Yaml::from(command.as_str()),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shell(command) => write!(f, "sh({command})"),
        }
    }
}

/// Append-only view over one of a job's script phases.
///
/// ```
/// use gitlab_ci_dsl::prelude::*;
///
/// let ci = gitlab_ci(|ci| {
///     ci.job("hello", None, |job| {
///         job.script(|s| {
///             s.shell("echo Hello");
///             s.shell("echo World");
///         });
///         Ok(())
///     })?;
///     Ok(())
/// })
/// .unwrap();
///
/// assert!(ci.render().contains("- echo Hello\n"));
/// ```
#[derive(Debug)]
pub struct Script<'a> {
    commands: &'a mut Vec<Command>,
}

impl<'a> Script<'a> {
    pub(crate) fn new(commands: &'a mut Vec<Command>) -> Self {
        Self { commands }
    }

    /// Appends a shell command
    pub fn shell(&mut self, command: impl Into<String>) -> &mut Self {
        self.commands.push(Command::shell(command));
        self
    }

    /// Appends several shell commands in order
    pub fn shells<I, S>(&mut self, commands: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commands
            .extend(commands.into_iter().map(Command::shell));
        self
    }

    /// Appends an already-built command
    pub fn command(&mut self, command: Command) -> &mut Self {
        self.commands.push(command);
        self
    }

    /// Returns the number of commands in this phase so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns true if this phase has no commands yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
