//! Line dispatch for the control channel.
//!
//! A [`Dispatcher`] matches each received line against the
//! [`CommandTable`] and forwards the resolved action to a
//! [`CommandContext`]. Unknown lines and rejected arguments are logged and
//! otherwise ignored so that one bad command never affects the connection
//! or the commands that follow it.

mod collection;
mod context;
mod errors;
mod paths;
#[cfg(test)]
mod tests;

use tracing::{debug, warn};

use crate::command::{Action, CommandTable};

pub use self::collection::{COMMAND_COLLECTION_NAME, CommandCollection};
pub use self::context::{CommandContext, RemoteContext, SlideshowSettings};
pub use self::errors::CommandError;
pub use self::paths::{COLLECTION_EXTENSION, collect_files_recursive, expand_tilde, is_collection_file};

/// Tracing target for dispatch events.
pub const DISPATCH_TARGET: &str = concat!(env!("CARGO_CRATE_NAME"), "::dispatch");

/// Consumer of complete lines read from a control connection.
pub trait LineHandler {
    /// Handles one line with its terminator removed.
    fn handle_line(&mut self, line: &str);
}

/// What happened to a dispatched line.
#[derive(Debug, PartialEq)]
pub enum DispatchOutcome {
    /// The line was empty and ignored.
    Empty,
    /// No command matched the line.
    Unknown,
    /// The command ran.
    Handled(Action),
    /// The command matched but its argument was rejected.
    Rejected(Action, CommandError),
}

/// Matches lines against a command table and runs them on a context.
#[derive(Debug)]
pub struct Dispatcher<C> {
    table: CommandTable,
    context: C,
}

impl<C: CommandContext> Dispatcher<C> {
    /// Dispatches through the standard command table.
    pub fn new(context: C) -> Self {
        Self::with_table(CommandTable::standard(), context)
    }

    /// Dispatches through a custom command table.
    pub fn with_table(table: CommandTable, context: C) -> Self {
        Self { table, context }
    }

    /// Command table used for matching.
    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    /// Context receiving matched commands.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Mutable access to the context.
    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    /// Matches `line` and runs the first matching command.
    pub fn dispatch(&mut self, line: &str) -> DispatchOutcome {
        if line.is_empty() {
            return DispatchOutcome::Empty;
        }
        let Some(found) = self.table.find(line) else {
            return DispatchOutcome::Unknown;
        };
        let action = found.entry.action;
        match self.context.apply(action, found.argument) {
            Ok(()) => DispatchOutcome::Handled(action),
            Err(error) => DispatchOutcome::Rejected(action, error),
        }
    }
}

impl<C: CommandContext> LineHandler for Dispatcher<C> {
    fn handle_line(&mut self, line: &str) {
        match self.dispatch(line) {
            DispatchOutcome::Empty => {}
            DispatchOutcome::Unknown => {
                warn!(target: DISPATCH_TARGET, command = line, "unknown remote command");
            }
            DispatchOutcome::Handled(action) => {
                debug!(target: DISPATCH_TARGET, command = line, ?action, "remote command handled");
            }
            DispatchOutcome::Rejected(action, error) => {
                warn!(
                    target: DISPATCH_TARGET,
                    command = line,
                    ?action,
                    %error,
                    "remote command rejected"
                );
            }
        }
    }
}
