//! Control client bootstrap.
//!
//! A secondary invocation connects to the primary, launching one first when
//! nothing is listening, and forwards its command-line intent as command
//! lines. Progress meant for the user is written to a caller-supplied sink;
//! everything else goes through `tracing`.

mod connector;
mod errors;
mod launch;
mod retry;

use std::io::Write;
use std::path::PathBuf;
use std::thread;

use tracing::{debug, warn};

use crate::command::{
    CommandTable, LIST_ADD_PREFIX, LIST_CLEAR_COMMAND, OPEN_FILE_PREFIX, RAISE_COMMAND,
};

pub use self::connector::{CommandSink, Connector, SocketConnector};
pub use self::errors::BootstrapError;
pub use self::launch::{BLANK_FLAG, LaunchInvocation, Launcher, ProcessLauncher};
pub use self::retry::{DEFAULT_RETRY_ATTEMPTS, FAST_RETRY_ATTEMPTS, RetrySchedule};

/// Tracing target for bootstrap events.
pub const BOOTSTRAP_TARGET: &str = concat!(env!("CARGO_CRATE_NAME"), "::bootstrap");

/// Name used in user-facing progress messages.
pub const REMOTE_NAME: &str = "loupe";

/// Everything a control client invocation wants the primary to do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteRequest {
    /// Recognised command lines, in command-line order.
    pub commands: Vec<String>,
    /// Directory to open when no file is given.
    pub target: Option<PathBuf>,
    /// Image files to open.
    pub files: Vec<PathBuf>,
    /// Collection files to open.
    pub collections: Vec<PathBuf>,
}

impl RemoteRequest {
    fn has_paths(&self) -> bool {
        self.target.is_some() || !self.files.is_empty() || !self.collections.is_empty()
    }

    /// Command lines delivering `commands` followed by this request's paths.
    ///
    /// Several files become a fresh command-line collection; a single file
    /// is opened directly. The target directory is opened only when there
    /// is no file and no `file:` command among `commands`. Collections are
    /// opened last.
    pub fn lines<'a, I>(&self, table: &CommandTable, commands: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut lines = Vec::new();
        let mut use_target = true;
        for command in commands {
            if table
                .find(command)
                .is_some_and(|found| found.entry.is_file_open())
            {
                use_target = false;
            }
            lines.push(command.to_owned());
        }

        let prefix = if self.files.len() > 1 {
            lines.push(LIST_CLEAR_COMMAND.to_owned());
            LIST_ADD_PREFIX
        } else {
            OPEN_FILE_PREFIX
        };
        lines.extend(
            self.files
                .iter()
                .map(|file| format!("{prefix}{}", file.display())),
        );

        if let Some(target) = &self.target
            && self.files.is_empty()
            && use_target
        {
            lines.push(format!("{OPEN_FILE_PREFIX}{}", target.display()));
        }

        lines.extend(
            self.collections
                .iter()
                .map(|collection| format!("{OPEN_FILE_PREFIX}{}", collection.display())),
        );
        lines
    }
}

/// Summary of one bootstrap run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    /// Whether a primary was launched.
    pub started: bool,
    /// Connection attempts made after launching.
    pub attempts: u32,
    /// Lines written successfully.
    pub sent: usize,
    /// Lines that failed to send.
    pub failed: usize,
}

/// Connect-or-launch procedure for control clients.
#[derive(Debug)]
pub struct Bootstrap<C, L> {
    connector: C,
    launcher: L,
    invocation: LaunchInvocation,
    schedule: RetrySchedule,
    table: CommandTable,
}

impl<C: Connector, L: Launcher> Bootstrap<C, L> {
    /// Creates a bootstrap that launches `invocation` when no primary answers.
    ///
    /// Extra arguments are appended to `invocation` for each launch.
    pub fn new(connector: C, launcher: L, invocation: LaunchInvocation) -> Self {
        Self {
            connector,
            launcher,
            invocation,
            schedule: RetrySchedule::default(),
            table: CommandTable::standard(),
        }
    }

    /// Replaces the retry schedule.
    #[must_use]
    pub fn with_schedule(mut self, schedule: RetrySchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Launcher used to start primaries.
    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Delivers `request` to the primary, launching one if necessary.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::Launch`] when the primary cannot be started,
    /// [`BootstrapError::RemoteUnavailable`] when it never accepts a
    /// connection, and [`BootstrapError::Output`] when progress cannot be
    /// written. Individual send failures are logged and counted instead.
    pub fn send_all<W: Write>(
        &mut self,
        request: &RemoteRequest,
        progress: &mut W,
    ) -> Result<BootstrapReport, BootstrapError> {
        let mut report = BootstrapReport::default();
        let mut pending: Vec<&str> = request.commands.iter().map(String::as_str).collect();

        let mut sink = match self.connector.connect() {
            Ok(sink) => sink,
            Err(error) => {
                debug!(target: BOOTSTRAP_TARGET, %error, "no primary answered");
                write!(progress, "Remote {REMOTE_NAME} not running, starting...")?;
                progress.flush()?;
                pending = self.launch_primary(request)?;
                report.started = true;

                let connected = self.retry(progress, &mut report)?;
                writeln!(progress)?;
                let Some(sink) = connected else {
                    writeln!(progress, "Remote not available")?;
                    warn!(
                        target: BOOTSTRAP_TARGET,
                        attempts = report.attempts,
                        "primary never accepted a connection"
                    );
                    return Err(BootstrapError::RemoteUnavailable {
                        attempts: report.attempts,
                    });
                };
                sink
            }
        };

        self.transmit(&mut sink, &pending, request, &mut report);
        Ok(report)
    }

    fn launch_primary<'a>(
        &mut self,
        request: &'a RemoteRequest,
    ) -> Result<Vec<&'a str>, BootstrapError> {
        let mut invocation = self.invocation.clone();
        let entries: Vec<_> = request
            .commands
            .iter()
            .map(|command| (command, self.table.find(command).map(|found| found.entry)))
            .collect();

        // Mode flags must precede commands on the primary's command line.
        let opens_file = entries
            .iter()
            .any(|(_, entry)| entry.is_some_and(|entry| entry.is_file_open()));
        if opens_file || request.has_paths() {
            invocation.arg(BLANK_FLAG);
        }

        let mut remaining = Vec::with_capacity(entries.len());
        for (command, entry) in entries {
            if entry.is_some_and(|entry| entry.prefer_at_launch) {
                invocation.arg(command);
            } else {
                remaining.push(command.as_str());
            }
        }

        debug!(
            target: BOOTSTRAP_TARGET,
            program = %invocation.program().to_string_lossy(),
            arguments = ?invocation.arguments(),
            "launching primary"
        );
        self.launcher
            .launch(&invocation)
            .map_err(|source| BootstrapError::Launch {
                program: invocation.program().to_os_string(),
                source,
            })?;
        Ok(remaining)
    }

    fn retry<W: Write>(
        &mut self,
        progress: &mut W,
        report: &mut BootstrapReport,
    ) -> Result<Option<C::Sink>, BootstrapError> {
        for attempt in 1..=self.schedule.attempts() {
            thread::sleep(self.schedule.delay_before(attempt));
            report.attempts = attempt;
            match self.connector.connect() {
                Ok(sink) => {
                    debug!(target: BOOTSTRAP_TARGET, attempt, "connected to new primary");
                    return Ok(Some(sink));
                }
                Err(error) => {
                    debug!(target: BOOTSTRAP_TARGET, attempt, %error, "primary not reachable yet");
                    write!(progress, ".")?;
                    progress.flush()?;
                }
            }
        }
        Ok(None)
    }

    fn transmit(
        &self,
        sink: &mut C::Sink,
        pending: &[&str],
        request: &RemoteRequest,
        report: &mut BootstrapReport,
    ) {
        for line in request.lines(&self.table, pending.iter().copied()) {
            deliver(sink, &line, report);
        }
        if !report.started && report.sent + report.failed == 0 {
            deliver(sink, RAISE_COMMAND, report);
        }
    }
}

fn deliver<S: CommandSink>(sink: &mut S, line: &str, report: &mut BootstrapReport) {
    match sink.send_line(line) {
        Ok(()) => report.sent += 1,
        Err(_) => report.failed += 1,
    }
}
