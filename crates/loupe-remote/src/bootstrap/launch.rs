//! Launching a detached primary process.

use std::ffi::{OsStr, OsString};
use std::io;
use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};

/// Flag asking a freshly launched primary not to load a default view.
pub const BLANK_FLAG: &str = "--blank";

/// Program and arguments used to start a primary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchInvocation {
    program: OsString,
    arguments: Vec<OsString>,
}

impl LaunchInvocation {
    /// Starts an invocation of `program` with no arguments.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            arguments: Vec::new(),
        }
    }

    /// Appends one argument.
    pub fn arg(&mut self, argument: impl AsRef<OsStr>) -> &mut Self {
        self.arguments.push(argument.as_ref().to_os_string());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(&mut self, arguments: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for argument in arguments {
            self.arg(argument);
        }
        self
    }

    /// Program to execute.
    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// Arguments passed to the program.
    pub fn arguments(&self) -> &[OsString] {
        &self.arguments
    }
}

/// Starts primary processes.
pub trait Launcher {
    /// Starts `invocation` without waiting for it to finish.
    ///
    /// # Errors
    ///
    /// Returns the spawn failure.
    fn launch(&mut self, invocation: &LaunchInvocation) -> io::Result<()>;
}

/// Spawns the primary as a detached background process.
///
/// The child runs in its own process group with standard streams redirected
/// to the null device, so it outlives the control client and never holds the
/// client's terminal or pipes open.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(&mut self, invocation: &LaunchInvocation) -> io::Result<()> {
        Command::new(invocation.program())
            .args(invocation.arguments())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .process_group(0)
            .spawn()
            .map(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invocation_collects_arguments_in_order() {
        let mut invocation = LaunchInvocation::new("/usr/bin/loupe");
        invocation.arg("-f").args(["+t", BLANK_FLAG]);
        assert_eq!(invocation.program(), OsStr::new("/usr/bin/loupe"));
        assert_eq!(invocation.arguments(), ["-f", "+t", "--blank"].map(OsString::from));
    }

    #[test]
    fn process_launcher_reports_missing_program() {
        let invocation = LaunchInvocation::new("/nonexistent/loupe-primary");
        let error = ProcessLauncher
            .launch(&invocation)
            .expect_err("missing binary");
        assert_eq!(error.kind(), io::ErrorKind::NotFound);
    }
}
