//! Entrypoint for the loupe viewer and its remote control client.
//!
//! The binary delegates to [`loupe::run`], which picks primary or remote
//! mode from the command line.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    loupe::run(std::env::args_os(), &mut stdout, &mut stderr)
}
