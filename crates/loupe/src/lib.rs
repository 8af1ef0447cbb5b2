//! Runtime for the `loupe` binary.
//!
//! One executable plays both roles of the single-instance protocol. Without
//! `--remote` it becomes the primary: it hosts the viewer and serves the
//! control socket. With `--remote` it is a short-lived control client that
//! forwards its arguments to the primary, launching one when none answers.
//! Configuration loading and the output streams can be substituted so the
//! argument handling is testable without touching the environment.

use std::ffi::OsString;
use std::io::Write;
use std::process::{self, ExitCode};

use clap::Parser;
use loupe_remote::command::CommandTable;
use loupe_remote::telemetry;

mod classify;
mod cli;
mod config;
mod errors;
mod headless;
mod primary;
mod remote;

use classify::classify;
use cli::{Cli, prepare_cli_arguments};
use config::split_config_arguments;
pub(crate) use config::{ConfigLoader, OrthoConfigLoader};
pub(crate) use errors::AppError;

/// What the runner decided to do after argument handling.
#[derive(Debug, PartialEq)]
enum Outcome {
    /// Return normally with the given exit code.
    Finished(ExitCode),
    /// Terminate the process immediately with the given status.
    Terminate(i32),
}

/// Runs loupe using the provided arguments and IO handles.
///
/// Remote mode never returns: it ends the process with
/// [`std::process::exit`] once its commands have been delivered.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    match run_with_loader(args, stdout, stderr, &OrthoConfigLoader) {
        Outcome::Finished(code) => code,
        Outcome::Terminate(status) => {
            let _ = stdout.flush();
            let _ = stderr.flush();
            process::exit(status)
        }
    }
}

fn run_with_loader<I, W, E, L>(args: I, stdout: &mut W, stderr: &mut E, loader: &L) -> Outcome
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    match execute(args, stdout, stderr, loader) {
        Ok(outcome) => outcome,
        Err(AppError::CliUsage(error)) if !error.use_stderr() => {
            let _ = write!(stdout, "{error}");
            Outcome::Finished(ExitCode::SUCCESS)
        }
        Err(error) => {
            let _ = writeln!(stderr, "{error}");
            Outcome::Finished(ExitCode::FAILURE)
        }
    }
}

fn execute<I, W, E, L>(
    args: I,
    stdout: &mut W,
    stderr: &mut E,
    loader: &L,
) -> Result<Outcome, AppError>
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    let args: Vec<OsString> = args.into_iter().collect();
    let split = split_config_arguments(&args);
    let rest = args.get(split.command_start..).unwrap_or_default();
    let cli = Cli::try_parse_from(prepare_cli_arguments(args.first(), rest))
        .map_err(AppError::CliUsage)?;
    let config = loader.load(&split.config_arguments)?;

    let table = CommandTable::standard();
    if cli.remote_help {
        table.render_help(stdout)?;
        return Ok(Outcome::Finished(ExitCode::SUCCESS));
    }

    let request = classify(&table, &cli.arguments)
        .map_err(|arguments| AppError::InvalidArguments { arguments })?;
    telemetry::initialise(&config)?;

    if cli.remote {
        let status = match remote::send_request(&config, &split, &request, stderr) {
            Ok(_) => 0,
            Err(error) => {
                writeln!(stderr, "{error}")?;
                1
            }
        };
        return Ok(Outcome::Terminate(status));
    }

    primary::run_primary(&config, cli.blank, &request)?;
    Ok(Outcome::Finished(ExitCode::SUCCESS))
}
