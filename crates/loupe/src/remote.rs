//! Control client mode.

use std::env;
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;

use loupe_config::Config;
use loupe_remote::bootstrap::{Bootstrap, LaunchInvocation, ProcessLauncher, SocketConnector};
use loupe_remote::{BootstrapReport, RemoteRequest};
use tracing::info;

use crate::AppError;
use crate::config::ConfigArgumentSplit;

/// Environment variable overriding the program launched as primary.
pub(crate) const PROGRAM_OVERRIDE_ENV: &str = "LOUPE_BIN";

const REMOTE_TARGET: &str = concat!(env!("CARGO_CRATE_NAME"), "::remote");

/// Delivers `request` to the primary, launching one with the same
/// configuration flags when none is running.
pub(crate) fn send_request<E: Write>(
    config: &Config,
    split: &ConfigArgumentSplit,
    request: &RemoteRequest,
    progress: &mut E,
) -> Result<BootstrapReport, AppError> {
    let mut invocation = LaunchInvocation::new(resolve_program()?);
    invocation.args(split.forwarded());

    let connector = SocketConnector::new(config.control_socket().path().as_std_path());
    let mut bootstrap = Bootstrap::new(connector, ProcessLauncher, invocation);
    let report = bootstrap.send_all(request, progress)?;
    info!(
        target: REMOTE_TARGET,
        started = report.started,
        sent = report.sent,
        failed = report.failed,
        "remote request delivered"
    );
    Ok(report)
}

fn resolve_program() -> Result<OsString, AppError> {
    if let Some(program) = env::var_os(PROGRAM_OVERRIDE_ENV) {
        return Ok(program);
    }
    env::current_exe()
        .map(PathBuf::into_os_string)
        .map_err(AppError::ResolveProgram)
}
