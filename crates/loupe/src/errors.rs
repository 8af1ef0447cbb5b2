//! Error types for the loupe binary.

use std::io;
use std::sync::Arc;

use thiserror::Error;

use loupe_remote::BootstrapError;
use loupe_remote::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("{}", invalid_arguments_message(.arguments))]
    InvalidArguments { arguments: Vec<String> },
    #[error("failed to initialise logging: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("failed to resolve the loupe executable: {0}")]
    ResolveProgram(io::Error),
    #[error("failed to install signal handlers: {0}")]
    Signals(io::Error),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
}

fn invalid_arguments_message(arguments: &[String]) -> String {
    let mut message = String::new();
    for argument in arguments {
        message.push_str("invalid or ignored: ");
        message.push_str(argument);
        message.push('\n');
    }
    message.push_str("Use --remote-help for valid remote options.");
    message
}
