//! Error types for the control client bootstrap.

use std::ffi::OsString;
use std::io;

use thiserror::Error;

/// Failures that end a control client invocation.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("failed to launch primary '{}': {source}", program.to_string_lossy())]
    Launch {
        program: OsString,
        #[source]
        source: io::Error,
    },
    #[error("remote not available after {attempts} connection attempts")]
    RemoteUnavailable { attempts: u32 },
    #[error("failed to write progress output: {0}")]
    Output(#[from] io::Error),
}
