//! Error types for control socket operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced while opening or running the server side of the channel.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("control socket {} is held by a running primary", path.display())]
    AddressInUse { path: PathBuf },
    #[error("control socket path {} is a directory", path.display())]
    NotASocket { path: PathBuf },
    #[error("failed to read metadata for control socket {}: {source}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to remove stale control socket {}: {source}", path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to bind control socket {}: {source}", path.display())]
    Bind {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to enable non-blocking control socket: {source}")]
    NonBlocking {
        #[source]
        source: io::Error,
    },
    #[error("failed to wait for control socket readiness: {source}")]
    Poll {
        #[source]
        source: io::Error,
    },
}

/// Errors surfaced while connecting to a primary.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("control socket path {} is not a socket", path.display())]
    NotASocket { path: PathBuf },
    #[error("failed to connect to control socket {}: {source}", path.display())]
    Connect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors surfaced while writing a command line to a primary.
#[derive(Debug, Error)]
pub enum SendError {
    /// The primary closed its end of the connection.
    #[error("broken pipe writing to control socket {}", path.display())]
    BrokenPipe { path: PathBuf },
    /// Any other write failure.
    #[error("failed to write to control socket {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
