//! Seams between the bootstrap and the control socket.

use std::path::{Path, PathBuf};

use crate::transport::{ClientConnection, ConnectError, SendError};

/// Destination for command lines once a primary is reachable.
pub trait CommandSink {
    /// Sends one command line.
    ///
    /// # Errors
    ///
    /// Returns [`SendError`] when the line could not be written.
    fn send_line(&mut self, line: &str) -> Result<(), SendError>;
}

impl CommandSink for ClientConnection {
    fn send_line(&mut self, line: &str) -> Result<(), SendError> {
        self.send(line)
    }
}

/// Opens connections to the primary.
pub trait Connector {
    /// Connection type produced on success.
    type Sink: CommandSink;

    /// Attempts a single connection without retrying.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError`] when no primary accepts the connection.
    fn connect(&mut self) -> Result<Self::Sink, ConnectError>;
}

/// Connects to the control socket at a fixed path.
#[derive(Debug, Clone)]
pub struct SocketConnector {
    path: PathBuf,
}

impl SocketConnector {
    /// Targets the control socket at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Control socket path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Connector for SocketConnector {
    type Sink = ClientConnection;

    fn connect(&mut self) -> Result<Self::Sink, ConnectError> {
        ClientConnection::open(&self.path)
    }
}
