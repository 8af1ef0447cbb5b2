//! Client side of the control channel.

use std::fs;
use std::io;
use std::os::unix::fs::FileTypeExt;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

use socket2::{Domain, SockAddr, SockRef, Socket, Type};
use tracing::{debug, warn};

use super::errors::{ConnectError, SendError};
use super::{Connection, REACTOR_TARGET, Role};

#[cfg(any(target_os = "linux", target_os = "android"))]
const SEND_FLAGS: libc::c_int = libc::MSG_NOSIGNAL;
#[cfg(not(any(target_os = "linux", target_os = "android")))]
const SEND_FLAGS: libc::c_int = 0;

/// Connection from a secondary invocation to the primary.
///
/// A client connection never dispatches commands; it only writes lines.
#[derive(Debug)]
pub struct ClientConnection {
    path: PathBuf,
    stream: UnixStream,
}

impl ClientConnection {
    /// Connects to the primary listening at `path`.
    ///
    /// A single bare newline is written immediately after connecting so the
    /// primary observes the connection even if no command follows.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError`] when `path` is missing, is not a socket, or
    /// refuses the connection.
    pub fn open(path: &Path) -> Result<Self, ConnectError> {
        let metadata = fs::metadata(path).map_err(|source| ConnectError::Connect {
            path: path.to_path_buf(),
            source,
        })?;
        if !metadata.file_type().is_socket() {
            return Err(ConnectError::NotASocket {
                path: path.to_path_buf(),
            });
        }

        let stream = connect_unix(path).map_err(|source| ConnectError::Connect {
            path: path.to_path_buf(),
            source,
        })?;
        let mut connection = Self {
            path: path.to_path_buf(),
            stream,
        };
        connection.write_all(b"\n").map_err(|error| ConnectError::Connect {
            path: path.to_path_buf(),
            source: error.into_io_error(),
        })?;
        debug!(target: REACTOR_TARGET, path = %path.display(), "connected to control socket");
        Ok(connection)
    }

    /// Writes `text` followed by a newline.
    ///
    /// A peer that has gone away is reported as [`SendError::BrokenPipe`]
    /// without raising `SIGPIPE`.
    ///
    /// # Errors
    ///
    /// Returns [`SendError`] when the write fails.
    pub fn send(&mut self, text: &str) -> Result<(), SendError> {
        let mut payload = Vec::with_capacity(text.len() + 1);
        payload.extend_from_slice(text.as_bytes());
        payload.push(b'\n');
        self.write_all(&payload).inspect_err(|error| match error {
            SendError::BrokenPipe { path } => {
                warn!(
                    target: REACTOR_TARGET,
                    path = %path.display(),
                    command = text,
                    "broken pipe while sending remote command"
                );
            }
            SendError::Write { path, source } => {
                warn!(
                    target: REACTOR_TARGET,
                    path = %path.display(),
                    command = text,
                    error = %source,
                    "failed to send remote command"
                );
            }
        })
    }

    fn write_all(&mut self, mut remaining: &[u8]) -> Result<(), SendError> {
        let socket = SockRef::from(&self.stream);
        while !remaining.is_empty() {
            match socket.send_with_flags(remaining, SEND_FLAGS) {
                Ok(0) => {
                    return Err(SendError::Write {
                        path: self.path.clone(),
                        source: io::ErrorKind::WriteZero.into(),
                    });
                }
                Ok(written) => remaining = remaining.get(written..).unwrap_or_default(),
                Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
                Err(error) if error.kind() == io::ErrorKind::BrokenPipe => {
                    return Err(SendError::BrokenPipe {
                        path: self.path.clone(),
                    });
                }
                Err(source) => {
                    return Err(SendError::Write {
                        path: self.path.clone(),
                        source,
                    });
                }
            }
        }
        Ok(())
    }
}

impl Connection for ClientConnection {
    fn role(&self) -> Role {
        Role::Client
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl SendError {
    fn into_io_error(self) -> io::Error {
        match self {
            Self::BrokenPipe { .. } => io::ErrorKind::BrokenPipe.into(),
            Self::Write { source, .. } => source,
        }
    }
}

fn connect_unix(path: &Path) -> io::Result<UnixStream> {
    let socket = Socket::new(Domain::UNIX, Type::STREAM, None)?;
    #[cfg(any(target_os = "macos", target_os = "ios", target_os = "tvos", target_os = "watchos"))]
    socket.set_nosigpipe(true)?;
    let address = SockAddr::unix(path)?;
    socket.connect(&address)?;
    Ok(socket.into())
}
