//! Server side of the control channel and its single-threaded reactor.

use std::fs;
use std::io::{self, Read};
use std::net::Shutdown;
use std::os::fd::AsFd;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::time::Duration;

use nix::errno::Errno;
use nix::poll::{PollFd, PollFlags, PollTimeout, poll};
use tracing::{debug, info, warn};

use crate::dispatch::LineHandler;

use super::errors::ServerError;
use super::lines::{LineBuffer, LineTooLong};
use super::probe;
use super::{Connection, REACTOR_TARGET, Role};

pub(super) const READ_CHUNK_BYTES: usize = 4096;

/// Reads serviced per client on each readiness notification. Remaining
/// input is picked up on the next iteration.
pub(super) const MAX_READS_PER_WAKE: usize = 16;

/// Counters describing one reactor iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReactorEvents {
    /// Clients accepted into the active set.
    pub accepted: usize,
    /// Clients closed at accept time because the ceiling was reached.
    pub rejected: usize,
    /// Lines handed to the subscribed handler.
    pub dispatched: usize,
    /// Clients removed after hangup or read failure.
    pub disconnected: usize,
}

impl ReactorEvents {
    /// Whether nothing happened during the iteration.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug)]
struct ActiveClient {
    id: u64,
    stream: UnixStream,
    lines: LineBuffer,
}

struct Drained {
    lines: Vec<String>,
    closed: bool,
}

impl ActiveClient {
    fn drain(&mut self) -> Drained {
        let mut lines = Vec::new();
        let mut chunk = [0_u8; READ_CHUNK_BYTES];
        let mut reads = 0;
        while reads < MAX_READS_PER_WAKE {
            match self.stream.read(&mut chunk) {
                Ok(0) => {
                    if self.lines.pending_len() > 0 {
                        debug!(
                            target: REACTOR_TARGET,
                            client = self.id,
                            bytes = self.lines.pending_len(),
                            "dispatching unterminated line at end of stream"
                        );
                    }
                    self.lines.finish(&mut lines);
                    return Drained { lines, closed: true };
                }
                Ok(read) => {
                    reads += 1;
                    let bytes = chunk.get(..read).unwrap_or_default();
                    if let Err(LineTooLong) = self.lines.extend(bytes, &mut lines) {
                        warn!(target: REACTOR_TARGET, client = self.id, "remote command line too long");
                        return Drained { lines, closed: true };
                    }
                }
                Err(error) if error.kind() == io::ErrorKind::WouldBlock => {
                    return Drained { lines, closed: false };
                }
                Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
                Err(error) => {
                    warn!(target: REACTOR_TARGET, client = self.id, %error, "control client read failed");
                    return Drained { lines, closed: true };
                }
            }
        }
        Drained { lines, closed: false }
    }
}

/// Listening end of the control channel, owned by the primary.
///
/// All socket I/O is driven from [`ServerConnection::poll_once`] on the
/// caller's thread. A client that ends its stream mid-line still has that
/// final fragment dispatched. Complete lines from each client are handed to the
/// subscribed [`LineHandler`] in arrival order.
#[derive(Debug)]
pub struct ServerConnection<H> {
    path: PathBuf,
    listener: Option<UnixListener>,
    clients: Vec<ActiveClient>,
    max_clients: usize,
    next_client_id: u64,
    handler: Option<H>,
}

impl<H: LineHandler> ServerConnection<H> {
    /// Binds the control socket at `path`.
    ///
    /// Anything already at `path` is probed first: if a primary answers the
    /// open fails, otherwise the stale entry is removed and the path rebound.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::AddressInUse`] when another primary owns the
    /// socket, [`ServerError::NotASocket`] when `path` is a directory, and
    /// the remaining variants for filesystem or bind failures.
    pub fn open(path: &Path, max_clients: usize) -> Result<Self, ServerError> {
        match fs::symlink_metadata(path) {
            Ok(metadata) if metadata.is_dir() => {
                return Err(ServerError::NotASocket {
                    path: path.to_path_buf(),
                });
            }
            Ok(_) => {
                if probe::is_live(path) {
                    return Err(ServerError::AddressInUse {
                        path: path.to_path_buf(),
                    });
                }
                remove_existing(path)?;
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(ServerError::Metadata {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }

        let listener = UnixListener::bind(path).map_err(|source| ServerError::Bind {
            path: path.to_path_buf(),
            source,
        })?;
        listener
            .set_nonblocking(true)
            .map_err(|source| ServerError::NonBlocking { source })?;
        info!(target: REACTOR_TARGET, path = %path.display(), max_clients, "control socket listening");

        Ok(Self {
            path: path.to_path_buf(),
            listener: Some(listener),
            clients: Vec::new(),
            max_clients,
            next_client_id: 0,
            handler: None,
        })
    }

    /// Registers the handler receiving every complete line.
    ///
    /// Any previously subscribed handler is replaced.
    pub fn subscribe(&mut self, handler: H) {
        self.handler = Some(handler);
    }

    /// Subscribed handler, if any.
    pub fn handler(&self) -> Option<&H> {
        self.handler.as_ref()
    }

    /// Mutable access to the subscribed handler.
    pub fn handler_mut(&mut self) -> Option<&mut H> {
        self.handler.as_mut()
    }

    /// Number of connected clients.
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Ceiling on simultaneously connected clients.
    pub fn max_clients(&self) -> usize {
        self.max_clients
    }

    /// Waits up to `timeout` for socket activity and services it.
    ///
    /// `None` waits indefinitely. Readable clients are drained first and
    /// their lines dispatched in order; hung-up clients are then removed
    /// and closed; finally at most one pending connection is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Poll`] when readiness cannot be queried.
    /// Client I/O failures are logged and treated as hangups.
    pub fn poll_once(&mut self, timeout: Option<Duration>) -> Result<ReactorEvents, ServerError> {
        let mut events = ReactorEvents::default();
        let Some((listener_ready, client_flags)) = self.wait(timeout)? else {
            return Ok(events);
        };

        let mut hangups = Vec::new();
        for (client, flags) in self.clients.iter_mut().zip(client_flags) {
            if flags.is_empty() {
                continue;
            }
            let drained = client.drain();
            for line in &drained.lines {
                match self.handler.as_mut() {
                    Some(handler) => {
                        handler.handle_line(line);
                        events.dispatched += 1;
                    }
                    None => {
                        debug!(target: REACTOR_TARGET, command = %line, "no handler subscribed");
                    }
                }
            }
            if drained.closed || flags.intersects(PollFlags::POLLERR | PollFlags::POLLNVAL) {
                hangups.push(client.id);
            }
        }
        for id in hangups {
            self.disconnect(id);
            events.disconnected += 1;
        }

        if listener_ready {
            self.accept_one(&mut events);
        }
        Ok(events)
    }

    fn wait(&self, timeout: Option<Duration>) -> Result<Option<(bool, Vec<PollFlags>)>, ServerError> {
        let Some(listener) = self.listener.as_ref() else {
            return Ok(None);
        };
        let mut fds = Vec::with_capacity(self.clients.len() + 1);
        fds.push(PollFd::new(listener.as_fd(), PollFlags::POLLIN));
        fds.extend(
            self.clients
                .iter()
                .map(|client| PollFd::new(client.stream.as_fd(), PollFlags::POLLIN)),
        );

        match poll(&mut fds, poll_timeout(timeout)) {
            Ok(_) => {}
            Err(Errno::EINTR) => return Ok(None),
            Err(errno) => {
                return Err(ServerError::Poll {
                    source: io::Error::from(errno),
                });
            }
        }

        let mut flags = fds
            .iter()
            .map(|fd| fd.revents().unwrap_or_else(PollFlags::empty));
        let listener_ready = flags
            .next()
            .is_some_and(|revents| revents.contains(PollFlags::POLLIN));
        Ok(Some((listener_ready, flags.collect())))
    }

    fn accept_one(&mut self, events: &mut ReactorEvents) {
        let Some(listener) = self.listener.as_ref() else {
            return;
        };
        let stream = match listener.accept() {
            Ok((stream, _)) => stream,
            Err(error) if error.kind() == io::ErrorKind::WouldBlock => return,
            Err(error) => {
                warn!(target: REACTOR_TARGET, %error, "failed to accept control client");
                return;
            }
        };

        if self.clients.len() >= self.max_clients {
            warn!(
                target: REACTOR_TARGET,
                clients = self.clients.len(),
                max_clients = self.max_clients,
                "client ceiling reached, closing new connection"
            );
            drop(stream);
            events.rejected += 1;
            return;
        }
        if let Err(error) = stream.set_nonblocking(true) {
            warn!(target: REACTOR_TARGET, %error, "failed to make control client non-blocking");
            return;
        }

        let id = self.next_client_id;
        self.next_client_id += 1;
        self.clients.push(ActiveClient {
            id,
            stream,
            lines: LineBuffer::default(),
        });
        events.accepted += 1;
        debug!(target: REACTOR_TARGET, client = id, clients = self.clients.len(), "control client connected");
    }

    fn disconnect(&mut self, id: u64) {
        let Some(position) = self.clients.iter().position(|client| client.id == id) else {
            return;
        };
        let client = self.clients.remove(position);
        close_client(client);
        debug!(target: REACTOR_TARGET, client = id, clients = self.clients.len(), "control client disconnected");
    }

    /// Closes every client, stops listening, and removes the socket file.
    pub fn close(mut self) {
        self.shutdown();
    }
}

impl<H> ServerConnection<H> {
    fn shutdown(&mut self) {
        for client in self.clients.drain(..) {
            close_client(client);
        }
        if self.listener.take().is_none() {
            return;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => info!(target: REACTOR_TARGET, path = %self.path.display(), "control socket closed"),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {}
            Err(error) => {
                warn!(
                    target: REACTOR_TARGET,
                    path = %self.path.display(),
                    %error,
                    "failed to remove control socket"
                );
            }
        }
    }
}

impl<H> Connection for ServerConnection<H> {
    fn role(&self) -> Role {
        Role::Server
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl<H> Drop for ServerConnection<H> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn close_client(client: ActiveClient) {
    if let Err(error) = client.stream.shutdown(Shutdown::Both)
        && error.kind() != io::ErrorKind::NotConnected
    {
        debug!(target: REACTOR_TARGET, client = client.id, %error, "control client shutdown failed");
    }
}

fn remove_existing(path: &Path) -> Result<(), ServerError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(ServerError::Cleanup {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn poll_timeout(timeout: Option<Duration>) -> PollTimeout {
    timeout.map_or(PollTimeout::NONE, |duration| {
        PollTimeout::from(u16::try_from(duration.as_millis()).unwrap_or(u16::MAX))
    })
}
