//! Local socket transport for the control channel.
//!
//! The primary owns a [`ServerConnection`] bound to the control socket and
//! services it from a single-threaded reactor. Secondary invocations open a
//! short-lived [`ClientConnection`], write newline-terminated commands, and
//! disconnect. No responses flow back to the client.

use std::path::Path;

mod client;
mod errors;
mod lines;
mod probe;
mod server;
#[cfg(test)]
mod test_utils;

pub use self::client::ClientConnection;
pub use self::errors::{ConnectError, SendError, ServerError};
pub use self::probe::{PROBE_TARGET, is_live};
pub use self::server::{ReactorEvents, ServerConnection};

/// Tracing target for reactor and connection events.
pub const REACTOR_TARGET: &str = concat!(env!("CARGO_CRATE_NAME"), "::reactor");

/// Which end of the control channel a connection represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The primary, listening for commands.
    Server,
    /// A secondary invocation forwarding commands.
    Client,
}

/// Behaviour shared by both ends of the control channel.
pub trait Connection {
    /// Which end this connection represents.
    fn role(&self) -> Role;
    /// Filesystem path of the control socket.
    fn path(&self) -> &Path;
}
