//! Single-instance control plane for the loupe image viewer.
//!
//! The first invocation becomes the primary: it binds a local control
//! socket and services it from a single-threaded reactor
//! ([`transport::ServerConnection`]), dispatching each received line
//! through the [`command::CommandTable`] to a [`viewer::Viewer`]. Later
//! invocations run the [`bootstrap`] procedure instead, connecting to the
//! primary (launching one if needed) and forwarding their arguments as
//! command lines.

pub mod bootstrap;
pub mod command;
pub mod dispatch;
pub mod telemetry;
pub mod transport;
pub mod viewer;

pub use bootstrap::{Bootstrap, BootstrapError, BootstrapReport, RemoteRequest};
pub use command::{Action, CommandEntry, CommandTable};
pub use dispatch::{CommandContext, CommandError, Dispatcher, LineHandler, RemoteContext};
pub use transport::{ClientConnection, Connection, ServerConnection, ServerError};
pub use viewer::Viewer;
