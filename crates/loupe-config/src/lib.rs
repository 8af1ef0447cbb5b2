//! Shared configuration for the loupe viewer and its control client.
//!
//! Values are layered by `ortho_config`: built-in defaults, then an optional
//! TOML file (`--config-path` or `LOUPE_CONFIG_PATH`), then `LOUPE_*`
//! environment variables, then command-line flags. Both the primary process
//! and the control client resolve the same [`Config`] so they agree on the
//! control socket location.

mod defaults;
mod logging;
mod socket;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    COMMAND_SOCKET_NAME, DEFAULT_LOG_FILTER, DEFAULT_MAX_CLIENTS, DEFAULT_SLIDESHOW_MAX_SECONDS,
    DEFAULT_SLIDESHOW_MIN_SECONDS, default_control_socket, default_log_filter,
    default_log_filter_string, default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use socket::{ControlSocket, SocketParseError, SocketPreparationError};

/// Resolved configuration shared by the primary and the control client.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "LOUPE")]
pub struct Config {
    /// Filesystem path of the control socket.
    #[ortho_config(default = default_control_socket())]
    pub control_socket: ControlSocket,
    /// `tracing` filter expression applied to log output.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Log output format.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Maximum number of simultaneously connected control clients.
    #[ortho_config(default = DEFAULT_MAX_CLIENTS)]
    pub max_clients: usize,
    /// Smallest slideshow delay accepted from remote commands, in seconds.
    #[ortho_config(default = DEFAULT_SLIDESHOW_MIN_SECONDS)]
    pub slideshow_min_seconds: f64,
    /// Largest slideshow delay accepted from remote commands, in seconds.
    #[ortho_config(default = DEFAULT_SLIDESHOW_MAX_SECONDS)]
    pub slideshow_max_seconds: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            control_socket: default_control_socket(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            max_clients: DEFAULT_MAX_CLIENTS,
            slideshow_min_seconds: DEFAULT_SLIDESHOW_MIN_SECONDS,
            slideshow_max_seconds: DEFAULT_SLIDESHOW_MAX_SECONDS,
        }
    }
}

impl Config {
    /// Control socket the primary binds and the control client connects to.
    #[must_use]
    pub const fn control_socket(&self) -> &ControlSocket {
        &self.control_socket
    }

    /// Log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Client ceiling enforced by the control server.
    #[must_use]
    pub const fn max_clients(&self) -> usize {
        self.max_clients
    }

    /// Inclusive range of slideshow delays, in seconds, accepted remotely.
    #[must_use]
    pub const fn slideshow_bounds(&self) -> (f64, f64) {
        (self.slideshow_min_seconds, self.slideshow_max_seconds)
    }
}
