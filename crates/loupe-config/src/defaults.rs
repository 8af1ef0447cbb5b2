use camino::Utf8PathBuf;
use std::env;

#[cfg(unix)]
use libc::geteuid;

#[cfg(unix)]
use dirs::config_dir;

use crate::socket::ControlSocket;

/// File name of the control socket inside the per-user loupe directory.
pub const COMMAND_SOCKET_NAME: &str = ".command";

/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default ceiling on simultaneously connected control clients.
pub const DEFAULT_MAX_CLIENTS: usize = 8;

/// Default lower bound for remotely supplied slideshow delays.
pub const DEFAULT_SLIDESHOW_MIN_SECONDS: f64 = 0.1;

/// Default upper bound for remotely supplied slideshow delays.
pub const DEFAULT_SLIDESHOW_MAX_SECONDS: f64 = 3600.0;

/// Default log filter expression used by the binaries.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binaries.
#[must_use]
pub const fn default_log_format() -> crate::logging::LogFormat {
    crate::logging::LogFormat::Compact
}

/// Computes the default control socket path.
///
/// The socket lives in the user's configuration directory so that every
/// invocation by the same user finds the same primary. When no
/// configuration directory can be resolved the socket falls back to a
/// per-user directory under the system temporary directory.
#[must_use]
pub fn default_control_socket() -> ControlSocket {
    let (mut base, apply_namespace) = match config_base_directory() {
        Some(dir) => (dir, false),
        None => (fallback_base_directory(), true),
    };

    base.push("loupe");
    if apply_namespace {
        base.push(user_namespace());
    }

    ControlSocket::new(base.join(COMMAND_SOCKET_NAME))
}

#[cfg(unix)]
fn config_base_directory() -> Option<Utf8PathBuf> {
    config_dir().and_then(|path| Utf8PathBuf::from_path_buf(path).ok())
}

#[cfg(not(unix))]
fn config_base_directory() -> Option<Utf8PathBuf> {
    None
}

fn fallback_base_directory() -> Utf8PathBuf {
    let candidate = env::temp_dir();
    Utf8PathBuf::from_path_buf(candidate).unwrap_or_else(|_| Utf8PathBuf::from("/tmp"))
}

#[cfg(unix)]
fn user_namespace() -> String {
    // SAFETY: `geteuid` has no preconditions and cannot fail.
    let uid = unsafe { geteuid() };
    format!("uid-{uid}")
}

#[cfg(not(unix))]
fn user_namespace() -> String {
    String::from("default")
}
