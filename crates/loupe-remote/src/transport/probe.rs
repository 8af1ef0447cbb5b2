//! Liveness check for an existing control socket.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, warn};

use super::client::ClientConnection;

/// Tracing target for liveness probes.
pub const PROBE_TARGET: &str = concat!(env!("CARGO_CRATE_NAME"), "::probe");

/// Returns `true` when a primary accepts connections at `path`.
///
/// When nothing answers, whatever is left at `path` (a socket from a primary
/// that exited without cleaning up, or any other stray file) is removed so
/// the caller can bind afresh. Directories are left in place.
#[must_use]
pub fn is_live(path: &Path) -> bool {
    match ClientConnection::open(path) {
        Ok(connection) => {
            debug!(target: PROBE_TARGET, path = %path.display(), "primary answered probe");
            drop(connection);
            true
        }
        Err(error) => {
            debug!(target: PROBE_TARGET, path = %path.display(), %error, "no primary answered probe");
            remove_stale_entry(path);
            false
        }
    }
}

fn remove_stale_entry(path: &Path) {
    let removable = fs::symlink_metadata(path).is_ok_and(|metadata| !metadata.is_dir());
    if !removable {
        return;
    }
    match fs::remove_file(path) {
        Ok(()) => debug!(target: PROBE_TARGET, path = %path.display(), "removed stale control socket entry"),
        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
        Err(error) => {
            warn!(
                target: PROBE_TARGET,
                path = %path.display(),
                %error,
                "failed to remove stale control socket"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::os::unix::net::UnixListener;

    use super::*;

    #[test]
    fn live_listener_is_detected_and_kept() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(".command");
        let _listener = UnixListener::bind(&path).expect("bind listener");

        assert!(is_live(&path));
        assert!(path.exists());
    }

    #[test]
    fn stale_socket_is_removed() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(".command");
        drop(UnixListener::bind(&path).expect("bind listener"));
        assert!(path.exists());

        assert!(!is_live(&path));
        assert!(!path.exists());
    }

    #[test]
    fn stray_regular_file_is_not_live_and_removed() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(".command");
        fs::write(&path, b"junk").expect("write file");

        assert!(!is_live(&path));
        assert!(!path.exists());
    }

    #[test]
    fn directory_is_not_live_and_left_alone() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(".command");
        fs::create_dir(&path).expect("create dir");

        assert!(!is_live(&path));
        assert!(path.is_dir());
    }

    #[test]
    fn missing_path_is_not_live() {
        let dir = tempfile::tempdir().expect("temp dir");
        assert!(!is_live(&dir.path().join("absent")));
    }
}
