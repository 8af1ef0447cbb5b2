//! Path helpers shared by the file-oriented command handlers.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::DISPATCH_TARGET;

/// File extension identifying saved collections.
pub const COLLECTION_EXTENSION: &str = "lpc";

/// Replaces a leading `~` component with the current user's home directory.
#[must_use]
pub fn expand_tilde(text: &str) -> PathBuf {
    let home = || dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));
    if text == "~" {
        return home();
    }
    match text.strip_prefix("~/") {
        Some(rest) => home().join(rest),
        None => PathBuf::from(text),
    }
}

/// Whether `path` names a collection file by extension.
#[must_use]
pub fn is_collection_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case(COLLECTION_EXTENSION))
}

/// Collects every non-hidden file below `root`.
///
/// Files of a directory come first in name order, followed by the contents
/// of its subdirectories, also in name order. Unreadable directories are
/// skipped.
#[must_use]
pub fn collect_files_recursive(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    walk(root, &mut files);
    files
}

fn walk(directory: &Path, files: &mut Vec<PathBuf>) {
    let entries = match sorted_entries(directory) {
        Ok(entries) => entries,
        Err(error) => {
            debug!(
                target: DISPATCH_TARGET,
                path = %directory.display(),
                %error,
                "skipping unreadable directory"
            );
            return;
        }
    };

    let (directories, plain): (Vec<_>, Vec<_>) = entries.into_iter().partition(|path| path.is_dir());
    files.extend(plain.into_iter().filter(|path| path.is_file()));
    for child in directories {
        walk(&child, files);
    }
}

fn sorted_entries(directory: &Path) -> io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        paths.push(entry.path());
    }
    paths.sort();
    Ok(paths)
}
