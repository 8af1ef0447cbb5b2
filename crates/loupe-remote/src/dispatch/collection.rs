//! The ephemeral collection built from `--list-add:` commands.

use std::path::{Path, PathBuf};

/// Display name of the collection assembled from remote list commands.
pub const COMMAND_COLLECTION_NAME: &str = "Command line";

/// Ordered list of paths received through `--list-add:`.
///
/// The collection exists only in memory; it is dropped by `--list-clear`
/// and never written to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandCollection {
    entries: Vec<PathBuf>,
}

impl CommandCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Name shown by the viewer for this collection.
    #[must_use]
    pub fn name(&self) -> &'static str {
        COMMAND_COLLECTION_NAME
    }

    /// Appends a path, returning `true` when it is the first entry.
    pub fn push(&mut self, path: PathBuf) -> bool {
        self.entries.push(path);
        self.entries.len() == 1
    }

    /// First entry, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Path> {
        self.entries.first().map(PathBuf::as_path)
    }

    /// Entries in the order they were added.
    #[must_use]
    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the collection holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
