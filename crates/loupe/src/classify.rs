//! Sorting of command-line arguments into commands and paths.

use std::path::{self, Path};

use loupe_remote::RemoteRequest;
use loupe_remote::command::CommandTable;
use loupe_remote::dispatch::is_collection_file;

/// Builds a [`RemoteRequest`] from raw arguments.
///
/// Recognised commands are kept in order. Any other argument must name an
/// existing directory (the first becomes the target), collection file, or
/// other file; paths are made absolute so a primary running elsewhere
/// resolves them identically.
///
/// # Errors
///
/// Returns every argument that is neither a command nor an existing path.
pub(crate) fn classify(
    table: &CommandTable,
    arguments: &[String],
) -> Result<RemoteRequest, Vec<String>> {
    let (commands, candidates) = table.build_list(arguments.iter().cloned());
    let mut request = RemoteRequest {
        commands,
        ..RemoteRequest::default()
    };
    let mut invalid = Vec::new();

    for candidate in candidates {
        let Ok(absolute) = path::absolute(Path::new(&candidate)) else {
            invalid.push(candidate);
            continue;
        };
        if absolute.is_dir() {
            if request.target.is_none() {
                request.target = Some(absolute);
            }
        } else if absolute.is_file() {
            if is_collection_file(&absolute) {
                request.collections.push(absolute);
            } else {
                request.files.push(absolute);
            }
        } else {
            invalid.push(candidate);
        }
    }

    if invalid.is_empty() {
        Ok(request)
    } else {
        Err(invalid)
    }
}
