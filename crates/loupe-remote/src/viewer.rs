//! The host application surface driven by remote commands.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::dispatch::CommandCollection;

/// Operations the image viewer exposes to the control plane.
///
/// The remote layer never touches windows or images directly: every command
/// handler resolves to one or more calls on this trait. Implementations run
/// on the reactor thread and must not block on network I/O.
pub trait Viewer {
    /// Advances to the next image.
    fn next_image(&mut self);
    /// Returns to the previous image.
    fn previous_image(&mut self);
    /// Jumps to the first image.
    fn first_image(&mut self);
    /// Jumps to the last image.
    fn last_image(&mut self);

    /// Toggles full screen.
    fn fullscreen_toggle(&mut self);
    /// Enters full screen.
    fn fullscreen_start(&mut self);
    /// Leaves full screen.
    fn fullscreen_stop(&mut self);

    /// Toggles the slideshow.
    fn slideshow_toggle(&mut self);
    /// Starts the slideshow over the current image list.
    fn slideshow_start(&mut self);
    /// Stops the slideshow.
    fn slideshow_stop(&mut self);
    /// Starts a slideshow over an explicit list of files.
    fn slideshow_start_from_list(&mut self, paths: Vec<PathBuf>);
    /// Sets the delay between slideshow images.
    fn set_slideshow_delay(&mut self, delay: Duration);

    /// Whether the tool panel is hidden, or `None` when there is no panel.
    fn tools_hidden(&self) -> Option<bool>;
    /// Shows or hides the tool panel.
    fn set_tools_hidden(&mut self, hidden: bool);

    /// Points the main window at a file or directory.
    fn open_path(&mut self, path: &Path);
    /// Opens a saved collection file.
    fn open_collection(&mut self, path: &Path);
    /// Opens a file in a separate viewer window.
    fn open_in_new_window(&mut self, path: &Path);
    /// Displays the command-line collection starting at `first`.
    fn show_collection(&mut self, collection: &CommandCollection, first: &Path);

    /// Brings the main window to the front.
    fn raise_window(&mut self);
    /// Asks the host to terminate once the current event has been handled.
    fn request_quit(&mut self);
}
