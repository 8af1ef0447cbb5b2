//! Reference viewer host without a graphical front end.

use std::path::{Path, PathBuf};
use std::time::Duration;

use loupe_remote::Viewer;
use loupe_remote::dispatch::CommandCollection;
use tracing::info;

const VIEWER_TARGET: &str = concat!(env!("CARGO_CRATE_NAME"), "::viewer");

/// Tracks viewer state and logs every request made of it.
#[derive(Debug, Default)]
pub(crate) struct HeadlessViewer {
    current: Option<PathBuf>,
    position: usize,
    fullscreen: bool,
    slideshow: bool,
    slideshow_list: Vec<PathBuf>,
    slideshow_delay: Option<Duration>,
    tools_hidden: bool,
    windows: Vec<PathBuf>,
    collection: Option<(String, PathBuf)>,
    quit_requested: bool,
}

impl HeadlessViewer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Whether a quit command has been received.
    pub(crate) fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Logs the final state when the host shuts down.
    pub(crate) fn log_final_state(&self) {
        info!(
            target: VIEWER_TARGET,
            current = ?self.current,
            position = self.position,
            fullscreen = self.fullscreen,
            slideshow = self.slideshow,
            slideshow_files = self.slideshow_list.len(),
            slideshow_delay_ms = ?self.slideshow_delay.map(|delay| delay.as_millis()),
            tools_hidden = self.tools_hidden,
            windows = self.windows.len(),
            collection = ?self.collection.as_ref().map(|(name, _)| name),
            "viewer closed"
        );
    }

    #[cfg(test)]
    pub(crate) fn current(&self) -> Option<&Path> {
        self.current.as_deref()
    }

    #[cfg(test)]
    pub(crate) fn fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn step(&mut self, action: &'static str, position: usize) {
        self.position = position;
        info!(target: VIEWER_TARGET, action, position, "image changed");
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
        info!(target: VIEWER_TARGET, fullscreen, "full screen changed");
    }

    fn set_slideshow(&mut self, running: bool) {
        self.slideshow = running;
        info!(target: VIEWER_TARGET, running, "slideshow changed");
    }
}

impl Viewer for HeadlessViewer {
    fn next_image(&mut self) {
        self.step("next", self.position.saturating_add(1));
    }

    fn previous_image(&mut self) {
        self.step("previous", self.position.saturating_sub(1));
    }

    fn first_image(&mut self) {
        self.step("first", 0);
    }

    fn last_image(&mut self) {
        self.step("last", usize::MAX);
    }

    fn fullscreen_toggle(&mut self) {
        self.set_fullscreen(!self.fullscreen);
    }

    fn fullscreen_start(&mut self) {
        self.set_fullscreen(true);
    }

    fn fullscreen_stop(&mut self) {
        self.set_fullscreen(false);
    }

    fn slideshow_toggle(&mut self) {
        self.set_slideshow(!self.slideshow);
    }

    fn slideshow_start(&mut self) {
        self.set_slideshow(true);
    }

    fn slideshow_stop(&mut self) {
        self.set_slideshow(false);
    }

    fn slideshow_start_from_list(&mut self, paths: Vec<PathBuf>) {
        info!(target: VIEWER_TARGET, files = paths.len(), "slideshow started from list");
        self.slideshow_list = paths;
        self.slideshow = true;
    }

    fn set_slideshow_delay(&mut self, delay: Duration) {
        info!(target: VIEWER_TARGET, delay_ms = delay.as_millis(), "slideshow delay changed");
        self.slideshow_delay = Some(delay);
    }

    fn tools_hidden(&self) -> Option<bool> {
        Some(self.tools_hidden)
    }

    fn set_tools_hidden(&mut self, hidden: bool) {
        info!(target: VIEWER_TARGET, hidden, "tool panel changed");
        self.tools_hidden = hidden;
    }

    fn open_path(&mut self, path: &Path) {
        info!(target: VIEWER_TARGET, path = %path.display(), "opened path");
        self.current = Some(path.to_path_buf());
        self.position = 0;
    }

    fn open_collection(&mut self, path: &Path) {
        info!(target: VIEWER_TARGET, path = %path.display(), "opened collection");
        self.collection = Some((path.display().to_string(), path.to_path_buf()));
    }

    fn open_in_new_window(&mut self, path: &Path) {
        info!(target: VIEWER_TARGET, path = %path.display(), "opened new window");
        self.windows.push(path.to_path_buf());
    }

    fn show_collection(&mut self, collection: &CommandCollection, first: &Path) {
        info!(
            target: VIEWER_TARGET,
            name = collection.name(),
            entries = collection.len(),
            first = %first.display(),
            "showing collection"
        );
        self.collection = Some((collection.name().to_owned(), first.to_path_buf()));
        self.current = Some(first.to_path_buf());
    }

    fn raise_window(&mut self) {
        info!(target: VIEWER_TARGET, "window raised");
    }

    fn request_quit(&mut self) {
        info!(target: VIEWER_TARGET, "quit requested");
        self.quit_requested = true;
    }
}
