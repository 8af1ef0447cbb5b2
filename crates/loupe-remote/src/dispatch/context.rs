//! Command handlers bound to a [`Viewer`].

use std::path::PathBuf;
use std::time::Duration;

use loupe_config::Config;
use tracing::{debug, info};

use crate::command::Action;
use crate::viewer::Viewer;

use super::DISPATCH_TARGET;
use super::collection::CommandCollection;
use super::errors::CommandError;
use super::paths::{collect_files_recursive, expand_tilde, is_collection_file};

/// Receiver of matched commands.
///
/// The dispatcher resolves a line to an [`Action`] and its argument, then
/// hands both to the context. Implementations own whatever state the
/// handlers need between lines.
pub trait CommandContext {
    /// Runs `action` with the argument extracted from the command line.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] when the argument is rejected; the viewer is
    /// left untouched in that case.
    fn apply(&mut self, action: Action, argument: &str) -> Result<(), CommandError>;
}

/// Slideshow delay bounds and the last accepted delay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideshowSettings {
    min_seconds: f64,
    max_seconds: f64,
    delay_tenths: u32,
}

impl SlideshowSettings {
    /// Delay applied before any `--delay=` command, in tenths of a second.
    pub const DEFAULT_DELAY_TENTHS: u32 = 100;

    /// Creates settings accepting delays within `[min_seconds, max_seconds]`.
    #[must_use]
    pub const fn new(min_seconds: f64, max_seconds: f64) -> Self {
        Self {
            min_seconds,
            max_seconds,
            delay_tenths: Self::DEFAULT_DELAY_TENTHS,
        }
    }

    /// Builds settings from the configured bounds.
    #[must_use]
    pub const fn from_config(config: &Config) -> Self {
        let (min_seconds, max_seconds) = config.slideshow_bounds();
        Self::new(min_seconds, max_seconds)
    }

    /// Current delay in tenths of a second.
    #[must_use]
    pub const fn delay_tenths(&self) -> u32 {
        self.delay_tenths
    }

    /// Current delay.
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.delay_tenths) * 100)
    }

    /// Validates `text` as seconds and stores it, rounded to tenths.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InvalidDelay`] for unparsable text and
    /// [`CommandError::DelayOutOfRange`] for values outside the bounds. The
    /// stored delay is unchanged on error.
    pub fn update(&mut self, text: &str) -> Result<Duration, CommandError> {
        let invalid = || CommandError::InvalidDelay {
            value: text.to_owned(),
        };
        let seconds: f64 = text.trim().parse().map_err(|_| invalid())?;
        if !(self.min_seconds..=self.max_seconds).contains(&seconds) {
            return Err(CommandError::DelayOutOfRange {
                value: seconds,
                min: self.min_seconds,
                max: self.max_seconds,
            });
        }
        let exact = Duration::try_from_secs_f64(seconds + 0.001).map_err(|_| invalid())?;
        self.delay_tenths = u32::try_from(exact.as_millis() / 100).map_err(|_| invalid())?;
        Ok(self.delay())
    }
}

/// Standard command handlers acting on a viewer.
#[derive(Debug)]
pub struct RemoteContext<V> {
    viewer: V,
    slideshow: SlideshowSettings,
    collection: Option<CommandCollection>,
}

impl<V: Viewer> RemoteContext<V> {
    /// Binds the handlers to `viewer`.
    pub fn new(viewer: V, slideshow: SlideshowSettings) -> Self {
        Self {
            viewer,
            slideshow,
            collection: None,
        }
    }

    /// Viewer driven by the handlers.
    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    /// Mutable access to the viewer, for local commands.
    pub fn viewer_mut(&mut self) -> &mut V {
        &mut self.viewer
    }

    /// Slideshow settings, including the last accepted delay.
    pub fn slideshow(&self) -> &SlideshowSettings {
        &self.slideshow
    }

    /// Collection assembled from `--list-add:`, if one exists.
    pub fn command_collection(&self) -> Option<&CommandCollection> {
        self.collection.as_ref()
    }

    fn open_file(&mut self, argument: &str) -> Result<(), CommandError> {
        let path = required_path(argument, "file:")?;
        if path.is_file() {
            if is_collection_file(&path) {
                self.viewer.open_collection(&path);
            } else {
                self.viewer.open_path(&path);
            }
        } else if path.is_dir() {
            self.viewer.open_path(&path);
        } else {
            info!(
                target: DISPATCH_TARGET,
                path = %path.display(),
                "remote sent a path that does not exist"
            );
        }
        Ok(())
    }

    fn slideshow_recurse(&mut self, argument: &str) -> Result<(), CommandError> {
        let root = required_path(argument, "--slideshow-recurse")?;
        let files = collect_files_recursive(&root);
        if files.is_empty() {
            debug!(
                target: DISPATCH_TARGET,
                path = %root.display(),
                "no files for recursive slideshow"
            );
            return Ok(());
        }
        self.viewer.slideshow_stop();
        self.viewer.slideshow_start_from_list(files);
        Ok(())
    }

    fn set_tools_hidden(&mut self, hidden: bool) {
        if self.viewer.tools_hidden() == Some(!hidden) {
            self.viewer.set_tools_hidden(hidden);
        }
    }

    fn list_add(&mut self, argument: &str) -> Result<(), CommandError> {
        if argument.is_empty() {
            return Err(CommandError::MissingPath {
                command: "--list-add:",
            });
        }
        let collection = self.collection.get_or_insert_with(CommandCollection::new);
        if collection.push(PathBuf::from(argument))
            && let Some(first) = collection.first()
        {
            self.viewer.show_collection(collection, first);
        }
        Ok(())
    }
}

impl<V: Viewer> CommandContext for RemoteContext<V> {
    fn apply(&mut self, action: Action, argument: &str) -> Result<(), CommandError> {
        match action {
            Action::NextImage => self.viewer.next_image(),
            Action::PreviousImage => self.viewer.previous_image(),
            Action::FirstImage => self.viewer.first_image(),
            Action::LastImage => self.viewer.last_image(),
            Action::FullscreenToggle => self.viewer.fullscreen_toggle(),
            Action::FullscreenStart => self.viewer.fullscreen_start(),
            Action::FullscreenStop => self.viewer.fullscreen_stop(),
            Action::SlideshowToggle => self.viewer.slideshow_toggle(),
            Action::SlideshowStart => self.viewer.slideshow_start(),
            Action::SlideshowStop => self.viewer.slideshow_stop(),
            Action::SlideshowRecurse => self.slideshow_recurse(argument)?,
            Action::SlideshowDelay => {
                let delay = self.slideshow.update(argument)?;
                self.viewer.set_slideshow_delay(delay);
            }
            Action::ToolsShow => self.set_tools_hidden(false),
            Action::ToolsHide => self.set_tools_hidden(true),
            Action::Quit => self.viewer.request_quit(),
            Action::OpenFile => self.open_file(argument)?,
            Action::ViewFile => {
                let path = required_path(argument, "view:")?;
                self.viewer.open_in_new_window(&path);
            }
            Action::ListClear => {
                if self.collection.take().is_some() {
                    debug!(target: DISPATCH_TARGET, "command-line collection cleared");
                }
            }
            Action::ListAdd => self.list_add(argument)?,
            Action::Raise => self.viewer.raise_window(),
        }
        Ok(())
    }
}

fn required_path(argument: &str, command: &'static str) -> Result<PathBuf, CommandError> {
    if argument.is_empty() {
        return Err(CommandError::MissingPath { command });
    }
    Ok(expand_tilde(argument))
}
