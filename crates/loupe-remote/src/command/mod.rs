//! The remote command vocabulary.
//!
//! Every line received on the control socket is matched against an ordered
//! [`CommandTable`]. Commands that take an argument are matched by literal
//! prefix (short form first, then long form) and receive the remainder of the
//! line; all other commands must match a form exactly. The first matching
//! entry wins, so table order encodes precedence between overlapping
//! prefixes such as `file:` and `view:`.

use std::io::{self, Write};

mod table;

pub use self::table::{
    LIST_ADD_PREFIX, LIST_CLEAR_COMMAND, OPEN_FILE_PREFIX, RAISE_COMMAND, STANDARD_COMMANDS,
};

/// Operation performed when a command matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Advance to the next image.
    NextImage,
    /// Go back to the previous image.
    PreviousImage,
    /// Jump to the first image.
    FirstImage,
    /// Jump to the last image.
    LastImage,
    /// Toggle full screen.
    FullscreenToggle,
    /// Enter full screen.
    FullscreenStart,
    /// Leave full screen.
    FullscreenStop,
    /// Toggle the slideshow.
    SlideshowToggle,
    /// Start the slideshow.
    SlideshowStart,
    /// Stop the slideshow.
    SlideshowStop,
    /// Walk a directory recursively and run a slideshow over its files.
    SlideshowRecurse,
    /// Change the slideshow delay.
    SlideshowDelay,
    /// Show the tool panel.
    ToolsShow,
    /// Hide the tool panel.
    ToolsHide,
    /// Terminate the application.
    Quit,
    /// Open a file, directory, or collection.
    OpenFile,
    /// Open a file in a new viewer window.
    ViewFile,
    /// Discard the command-line collection.
    ListClear,
    /// Append a path to the command-line collection.
    ListAdd,
    /// Bring the main window to the front.
    Raise,
}

/// A single entry of the command table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandEntry {
    /// Short option form, for example `-n`.
    pub short: Option<&'static str>,
    /// Long option form, for example `--next` or `file:`.
    pub long: Option<&'static str>,
    /// Whether the command carries a trailing argument.
    pub takes_argument: bool,
    /// Whether the command should be passed to a freshly launched primary
    /// on its command line rather than over the socket.
    pub prefer_at_launch: bool,
    /// Operation to run.
    pub action: Action,
    /// Help text; entries without one are hidden from the help listing.
    pub description: Option<&'static str>,
}

impl CommandEntry {
    /// Matches `line` against this entry and returns the argument on success.
    ///
    /// Argument-taking entries match by prefix and yield the remainder of the
    /// line, which may be empty. Other entries require exact equality and
    /// yield an empty argument.
    #[must_use]
    pub fn matches<'a>(&self, line: &'a str) -> Option<&'a str> {
        let forms = [self.short, self.long];
        if self.takes_argument {
            forms
                .into_iter()
                .flatten()
                .find_map(|form| line.strip_prefix(form))
        } else {
            forms
                .into_iter()
                .flatten()
                .any(|form| form == line)
                .then_some("")
        }
    }

    /// Whether this entry opens a file (`file:`).
    #[must_use]
    pub fn is_file_open(&self) -> bool {
        self.action == Action::OpenFile
    }
}

/// Result of a successful table lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandMatch<'a> {
    /// Entry that matched.
    pub entry: &'static CommandEntry,
    /// Argument extracted from the line (empty for argument-less commands).
    pub argument: &'a str,
}

/// Ordered, immutable set of recognised commands.
#[derive(Debug, Clone, Copy)]
pub struct CommandTable {
    entries: &'static [CommandEntry],
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl CommandTable {
    /// Table of the commands understood by the viewer.
    #[must_use]
    pub const fn standard() -> Self {
        Self::new(STANDARD_COMMANDS)
    }

    /// Wraps an arbitrary ordered list of entries.
    #[must_use]
    pub const fn new(entries: &'static [CommandEntry]) -> Self {
        Self { entries }
    }

    /// Entries in precedence order.
    #[must_use]
    pub const fn entries(&self) -> &'static [CommandEntry] {
        self.entries
    }

    /// Finds the first entry matching `line`.
    #[must_use]
    pub fn find<'a>(&self, line: &'a str) -> Option<CommandMatch<'a>> {
        self.entries.iter().find_map(|entry| {
            entry
                .matches(line)
                .map(|argument| CommandMatch { entry, argument })
        })
    }

    /// Splits raw arguments into recognised commands and rejected arguments.
    ///
    /// Both lists preserve the input order.
    #[must_use]
    pub fn build_list<I, S>(&self, arguments: I) -> (Vec<String>, Vec<String>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        arguments
            .into_iter()
            .map(Into::into)
            .partition(|argument| self.find(argument).is_some())
    }

    /// Writes the user-facing command list.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the writer.
    pub fn render_help<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "Remote command list:")?;
        for entry in self.entries {
            let Some(description) = entry.description else {
                continue;
            };
            let separator = if entry.short.is_some() && entry.long.is_some() {
                ","
            } else {
                " "
            };
            writeln!(
                writer,
                "  {:<3}{separator} {:<20} {description}",
                entry.short.unwrap_or_default(),
                entry.long.unwrap_or_default(),
            )?;
        }
        writer.flush()
    }
}
