use super::{Action, CommandEntry};

const fn entry(
    short: Option<&'static str>,
    long: &'static str,
    takes_argument: bool,
    prefer_at_launch: bool,
    action: Action,
    description: Option<&'static str>,
) -> CommandEntry {
    CommandEntry {
        short,
        long: Some(long),
        takes_argument,
        prefer_at_launch,
        action,
        description,
    }
}

/// Commands understood by the viewer, in matching precedence order.
#[rustfmt::skip]
pub static STANDARD_COMMANDS: &[CommandEntry] = &[
    entry(Some("-n"), "--next", false, false, Action::NextImage, Some("next image")),
    entry(Some("-b"), "--back", false, false, Action::PreviousImage, Some("previous image")),
    entry(None, "--first", false, false, Action::FirstImage, Some("first image")),
    entry(None, "--last", false, false, Action::LastImage, Some("last image")),
    entry(Some("-f"), "--fullscreen", false, true, Action::FullscreenToggle, Some("toggle full screen")),
    entry(Some("-fs"), "--fullscreen-start", false, false, Action::FullscreenStart, Some("start full screen")),
    entry(Some("-fS"), "--fullscreen-stop", false, false, Action::FullscreenStop, Some("stop full screen")),
    entry(Some("-s"), "--slideshow", false, true, Action::SlideshowToggle, Some("toggle slide show")),
    entry(Some("-ss"), "--slideshow-start", false, false, Action::SlideshowStart, Some("start slide show")),
    entry(Some("-sS"), "--slideshow-stop", false, false, Action::SlideshowStop, Some("stop slide show")),
    entry(Some("-sr"), "--slideshow-recurse", true, false, Action::SlideshowRecurse, Some("start recursive slide show")),
    entry(Some("-d"), "--delay=", true, false, Action::SlideshowDelay, Some("set slide show delay in seconds")),
    entry(Some("+t"), "--tools-show", false, true, Action::ToolsShow, Some("show tools")),
    entry(Some("-t"), "--tools-hide", false, true, Action::ToolsHide, Some("hide tools")),
    entry(Some("-q"), "--quit", false, false, Action::Quit, Some("quit")),
    entry(None, "file:", true, false, Action::OpenFile, Some("open file")),
    entry(None, "view:", true, false, Action::ViewFile, Some("open file in new window")),
    entry(None, "--list-clear", false, false, Action::ListClear, None),
    entry(None, "--list-add:", true, false, Action::ListAdd, None),
    entry(None, "raise", false, false, Action::Raise, None),
];

/// Prefix of the command that opens a file, directory, or collection.
pub const OPEN_FILE_PREFIX: &str = "file:";

/// Command that empties the command-line collection.
pub const LIST_CLEAR_COMMAND: &str = "--list-clear";

/// Prefix of the command that appends to the command-line collection.
pub const LIST_ADD_PREFIX: &str = "--list-add:";

/// Command that brings the primary's window forward.
pub const RAISE_COMMAND: &str = "raise";
