//! Errors raised by command handlers.

use thiserror::Error;

/// Reasons a matched command was rejected without acting on the viewer.
#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    /// Slideshow delay lies outside the accepted range.
    #[error("slideshow delay {value} out of range ({min:.1} to {max:.1})")]
    DelayOutOfRange {
        /// Requested delay in seconds.
        value: f64,
        /// Smallest accepted delay in seconds.
        min: f64,
        /// Largest accepted delay in seconds.
        max: f64,
    },

    /// Slideshow delay is not a decimal number of seconds.
    #[error("invalid slideshow delay '{value}'")]
    InvalidDelay {
        /// Text received after the delay prefix.
        value: String,
    },

    /// Command requires a path but none followed the prefix.
    #[error("command '{command}' requires a path")]
    MissingPath {
        /// Long form of the command.
        command: &'static str,
    },
}
