//! CLI argument definitions for the loupe binary.

use std::ffi::OsString;

use clap::Parser;

/// Mode flags that must precede image paths and remote commands.
const MODE_FLAGS: &[&str] = &[
    "-r",
    "--remote",
    "--remote-help",
    "--blank",
    "-h",
    "--help",
    "-V",
    "--version",
];

/// Single-instance image viewer with a local remote-control channel.
#[derive(Parser, Debug)]
#[command(name = "loupe", version)]
pub(crate) struct Cli {
    /// Forwards the remaining arguments to the running viewer, starting one
    /// if necessary.
    #[arg(short = 'r', long)]
    pub(crate) remote: bool,
    /// Lists the commands understood in remote mode and exits.
    #[arg(long)]
    pub(crate) remote_help: bool,
    /// Starts without opening the current directory.
    #[arg(long)]
    pub(crate) blank: bool,
    /// Remote commands, image files, directories, and collections.
    #[arg(value_name = "ARG", num_args = 0..)]
    pub(crate) arguments: Vec<String>,
}

/// Rebuilds the argument list for clap.
///
/// Leading mode flags are kept as flags; everything after them is placed
/// behind `--` so remote commands such as `-f` or `--delay=5` reach
/// [`Cli::arguments`] verbatim.
pub(crate) fn prepare_cli_arguments(program: Option<&OsString>, rest: &[OsString]) -> Vec<OsString> {
    let mut cli_arguments: Vec<OsString> = program.cloned().into_iter().collect();
    let flags = rest
        .iter()
        .take_while(|argument| {
            argument
                .to_str()
                .is_some_and(|text| MODE_FLAGS.contains(&text))
        })
        .count();
    let (mode, trailing) = rest.split_at(flags);
    cli_arguments.extend(mode.iter().cloned());
    if !trailing.is_empty() {
        cli_arguments.push(OsString::from("--"));
        cli_arguments.extend(trailing.iter().cloned());
    }
    cli_arguments
}
