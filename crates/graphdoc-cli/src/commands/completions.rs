//! Shell completion generation command.
//!
//! Generates shell completion scripts for bash, zsh, fish, and `PowerShell`.

use clap::Command;
use clap_complete::{Shell, generate};
use std::io::{self, Write};
use tracing::info;

/// Writes the completion script for `shell` to `out`.
///
/// # Examples
///
/// ```
/// use clap::Command;
/// use clap_complete::Shell;
/// use graphdoc_cli::commands::completions;
///
/// let mut script = Vec::new();
/// completions::generate_completions(Shell::Bash, &mut Command::new("graphdoc"), &mut script);
/// assert!(!script.is_empty());
/// ```
pub fn generate_completions(shell: Shell, cmd: &mut Command, out: &mut dyn Write) {
    info!("Generating {shell} completions");
    let name = cmd.get_name().to_string();
    generate(shell, cmd, name, out);
}

/// Prints the completion script for `shell` to stdout.
pub fn run(shell: Shell, cmd: &mut Command) {
    generate_completions(shell, cmd, &mut io::stdout());
}
