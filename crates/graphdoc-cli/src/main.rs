//! graphdoc CLI.
//!
//! Renders HTML or Markdown documentation for a GraphQL schema.
//!
//! # Architecture
//!
//! The CLI is organized around subcommands:
//! - `render` - Render a documentation page from a schema file
//! - `reference` - Print the types reference as JSON
//! - `completions` - Generate shell completions
//!
//! # Examples
//!
//! ```bash
//! # HTML to stdout
//! graphdoc render schema.graphql
//!
//! # Markdown with custom templates and variables
//! graphdoc render schema.graphql --format markdown --templates ./templates \
//!     --context title="Shop API" --context version=3 --output docs/api.md
//! ```

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use graphdoc_cli::commands::{self, reference::ReferenceArgs, render::RenderArgs};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// graphdoc - documentation generator for GraphQL schemas.
#[derive(Parser, Debug)]
#[command(name = "graphdoc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render documentation for a schema.
    ///
    /// # Examples
    ///
    /// ```bash
    /// graphdoc render schema.graphql --output docs/index.html
    /// graphdoc render schema.graphql --config graphdoc.toml
    /// ```
    Render(RenderArgs),

    /// Print the types reference of a schema as JSON.
    ///
    /// Useful when writing override templates: the output is the value
    /// bound to `reference`.
    Reference(ReferenceArgs),

    /// Generate shell completions.
    Completions {
        /// Target shell for completion generation
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    execute_command(cli.command)
}

/// Initializes logging infrastructure.
///
/// Sets up tracing with appropriate log levels based on verbosity flag.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("failed to initialize logging")?;

    Ok(())
}

/// Routes commands to their respective handlers.
///
/// # Errors
///
/// Returns an error if command execution fails.
fn execute_command(command: Commands) -> Result<()> {
    match command {
        Commands::Render(args) => commands::render::run(&args),
        Commands::Reference(args) => commands::reference::run(&args),
        Commands::Completions { shell } => {
            commands::completions::run(shell, &mut Cli::command());
            Ok(())
        }
    }
}
