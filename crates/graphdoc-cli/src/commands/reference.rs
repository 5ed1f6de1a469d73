//! Reference command implementation.
//!
//! Prints the types reference built from a schema as pretty JSON, which is
//! exactly the data bound to `reference` in templates.

use crate::commands::read_schema;
use anyhow::{Context, Result};
use clap::Args;
use graphdoc_schema::{BuildReference, ReferenceBuilder, SchemaSource, TypesReference};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

/// Arguments of `graphdoc reference`.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceArgs {
    /// Schema file in GraphQL SDL (`-` reads stdin)
    pub schema: PathBuf,

    /// Only include types reachable from the root operation types
    #[arg(long)]
    pub reachable_only: bool,
}

/// Builds the types reference for `sdl`.
///
/// # Errors
///
/// Returns an error if the schema is invalid.
///
/// # Examples
///
/// ```
/// use graphdoc_cli::commands::reference::build_reference;
///
/// let reference = build_reference("type Query { a: Int } type Orphan { b: Int }", true).unwrap();
/// assert_eq!(reference.len(), 1);
/// ```
pub fn build_reference(sdl: &str, reachable_only: bool) -> Result<TypesReference> {
    let builder = ReferenceBuilder::new().include_unreachable(!reachable_only);
    Ok(builder.build(&SchemaSource::from(sdl))?)
}

/// Prints the types reference for the schema named in `args`.
///
/// # Errors
///
/// Returns an error if the schema cannot be read or parsed, or stdout cannot
/// be written.
pub fn run(args: &ReferenceArgs) -> Result<()> {
    let sdl = read_schema(&args.schema)?;
    let reference = build_reference(&sdl, args.reachable_only)
        .with_context(|| format!("failed to build reference for {}", args.schema.display()))?;

    info!("Built reference with {} types", reference.len());

    let json = serde_json::to_string_pretty(&reference).context("failed to serialize reference")?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}").context("failed to write reference to stdout")?;

    Ok(())
}
