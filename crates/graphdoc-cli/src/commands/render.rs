//! Render command implementation.
//!
//! Reads a schema, merges command-line flags with the optional config file,
//! and writes the rendered document to a file or stdout.

use crate::commands::read_schema;
use crate::config::FileConfig;
use anyhow::{Context, Result, bail};
use clap::Args;
use graphdoc_core::{OutputFormat, RenderContext, RenderOptions};
use graphdoc_render::RenderPipeline;
use graphdoc_schema::SchemaSource;
use serde_json::Value;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Arguments of `graphdoc render`.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderArgs {
    /// Schema file in GraphQL SDL (`-` reads stdin)
    pub schema: PathBuf,

    /// Output format [default: html]
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Directory with `*.hbs` templates overriding the built-in ones
    #[arg(short, long)]
    pub templates: Option<PathBuf>,

    /// Write the document to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Template variable in KEY=VALUE format; VALUE is parsed as JSON when
    /// possible
    #[arg(short, long = "context", num_args = 1)]
    pub context: Vec<String>,

    /// Skip the render cache
    #[arg(long)]
    pub no_cache: bool,

    /// TOML file with format, templates, output, and a [context] table
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Fully resolved render settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    /// Output format
    pub format: OutputFormat,
    /// Output file, stdout when `None`
    pub output: Option<PathBuf>,
    /// Options handed to the render pipeline
    pub options: RenderOptions,
}

impl RenderSettings {
    /// Merges command-line arguments over config file values.
    ///
    /// Context entries given on the command line replace file entries with
    /// the same key. Caching is turned off whenever a context is present.
    ///
    /// # Errors
    ///
    /// Returns an error if a `--context` entry is malformed.
    pub fn resolve(args: &RenderArgs, file: FileConfig) -> Result<Self> {
        let mut context = file.context;
        for entry in &args.context {
            let (key, value) = parse_context_entry(entry)?;
            context.insert(key, value);
        }

        let use_cache = !args.no_cache && context.is_empty();
        if !args.no_cache && !use_cache {
            debug!("Render context supplied, rendering without cache");
        }

        let mut options = RenderOptions::new()
            .with_context(context)
            .with_cache(use_cache);
        if let Some(templates) = args.templates.clone().or(file.templates) {
            options = options.with_templates_path(templates);
        }

        Ok(Self {
            format: args.format.or(file.format).unwrap_or_default(),
            output: args.output.clone().or(file.output),
            options,
        })
    }
}

/// Parses a `KEY=VALUE` context entry.
///
/// # Errors
///
/// Returns an error if the entry has no `=` or an empty key.
///
/// # Examples
///
/// ```
/// use graphdoc_cli::commands::render::parse_context_entry;
/// use serde_json::json;
///
/// assert_eq!(parse_context_entry("version=3").unwrap(), ("version".to_string(), json!(3)));
/// assert_eq!(parse_context_entry("title=Shop API").unwrap().1, json!("Shop API"));
/// assert!(parse_context_entry("novalue").is_err());
/// ```
pub fn parse_context_entry(entry: &str) -> Result<(String, Value)> {
    let Some((key, raw)) = entry.split_once('=') else {
        bail!("invalid context format: '{entry}' (expected KEY=VALUE)");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("invalid context format: '{entry}' (key cannot be empty)");
    }

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

/// Renders documentation for the schema named in `args`.
///
/// # Errors
///
/// Returns an error if the config file or schema cannot be read, rendering
/// fails, or the output cannot be written.
pub fn run(args: &RenderArgs) -> Result<()> {
    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = RenderSettings::resolve(args, file)?;

    info!("Rendering {} as {}", args.schema.display(), settings.format);

    let schema = SchemaSource::from(read_schema(&args.schema)?);
    let document = RenderPipeline::new()
        .render(&schema, settings.format, &settings.options)
        .with_context(|| format!("failed to render {}", args.schema.display()))?;

    match &settings.output {
        Some(path) => write_document(path, &document)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(document.as_bytes())
                .context("failed to write document to stdout")?;
            stdout.flush().context("failed to flush stdout")?;
        }
    }

    Ok(())
}

fn write_document(path: &Path, document: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    fs::write(path, document)
        .with_context(|| format!("failed to write document to {}", path.display()))?;

    info!("Wrote {} bytes to {}", document.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(context: &[&str]) -> RenderArgs {
        RenderArgs {
            schema: PathBuf::from("schema.graphql"),
            context: context.iter().map(ToString::to_string).collect(),
            ..RenderArgs::default()
        }
    }

    #[test]
    fn test_parse_context_entry_json_values() {
        assert_eq!(parse_context_entry("flag=true").unwrap().1, json!(true));
        assert_eq!(parse_context_entry("tags=[\"a\",\"b\"]").unwrap().1, json!(["a", "b"]));
        assert_eq!(parse_context_entry("quoted=\"x\"").unwrap().1, json!("x"));
    }

    #[test]
    fn test_parse_context_entry_keeps_equals_in_value() {
        let (key, value) = parse_context_entry("query=a=b").unwrap();
        assert_eq!(key, "query");
        assert_eq!(value, json!("a=b"));
    }

    #[test]
    fn test_parse_context_entry_empty_value_is_string() {
        assert_eq!(parse_context_entry("empty=").unwrap().1, json!(""));
    }

    #[test]
    fn test_parse_context_entry_errors() {
        assert!(parse_context_entry("missing").is_err());
        assert!(parse_context_entry("=value").is_err());
    }

    #[test]
    fn test_resolve_defaults() {
        let settings = RenderSettings::resolve(&args(&[]), FileConfig::default()).unwrap();
        assert_eq!(settings.format, OutputFormat::Html);
        assert_eq!(settings.output, None);
        assert_eq!(settings.options, RenderOptions::default());
    }

    #[test]
    fn test_resolve_context_disables_cache() {
        let settings =
            RenderSettings::resolve(&args(&["title=Shop"]), FileConfig::default()).unwrap();
        assert!(!settings.options.use_cache);
        assert_eq!(settings.options.context.get("title"), Some(&json!("Shop")));
        assert!(settings.options.validate().is_ok());
    }

    #[test]
    fn test_resolve_flags_override_file() {
        let file = FileConfig {
            format: Some(OutputFormat::Markdown),
            templates: Some(PathBuf::from("/file/templates")),
            output: Some(PathBuf::from("/file/out.md")),
            context: [("title", "File"), ("owner", "team")].into_iter().collect(),
        };
        let cli = RenderArgs {
            format: Some(OutputFormat::Html),
            output: Some(PathBuf::from("/cli/out.html")),
            ..args(&["title=Cli"])
        };

        let settings = RenderSettings::resolve(&cli, file).unwrap();
        assert_eq!(settings.format, OutputFormat::Html);
        assert_eq!(settings.output, Some(PathBuf::from("/cli/out.html")));
        assert_eq!(
            settings.options.templates_path(),
            Some(Path::new("/file/templates"))
        );

        let expected: RenderContext = [("title", "Cli"), ("owner", "team")].into_iter().collect();
        assert_eq!(settings.options.context, expected);
    }

    #[test]
    fn test_resolve_no_cache_flag() {
        let cli = RenderArgs {
            no_cache: true,
            ..args(&[])
        };
        let settings = RenderSettings::resolve(&cli, FileConfig::default()).unwrap();
        assert!(!settings.options.use_cache);
    }
}
