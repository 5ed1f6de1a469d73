//! Render configuration file.
//!
//! Settings for `graphdoc render` can be kept in a TOML file and passed with
//! `--config`. Every key is optional and command-line flags take precedence.
//!
//! # Examples
//!
//! ```toml
//! format = "markdown"
//! templates = "./doc-templates"
//! output = "docs/schema.md"
//!
//! [context]
//! title = "Shop API"
//! version = 3
//! ```

use anyhow::{Context, Result};
use graphdoc_core::{OutputFormat, RenderContext};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Contents of a render configuration file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Output format (`html`, `markdown`, or `md`)
    pub format: Option<OutputFormat>,

    /// Override template directory
    pub templates: Option<PathBuf>,

    /// Output file
    pub output: Option<PathBuf>,

    /// Extra template variables
    #[serde(default)]
    pub context: RenderContext,
}

impl FileConfig {
    /// Loads and parses a configuration file.
    ///
    /// Relative `templates` and `output` paths are resolved against the
    /// directory containing the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for
    /// this structure.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        let mut config = Self::from_toml_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;

        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this structure.
    ///
    /// # Examples
    ///
    /// ```
    /// use graphdoc_cli::FileConfig;
    /// use graphdoc_core::OutputFormat;
    ///
    /// let config = FileConfig::from_toml_str("format = \"md\"\n[context]\ntitle = \"API\"").unwrap();
    /// assert_eq!(config.format, Some(OutputFormat::Markdown));
    /// assert_eq!(config.context.len(), 1);
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        for path in [&mut self.templates, &mut self.output].into_iter().flatten() {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}
