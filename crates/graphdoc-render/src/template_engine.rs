//! Template engine for documentation rendering using Handlebars.
//!
//! Each engine serves one [`OutputFormat`] and starts with that format's
//! built-in template set. An override directory can be layered on top:
//! same-name templates replace built-ins, every other name still resolves
//! to the built-in version.
//!
//! # Examples
//!
//! ```
//! use graphdoc_core::OutputFormat;
//! use graphdoc_render::TemplateEngine;
//! use serde_json::json;
//!
//! let mut engine = TemplateEngine::new(OutputFormat::Html).unwrap();
//! engine.register_template_string("greeting", "Hello {{slugify name}}").unwrap();
//! let result = engine.render("greeting", &json!({"name": "Big World"})).unwrap();
//! assert_eq!(result, "Hello big-world");
//! ```

use crate::helpers;
use graphdoc_core::{Error, OutputFormat, Result};
use handlebars::Handlebars;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extension of override templates.
pub const TEMPLATE_EXTENSION: &str = "hbs";

const HTML_TEMPLATES: &[(&str, &str)] = &[
    ("index", include_str!("../templates/html/index.hbs")),
    ("type", include_str!("../templates/html/type.hbs")),
    ("field", include_str!("../templates/html/field.hbs")),
    ("arguments", include_str!("../templates/html/arguments.hbs")),
    ("styles", include_str!("../templates/html/styles.hbs")),
];

const MARKDOWN_TEMPLATES: &[(&str, &str)] = &[
    ("index", include_str!("../templates/markdown/index.hbs")),
    ("type", include_str!("../templates/markdown/type.hbs")),
    ("field", include_str!("../templates/markdown/field.hbs")),
];

/// Built-in `(name, source)` templates for a format.
#[must_use]
pub const fn builtin_templates(format: OutputFormat) -> &'static [(&'static str, &'static str)] {
    match format {
        OutputFormat::Html => HTML_TEMPLATES,
        OutputFormat::Markdown => MARKDOWN_TEMPLATES,
    }
}

/// Template engine for one output format.
///
/// Wraps Handlebars with strict mode enabled, the documentation helpers
/// registered, and the format's built-in templates loaded. The Markdown
/// engine does not HTML-escape values.
///
/// # Thread Safety
///
/// This type is `Send` and `Sync`, allowing it to be used across
/// thread boundaries safely.
#[derive(Debug)]
pub struct TemplateEngine<'a> {
    handlebars: Handlebars<'a>,
    format: OutputFormat,
}

impl TemplateEngine<'_> {
    /// Creates an engine with the built-in templates for `format`.
    ///
    /// # Errors
    ///
    /// Returns error if template registration fails (should not happen
    /// with valid built-in templates).
    ///
    /// # Examples
    ///
    /// ```
    /// use graphdoc_core::OutputFormat;
    /// use graphdoc_render::TemplateEngine;
    ///
    /// let engine = TemplateEngine::new(OutputFormat::Markdown).unwrap();
    /// assert!(engine.has_template("index"));
    /// ```
    pub fn new(format: OutputFormat) -> Result<Self> {
        let mut handlebars = Handlebars::new();

        // Strict mode: fail on missing variables
        handlebars.set_strict_mode(true);

        if format == OutputFormat::Markdown {
            handlebars.register_escape_fn(handlebars::no_escape);
        }

        helpers::register_helpers(&mut handlebars);

        let mut engine = Self { handlebars, format };
        for (name, source) in builtin_templates(format) {
            engine.register_template_string(name, source)?;
        }

        Ok(engine)
    }

    /// Creates an engine whose templates in `dir` take precedence over the
    /// built-in ones.
    ///
    /// # Errors
    ///
    /// Returns error if an override template cannot be read or compiled.
    pub fn with_overrides(format: OutputFormat, dir: &Path) -> Result<Self> {
        let mut engine = Self::new(format)?;
        engine.register_override_directory(dir)?;
        Ok(engine)
    }

    /// Registers every `*.hbs` file below `dir`, replacing built-ins with
    /// the same name.
    ///
    /// Template names are paths relative to `dir` without the extension,
    /// using `/` as separator (`partials/header.hbs` becomes
    /// `partials/header`). A missing directory registers nothing.
    ///
    /// Returns the number of templates registered.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The directory cannot be traversed or a file cannot be read
    /// - A template has a syntax error
    pub fn register_override_directory(&mut self, dir: &Path) -> Result<usize> {
        if !dir.is_dir() {
            tracing::warn!(
                "Template override directory {} does not exist, using built-in templates",
                dir.display()
            );
            return Ok(0);
        }

        let mut count = 0;
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::IoError {
                path: e.path().map_or_else(|| dir.to_path_buf(), Path::to_path_buf),
                source: e.into(),
            })?;

            let path = entry.path();
            let is_template = entry.file_type().is_file()
                && path.extension().is_some_and(|ext| ext == TEMPLATE_EXTENSION);
            if !is_template {
                continue;
            }

            let name = template_name(dir, path);
            let source = fs::read_to_string(path).map_err(|source| Error::IoError {
                path: path.to_path_buf(),
                source,
            })?;
            self.register_template_string(&name, &source)?;

            tracing::debug!("Registered override template '{name}' from {}", path.display());
            count += 1;
        }

        Ok(count)
    }

    /// Renders a template with the given data.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Template name is not registered
    /// - Data cannot be serialized
    /// - Template rendering fails, including strict-mode missing variables
    pub fn render<T: Serialize>(&self, template_name: &str, data: &T) -> Result<String> {
        self.handlebars
            .render(template_name, data)
            .map_err(|e| Error::TemplateError {
                template: template_name.to_string(),
                message: format!("Template rendering failed: {e}"),
                source: Some(Box::new(e)),
            })
    }

    /// Registers a template, replacing any existing one with the same name.
    ///
    /// # Errors
    ///
    /// Returns error if template string is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use graphdoc_core::OutputFormat;
    /// use graphdoc_render::TemplateEngine;
    ///
    /// let mut engine = TemplateEngine::new(OutputFormat::Html).unwrap();
    /// assert!(engine.register_template_string("broken", "{{#each}}").is_err());
    /// ```
    pub fn register_template_string(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| Error::TemplateError {
                template: name.to_string(),
                message: format!("Failed to register template: {e}"),
                source: Some(Box::new(e)),
            })
    }

    /// Returns `true` if a template with this name is registered.
    #[must_use]
    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }

    /// Registered template names, sorted.
    #[must_use]
    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .handlebars
            .get_templates()
            .keys()
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names
    }

    /// Format this engine renders.
    #[must_use]
    pub const fn format(&self) -> OutputFormat {
        self.format
    }
}

fn template_name(root: &Path, path: &Path) -> String {
    let relative: PathBuf = path.strip_prefix(root).unwrap_or(path).with_extension("");
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
