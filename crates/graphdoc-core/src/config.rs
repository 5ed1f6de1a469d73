//! Render configuration types.
//!
//! Configuration is entirely parameter based: every render call receives a
//! [`RenderOptions`] value describing where override templates live, which
//! extra variables the templates see, and whether the render cache is used.
//!
//! # Examples
//!
//! ```
//! use graphdoc_core::{RenderContext, RenderOptions};
//!
//! // Cached render with the built-in templates
//! let options = RenderOptions::default();
//! assert!(options.validate().is_ok());
//!
//! // A custom context requires the cache to be disabled
//! let mut context = RenderContext::new();
//! context.insert("title", "Billing API");
//! let options = RenderOptions::new().with_context(context);
//! assert!(options.validate().unwrap_err().is_config_error());
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Template variable name bound to the types reference.
///
/// Caller-supplied contexts may not define this key.
pub const RESERVED_CONTEXT_KEY: &str = "reference";

/// Output document format.
///
/// Selects the built-in template set and whether Markdown cleanup runs
/// after rendering.
///
/// # Examples
///
/// ```
/// use graphdoc_core::OutputFormat;
///
/// let format: OutputFormat = "md".parse().unwrap();
/// assert_eq!(format, OutputFormat::Markdown);
/// assert_eq!(format.as_str(), "markdown");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// HTML document
    #[default]
    Html,
    /// Markdown document
    #[serde(alias = "md")]
    Markdown,
}

impl OutputFormat {
    /// Returns the string representation of the format.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Markdown => "markdown",
        }
    }

    /// Returns the name of the entry template rendered for this format.
    ///
    /// Both built-in template sets use the same entry name; the set itself
    /// differs per format.
    #[must_use]
    pub const fn entry_template(&self) -> &'static str {
        match self {
            Self::Html | Self::Markdown => "index",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "markdown" | "md" => Ok(Self::Markdown),
            _ => Err(Error::ConfigError {
                message: format!("invalid output format: '{s}' (expected: html or markdown)"),
            }),
        }
    }
}

/// Extra variables merged into the template scope.
///
/// Keys are sorted, so two contexts with the same entries always serialize
/// identically.
///
/// # Examples
///
/// ```
/// use graphdoc_core::RenderContext;
///
/// let mut context = RenderContext::new();
/// assert!(context.is_empty());
///
/// context.insert("title", "Billing API");
/// context.insert("version", 3);
/// assert_eq!(context.len(), 2);
/// assert_eq!(context.get("version"), Some(&serde_json::json!(3)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderContext(Map<String, Value>);

impl RenderContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a variable, returning the previous value for that key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Returns the value bound to `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns `true` if `key` is defined.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns `true` if the context holds no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over variables in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Returns the underlying JSON map.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the context, returning the underlying JSON map.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for RenderContext {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RenderContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Options for a single render call.
///
/// # Examples
///
/// ```
/// use graphdoc_core::{RenderContext, RenderOptions};
/// use std::path::Path;
///
/// let options = RenderOptions::new()
///     .with_templates_path("./templates")
///     .with_context(RenderContext::from_iter([("title", "Shop API")]))
///     .with_cache(false);
///
/// assert_eq!(options.templates_path(), Some(Path::new("./templates")));
/// assert!(!options.use_cache);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Directory whose templates take precedence over the built-in ones.
    ///
    /// Default: None (built-in templates only)
    pub templates_path: Option<PathBuf>,

    /// Extra variables merged into the template scope.
    ///
    /// Must be empty when `use_cache` is true.
    /// Default: empty
    pub context: RenderContext,

    /// Whether the render cache is consulted and populated.
    ///
    /// Default: true
    pub use_cache: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            templates_path: None,
            context: RenderContext::new(),
            use_cache: true,
        }
    }
}

impl RenderOptions {
    /// Creates options with defaults: built-in templates, empty context,
    /// caching enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the override template directory.
    #[must_use]
    pub fn with_templates_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.templates_path = Some(path.into());
        self
    }

    /// Sets the extra template context.
    #[must_use]
    pub fn with_context(mut self, context: RenderContext) -> Self {
        self.context = context;
        self
    }

    /// Enables or disables the render cache.
    #[must_use]
    pub const fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    /// Returns the override template directory, if any.
    #[must_use]
    pub fn templates_path(&self) -> Option<&Path> {
        self.templates_path.as_deref()
    }

    /// Checks the options for contradictions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if:
    /// - a non-empty context is combined with `use_cache = true`, since a cached
    ///   result must be reproducible from schema and template path alone
    /// - the context defines the reserved `reference` variable
    pub fn validate(&self) -> Result<()> {
        if self.use_cache && !self.context.is_empty() {
            return Err(Error::ConfigError {
                message: "use_cache must be false when a render context is supplied".to_string(),
            });
        }
        if self.context.contains_key(RESERVED_CONTEXT_KEY) {
            return Err(Error::ConfigError {
                message: format!(
                    "render context cannot define '{RESERVED_CONTEXT_KEY}', it is bound to the types reference"
                ),
            });
        }
        Ok(())
    }
}
