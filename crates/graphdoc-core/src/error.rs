//! Error types for graphdoc.
//!
//! Every failure surfaces to the caller unchanged: configuration problems are
//! reported before any work starts, while schema and template failures carry
//! the underlying parser or engine error as their source.
//!
//! # Examples
//!
//! ```
//! use graphdoc_core::{Error, Result};
//!
//! fn check_path(path: &str) -> Result<()> {
//!     if path.is_empty() {
//!         return Err(Error::ConfigError {
//!             message: "Template path cannot be empty".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! let err = check_path("").unwrap_err();
//! assert!(err.is_config_error());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for graphdoc.
///
/// All errors in the system use this type, providing consistent error handling
/// across all crates in the workspace.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    ///
    /// Raised before any rendering starts when render options are
    /// contradictory, such as a custom context combined with caching.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// Schema error.
    ///
    /// Raised when the schema source cannot be parsed into a type graph.
    /// No partial reference is produced.
    #[error("Schema error: {message}")]
    SchemaError {
        /// Description of the schema problem
        message: String,
        /// Underlying parser error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Template error.
    ///
    /// Raised when a template is missing from both the override and the
    /// built-in sets, fails to compile, or fails to render.
    #[error("Template error in '{template}': {message}")]
    TemplateError {
        /// Name of the template involved
        template: String,
        /// Description of the template failure
        message: String,
        /// Underlying template engine error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Filesystem error.
    ///
    /// Raised when an override template or schema file cannot be read.
    #[error("I/O error at {}: {source}", path.display())]
    IoError {
        /// Path that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Serialization error.
    ///
    /// Raised when the types reference cannot be converted into template data.
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Description of the serialization failure
        message: String,
        /// Underlying serde error
        #[source]
        source: Option<serde_json::Error>,
    },
}

impl Error {
    /// Returns `true` if this is a configuration error.
    ///
    /// # Examples
    ///
    /// ```
    /// use graphdoc_core::Error;
    ///
    /// let err = Error::ConfigError {
    ///     message: "context requires use_cache = false".to_string(),
    /// };
    /// assert!(err.is_config_error());
    /// ```
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }

    /// Returns `true` if this is a schema error.
    ///
    /// # Examples
    ///
    /// ```
    /// use graphdoc_core::Error;
    ///
    /// let err = Error::SchemaError {
    ///     message: "unexpected token".to_string(),
    ///     source: None,
    /// };
    /// assert!(err.is_schema_error());
    /// ```
    #[must_use]
    pub const fn is_schema_error(&self) -> bool {
        matches!(self, Self::SchemaError { .. })
    }

    /// Returns `true` if this is a template error.
    ///
    /// # Examples
    ///
    /// ```
    /// use graphdoc_core::Error;
    ///
    /// let err = Error::TemplateError {
    ///     template: "index".to_string(),
    ///     message: "Template not found".to_string(),
    ///     source: None,
    /// };
    /// assert!(err.is_template_error());
    /// ```
    #[must_use]
    pub const fn is_template_error(&self) -> bool {
        matches!(self, Self::TemplateError { .. })
    }

    /// Returns `true` if this is a filesystem error.
    #[must_use]
    pub const fn is_io_error(&self) -> bool {
        matches!(self, Self::IoError { .. })
    }

    /// Builds a schema error from a message without an underlying source.
    ///
    /// # Examples
    ///
    /// ```
    /// use graphdoc_core::Error;
    ///
    /// let err = Error::schema("Unknown type \"Foo\"");
    /// assert!(err.to_string().contains("Foo"));
    /// ```
    #[must_use]
    pub fn schema(message: impl Into<String>) -> Self {
        Self::SchemaError {
            message: message.into(),
            source: None,
        }
    }
}

/// Result type alias for graphdoc operations.
///
/// # Examples
///
/// ```
/// use graphdoc_core::{Error, Result};
///
/// fn validate(value: i32) -> Result<i32> {
///     if value < 0 {
///         return Err(Error::ConfigError {
///             message: "Value must be non-negative".to_string(),
///         });
///     }
///     Ok(value)
/// }
///
/// assert!(validate(5).is_ok());
/// assert!(validate(-1).is_err());
/// ```
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_detection() {
        let err = Error::ConfigError {
            message: "Invalid configuration".to_string(),
        };
        assert!(err.is_config_error());
        assert!(!err.is_schema_error());
    }

    #[test]
    fn test_schema_error_detection() {
        let err = Error::schema("Syntax Error");
        assert!(err.is_schema_error());
        assert!(!err.is_template_error());
    }

    #[test]
    fn test_template_error_detection() {
        let err = Error::TemplateError {
            template: "type".to_string(),
            message: "unclosed block".to_string(),
            source: None,
        };
        assert!(err.is_template_error());
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_io_error_display_includes_path() {
        let err = Error::IoError {
            path: PathBuf::from("/tmp/templates/index.hbs"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.is_io_error());
        let display = format!("{err}");
        assert!(display.contains("/tmp/templates/index.hbs"));
        assert!(display.contains("missing"));
    }

    #[test]
    fn test_error_display() {
        let err = Error::TemplateError {
            template: "index".to_string(),
            message: "Template not found".to_string(),
            source: None,
        };
        let display = format!("{err}");
        assert!(display.contains("Template error in 'index'"));
        assert!(display.contains("Template not found"));
    }

    #[test]
    fn test_schema_error_keeps_source() {
        use std::error::Error as _;

        let err = Error::SchemaError {
            message: "bad schema".to_string(),
            source: Some("expected name".into()),
        };
        let source = err.source().expect("source should be preserved");
        assert_eq!(source.to_string(), "expected name");
    }
}
