//! Schema to document rendering.
//!
//! A [`RenderPipeline`] validates the options, consults its cache, builds the
//! types reference, renders the format's `index` template with the reference
//! bound to `reference` and the context entries alongside it, and finally
//! applies the Markdown cleanup rules when producing Markdown.

use crate::cache::{CacheKey, RenderCache};
use crate::cleanup::clean_markdown;
use crate::template_engine::TemplateEngine;
use graphdoc_core::{
    Error, OutputFormat, RESERVED_CONTEXT_KEY, RenderContext, RenderOptions, Result,
};
use graphdoc_schema::{BuildReference, ReferenceBuilder, SchemaSource, TypesReference};
use serde_json::Value;
use std::sync::LazyLock;

static SHARED_PIPELINE: LazyLock<RenderPipeline> = LazyLock::new(RenderPipeline::new);

/// Renders HTML documentation with the process-wide pipeline.
///
/// # Errors
///
/// See [`RenderPipeline::render`].
///
/// # Examples
///
/// ```
/// use graphdoc_core::RenderOptions;
/// use graphdoc_schema::SchemaSource;
///
/// let schema = SchemaSource::from("type Query { ping: String }");
/// let html = graphdoc_render::to_html(&schema, &RenderOptions::default()).unwrap();
/// assert!(html.contains("<h3>Query</h3>"));
/// ```
pub fn to_html(schema: &SchemaSource, options: &RenderOptions) -> Result<String> {
    SHARED_PIPELINE.render_html(schema, options)
}

/// Renders Markdown documentation with the process-wide pipeline.
///
/// # Errors
///
/// See [`RenderPipeline::render`].
pub fn to_markdown(schema: &SchemaSource, options: &RenderOptions) -> Result<String> {
    SHARED_PIPELINE.render_markdown(schema, options)
}

/// Rendering pipeline with its own document cache.
///
/// Generic over the reference builder so callers can swap in their own
/// [`BuildReference`] implementation.
///
/// # Thread Safety
///
/// `Send` and `Sync` whenever the builder is; concurrent renders only
/// contend on the cache lock.
#[derive(Debug)]
pub struct RenderPipeline<B = ReferenceBuilder> {
    builder: B,
    cache: RenderCache,
}

impl RenderPipeline {
    /// Creates a pipeline using the default [`ReferenceBuilder`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_builder(ReferenceBuilder::new())
    }
}

impl Default for RenderPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: BuildReference> RenderPipeline<B> {
    /// Creates a pipeline around a custom reference builder.
    #[must_use]
    pub fn with_builder(builder: B) -> Self {
        Self {
            builder,
            cache: RenderCache::default(),
        }
    }

    /// Renders HTML documentation.
    ///
    /// # Errors
    ///
    /// See [`RenderPipeline::render`].
    pub fn render_html(&self, schema: &SchemaSource, options: &RenderOptions) -> Result<String> {
        self.render(schema, OutputFormat::Html, options)
    }

    /// Renders Markdown documentation.
    ///
    /// # Errors
    ///
    /// See [`RenderPipeline::render`].
    pub fn render_markdown(&self, schema: &SchemaSource, options: &RenderOptions) -> Result<String> {
        self.render(schema, OutputFormat::Markdown, options)
    }

    /// Renders `schema` in `format`.
    ///
    /// With `use_cache` set, a repeated request with the same schema, format,
    /// and template path reuses the stored template output without
    /// rebuilding. Markdown cleanup runs after the lookup on both paths.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The options are contradictory ([`Error::ConfigError`]), checked
    ///   before any other work
    /// - The schema cannot be parsed ([`Error::SchemaError`])
    /// - An override template cannot be read ([`Error::IoError`])
    /// - A template is missing, malformed, or fails to render
    ///   ([`Error::TemplateError`])
    pub fn render(
        &self,
        schema: &SchemaSource,
        format: OutputFormat,
        options: &RenderOptions,
    ) -> Result<String> {
        options.validate()?;

        let rendered = if options.use_cache {
            self.render_cached(schema, format, options)?
        } else {
            self.render_uncached(schema, format, options)?
        };

        Ok(match format {
            OutputFormat::Html => rendered,
            OutputFormat::Markdown => clean_markdown(&rendered),
        })
    }

    /// Raw template output, looked up in or stored into the cache.
    fn render_cached(
        &self,
        schema: &SchemaSource,
        format: OutputFormat,
        options: &RenderOptions,
    ) -> Result<String> {
        let key = CacheKey::for_render(schema, format, options.templates_path(), &options.context);
        if let Some(rendered) = self.cache.get(&key) {
            tracing::debug!("Render cache hit: {key}");
            return Ok(rendered);
        }
        tracing::debug!("Render cache miss: {key}");

        let rendered = self.render_uncached(schema, format, options)?;
        self.cache.insert(key, rendered.clone());
        Ok(rendered)
    }

    fn render_uncached(
        &self,
        schema: &SchemaSource,
        format: OutputFormat,
        options: &RenderOptions,
    ) -> Result<String> {
        let reference = self.builder.build(schema)?;

        let engine = match options.templates_path() {
            Some(dir) => TemplateEngine::with_overrides(format, dir)?,
            None => TemplateEngine::new(format)?,
        };

        let data = template_data(&reference, &options.context)?;
        let rendered = engine.render(format.entry_template(), &data)?;

        tracing::info!(
            "Rendered {format} documentation: {} types, {} bytes",
            reference.len(),
            rendered.len()
        );

        Ok(rendered)
    }

    /// Returns the reference builder.
    #[must_use]
    pub const fn builder(&self) -> &B {
        &self.builder
    }

    /// Returns this pipeline's document cache.
    #[must_use]
    pub const fn cache(&self) -> &RenderCache {
        &self.cache
    }
}

/// Template scope: the context entries plus the reference under `reference`.
fn template_data(reference: &TypesReference, context: &RenderContext) -> Result<Value> {
    let reference = serde_json::to_value(reference).map_err(|e| Error::SerializationError {
        message: format!("Failed to serialize types reference: {e}"),
        source: Some(e),
    })?;

    let mut data = context.as_map().clone();
    data.insert(RESERVED_CONTEXT_KEY.to_string(), reference);
    Ok(Value::Object(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_template_data_binds_reference_and_context() {
        let reference = TypesReference {
            query_type: Some("Query".to_string()),
            ..TypesReference::default()
        };
        let context: RenderContext = [("title", "Shop")].into_iter().collect();

        let data = template_data(&reference, &context).unwrap();
        assert_eq!(data["title"], json!("Shop"));
        assert_eq!(data["reference"]["query_type"], json!("Query"));
        assert_eq!(data["reference"]["types"], json!([]));
    }

    #[test]
    fn test_pipeline_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RenderPipeline>();
    }

    #[test]
    fn test_render_fills_cache_only_when_enabled() {
        let pipeline = RenderPipeline::new();
        let schema = SchemaSource::from("type Query { ok: Boolean }");

        pipeline
            .render_html(&schema, &RenderOptions::new().with_cache(false))
            .unwrap();
        assert!(pipeline.cache().is_empty());

        pipeline.render_html(&schema, &RenderOptions::new()).unwrap();
        pipeline.render_markdown(&schema, &RenderOptions::new()).unwrap();
        assert_eq!(pipeline.cache().len(), 2);
    }

    #[test]
    fn test_cache_holds_raw_markdown_render() {
        let pipeline = RenderPipeline::new();
        let schema = SchemaSource::from(
            r#"
            "Use `id` to look users up."
            type User { id: ID! }
            type Query { user: User }
            "#,
        );
        let options = RenderOptions::new();

        let document = pipeline.render_markdown(&schema, &options).unwrap();
        assert!(!document.contains("<p>"));
        assert!(!document.contains("<code>"));

        let key = CacheKey::for_render(
            &schema,
            OutputFormat::Markdown,
            options.templates_path(),
            &options.context,
        );
        let raw = pipeline.cache().get(&key).unwrap();
        assert!(raw.contains("<p>Use <code>id</code> to look users up.</p>"));
        assert_eq!(clean_markdown(&raw), document);

        // A cache hit is cleaned the same way
        assert_eq!(pipeline.render_markdown(&schema, &options).unwrap(), document);
    }

    #[test]
    fn test_invalid_options_fail_before_build() {
        let pipeline = RenderPipeline::new();
        // Unparseable schema: a config error proves validation ran first
        let schema = SchemaSource::from("type {");
        let options = RenderOptions::new().with_context([("title", "x")].into_iter().collect());

        let err = pipeline.render_html(&schema, &options).unwrap_err();
        assert!(err.is_config_error());
    }
}
