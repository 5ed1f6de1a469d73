//! End-to-end tests for the render pipeline.
//!
//! Tests the complete workflow:
//! 1. Validate render options
//! 2. Build the types reference (or reuse a cached document)
//! 3. Render HTML and Markdown through the built-in templates

use graphdoc_core::{RenderContext, RenderOptions, Result};
use graphdoc_render::RenderPipeline;
use graphdoc_schema::{BuildReference, ReferenceBuilder, SchemaSource, TypeGraph, TypesReference};
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

const SHOP_SCHEMA: &str = r#"
"A registered customer."
type User {
  id: ID!
  "Display name, may contain **markdown**."
  name: String
  orders(first: Int = 10): [Order!]!
}

type Order {
  id: ID!
  buyer: User!
  status: Status
  legacyTotal: Float @deprecated(reason: "Use `total`")
}

enum Status {
  "Waiting for payment"
  PENDING
  SHIPPED
}

type Query {
  me: User
}
"#;

/// Reference builder that counts how often it runs.
#[derive(Debug, Default)]
struct CountingBuilder {
    builds: AtomicUsize,
    inner: ReferenceBuilder,
}

impl CountingBuilder {
    fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

impl BuildReference for CountingBuilder {
    fn build(&self, schema: &SchemaSource) -> Result<TypesReference> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        self.inner.build(schema)
    }
}

fn counting_pipeline() -> RenderPipeline<CountingBuilder> {
    RenderPipeline::with_builder(CountingBuilder::default())
}

#[test]
fn test_cached_render_is_idempotent_and_builds_once() {
    let pipeline = counting_pipeline();
    let schema = SchemaSource::from(SHOP_SCHEMA);
    let options = RenderOptions::default();

    let first = pipeline.render_html(&schema, &options).unwrap();
    let second = pipeline.render_html(&schema, &options).unwrap();

    assert_eq!(first, second);
    assert_eq!(pipeline.builder().builds(), 1);
}

#[test]
fn test_equal_text_hits_cache() {
    let pipeline = counting_pipeline();
    let options = RenderOptions::default();

    pipeline
        .render_markdown(&SchemaSource::from(SHOP_SCHEMA), &options)
        .unwrap();
    pipeline
        .render_markdown(&SchemaSource::from(SHOP_SCHEMA.to_string()), &options)
        .unwrap();

    assert_eq!(pipeline.builder().builds(), 1);
}

#[test]
fn test_formats_are_cached_separately() {
    let pipeline = counting_pipeline();
    let schema = SchemaSource::from(SHOP_SCHEMA);
    let options = RenderOptions::default();

    let html = pipeline.render_html(&schema, &options).unwrap();
    let markdown = pipeline.render_markdown(&schema, &options).unwrap();

    assert_ne!(html, markdown);
    assert_eq!(pipeline.builder().builds(), 2);
}

#[test]
fn test_uncached_render_always_rebuilds() {
    let pipeline = counting_pipeline();
    let schema = SchemaSource::from(SHOP_SCHEMA);
    let options = RenderOptions::new().with_cache(false);

    let first = pipeline.render_html(&schema, &options).unwrap();
    let second = pipeline.render_html(&schema, &options).unwrap();

    assert_eq!(first, second);
    assert_eq!(pipeline.builder().builds(), 2);
    assert!(pipeline.cache().is_empty());
}

#[test]
fn test_context_with_cache_is_rejected_before_building() {
    let pipeline = counting_pipeline();
    let context: RenderContext = [("title", "Shop API")].into_iter().collect();
    let options = RenderOptions::new().with_context(context);

    let err = pipeline
        .render_html(&SchemaSource::from(SHOP_SCHEMA), &options)
        .unwrap_err();

    assert!(err.is_config_error());
    assert_eq!(pipeline.builder().builds(), 0);
}

#[test]
fn test_reserved_context_key_is_rejected() {
    let context: RenderContext = [("reference", "shadowed")].into_iter().collect();
    let options = RenderOptions::new().with_context(context).with_cache(false);

    let err = RenderPipeline::new()
        .render_html(&SchemaSource::from(SHOP_SCHEMA), &options)
        .unwrap_err();
    assert!(err.is_config_error());
}

#[test]
fn test_context_variables_reach_templates() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("index.hbs"),
        "{{title}} v{{version}}:{{#each reference.types}} {{name}}{{/each}}",
    )
    .unwrap();

    let mut context = RenderContext::new();
    context.insert("title", "Shop API");
    context.insert("version", 2);
    let options = RenderOptions::new()
        .with_templates_path(dir.path())
        .with_context(context)
        .with_cache(false);

    let html = RenderPipeline::new()
        .render_html(&SchemaSource::from(SHOP_SCHEMA), &options)
        .unwrap();
    assert_eq!(html, "Shop API v2: Order Query User Status");
}

#[test]
fn test_html_document() {
    let html = RenderPipeline::new()
        .render_html(&SchemaSource::from(SHOP_SCHEMA), &RenderOptions::default())
        .unwrap();

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains(r#"id="user""#));
    assert!(html.contains(r##"href="#order""##));
    assert!(html.contains("<h2>Objects</h2>"));
    assert!(html.contains("<h2>Enums</h2>"));
    assert!(html.contains("<strong>markdown</strong>"));
    assert!(html.contains("[Order!]!"));
    assert!(html.contains("Deprecated: Use"));

    let objects = html.find("<h2>Objects</h2>").unwrap();
    let enums = html.find("<h2>Enums</h2>").unwrap();
    assert!(objects < enums);
}

#[test]
fn test_html_category_ids_do_not_clash_with_type_ids() {
    let schema = SchemaSource::from(
        "type Objects { id: ID } enum Enums { A } type Query { objects: Objects, enums: Enums }",
    );
    let html = RenderPipeline::new()
        .render_html(&schema, &RenderOptions::default())
        .unwrap();

    assert_eq!(html.matches(r#"id="objects""#).count(), 1);
    assert_eq!(html.matches(r#"id="enums""#).count(), 1);
    assert!(html.contains(r#"id="category-objects""#));
    assert!(html.contains(r#"id="category-enums""#));
    assert!(html.contains(r##"href="#category-objects""##));
}

#[test]
fn test_markdown_document_has_no_html_paragraphs() {
    let markdown = RenderPipeline::new()
        .render_markdown(&SchemaSource::from(SHOP_SCHEMA), &RenderOptions::default())
        .unwrap();

    assert!(markdown.starts_with("# GraphQL Schema Reference"));
    assert!(markdown.contains("### User"));
    assert!(markdown.contains("A registered customer."));
    assert!(markdown.contains("Waiting for payment"));
    assert!(markdown.contains("*Deprecated: Use `total`*"));
    for tag in ["<p>", "</p>", "<code>", "</code>", "\r\n"] {
        assert!(!markdown.contains(tag), "markdown contains {tag:?}");
    }
}

#[test]
fn test_minimal_schema_end_to_end() {
    let schema = SchemaSource::from("type User { id: ID!, name: String }");
    let pipeline = RenderPipeline::new();

    let html = pipeline
        .render_html(&schema, &RenderOptions::default())
        .unwrap();
    assert!(html.contains("User"));
    assert!(html.contains(r#"id="user""#));

    let markdown = pipeline
        .render_markdown(&schema, &RenderOptions::default())
        .unwrap();
    assert!(markdown.contains("User"));
    assert!(!markdown.contains("<p>"));
    assert!(!markdown.contains("<code>"));
}

#[test]
fn test_pipelines_do_not_share_caches() {
    let first = counting_pipeline();
    let second = counting_pipeline();
    let schema = SchemaSource::from(SHOP_SCHEMA);

    first.render_html(&schema, &RenderOptions::default()).unwrap();
    second.render_html(&schema, &RenderOptions::default()).unwrap();

    assert_eq!(first.builder().builds(), 1);
    assert_eq!(second.builder().builds(), 1);
    assert_eq!(first.cache().len(), 1);
    assert_eq!(second.cache().len(), 1);
}

#[test]
fn test_prebuilt_graph_renders_like_text() {
    let pipeline = RenderPipeline::new();
    let options = RenderOptions::new().with_cache(false);
    let graph = TypeGraph::parse(SHOP_SCHEMA).unwrap();

    let from_graph = pipeline
        .render_markdown(&SchemaSource::from(graph), &options)
        .unwrap();
    let from_text = pipeline
        .render_markdown(&SchemaSource::from(SHOP_SCHEMA), &options)
        .unwrap();
    assert_eq!(from_graph, from_text);
}

#[test]
fn test_schema_error_propagates_and_is_not_cached() {
    let pipeline = RenderPipeline::new();
    let err = pipeline
        .render_html(&SchemaSource::from("type Query {"), &RenderOptions::default())
        .unwrap_err();

    assert!(err.is_schema_error());
    assert!(pipeline.cache().is_empty());
}

#[test]
fn test_shared_pipeline_functions() {
    let schema = SchemaSource::from(SHOP_SCHEMA);
    let html = graphdoc_render::to_html(&schema, &RenderOptions::default()).unwrap();
    let markdown = graphdoc_render::to_markdown(&schema, &RenderOptions::default()).unwrap();

    assert!(html.contains(r#"id="status""#));
    assert!(markdown.contains("### Status"));
}
