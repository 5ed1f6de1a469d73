//! Documentation rendering for GraphQL schemas.
//!
//! Turns a schema into an HTML or Markdown document by building its types
//! reference and rendering it through Handlebars templates.
//!
//! # Architecture
//!
//! - [`template_engine`]: per-format template registry with override layering
//! - [`helpers`]: `slugify`, `markdown`, and `gql_group` template helpers
//! - [`cache`]: bounded LRU store of rendered documents
//! - [`cleanup`]: ordered substitution rules turning HTML-flavored output
//!   into Markdown
//! - [`pipeline`]: the orchestration exposed as `render_html` / `render_markdown`
//!
//! # Examples
//!
//! ```
//! use graphdoc_core::RenderOptions;
//! use graphdoc_render::RenderPipeline;
//! use graphdoc_schema::SchemaSource;
//!
//! let pipeline = RenderPipeline::new();
//! let schema = SchemaSource::from("type User { id: ID! name: String }");
//!
//! let html = pipeline.render_html(&schema, &RenderOptions::default()).unwrap();
//! assert!(html.contains("id=\"user\""));
//!
//! let markdown = pipeline.render_markdown(&schema, &RenderOptions::default()).unwrap();
//! assert!(markdown.contains("User"));
//! assert!(!markdown.contains("<p>"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod cache;
pub mod cleanup;
pub mod helpers;
pub mod pipeline;
pub mod template_engine;

pub use cache::{CacheKey, RENDER_CACHE_CAPACITY, RenderCache};
pub use cleanup::{MARKDOWN_CLEANUP_RULES, SubstitutionRule, apply_rules, clean_markdown};
pub use pipeline::{RenderPipeline, to_html, to_markdown};
pub use template_engine::TemplateEngine;
