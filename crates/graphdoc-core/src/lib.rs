//! Core types and errors for graphdoc.
//!
//! This crate provides the foundational types shared by every crate in the
//! graphdoc workspace.
//!
//! # Architecture
//!
//! The core consists of:
//! - Error hierarchy with contextual information
//! - Output format selection (`OutputFormat`)
//! - Per-call render configuration (`RenderOptions`, `RenderContext`)

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod config;
mod error;

pub use config::{OutputFormat, RESERVED_CONTEXT_KEY, RenderContext, RenderOptions};
pub use error::{Error, Result};
