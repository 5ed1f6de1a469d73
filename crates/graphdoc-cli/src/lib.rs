//! graphdoc CLI library.
//!
//! Exposes the command implementations and config file handling behind the
//! `graphdoc` binary so they can be tested directly.

pub mod commands;
pub mod config;

pub use config::FileConfig;
