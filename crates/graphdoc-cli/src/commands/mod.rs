//! Command implementations for the graphdoc CLI.
//!
//! Each module parses its arguments, runs the operation, and writes the
//! result to stdout or the requested file.

pub mod completions;
pub mod reference;
pub mod render;

use anyhow::{Context, Result};
use std::io::{self, Read};
use std::path::Path;

/// Path argument meaning "read from stdin".
pub const STDIN_PATH: &str = "-";

/// Reads schema text from a file, or from stdin when `path` is `-`.
///
/// # Errors
///
/// Returns an error if the file or stdin cannot be read.
pub fn read_schema(path: &Path) -> Result<String> {
    if path == Path::new(STDIN_PATH) {
        let mut sdl = String::new();
        io::stdin()
            .read_to_string(&mut sdl)
            .context("failed to read schema from stdin")?;
        return Ok(sdl);
    }

    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schema file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_schema_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schema.graphql");
        std::fs::write(&path, "type Query { ok: Boolean }").unwrap();

        assert_eq!(read_schema(&path).unwrap(), "type Query { ok: Boolean }");
    }

    #[test]
    fn test_read_schema_missing_file() {
        let err = read_schema(Path::new("/nonexistent/schema.graphql")).unwrap_err();
        assert!(err.to_string().contains("failed to read schema file"));
    }
}
