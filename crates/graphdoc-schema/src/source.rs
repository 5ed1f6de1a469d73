//! Schema input accepted by the reference builder.

use crate::TypeGraph;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A schema given either as SDL text or as an already built type graph.
///
/// Equality and hashing follow [`SchemaSource::identity`]: text compares by
/// content, graphs by the id assigned when they were built.
///
/// # Examples
///
/// ```
/// use graphdoc_schema::{SchemaSource, TypeGraph};
///
/// let a = SchemaSource::from("type A { x: Int }");
/// let b = SchemaSource::from(String::from("type A { x: Int }"));
/// assert_eq!(a, b);
///
/// let graph = TypeGraph::parse("type A { x: Int }").unwrap();
/// let c = SchemaSource::from(graph);
/// assert_ne!(a, c);
/// assert_eq!(c.clone(), c);
/// ```
#[derive(Debug, Clone)]
pub enum SchemaSource {
    /// Schema definition language text
    Sdl(Arc<str>),
    /// Pre-built type graph
    Graph(Arc<TypeGraph>),
}

/// The part of a schema source that decides whether two sources are the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaIdentity<'a> {
    /// SDL text, compared by content
    Text(&'a str),
    /// Pre-built graph, compared by id
    Graph(u64),
}

impl SchemaSource {
    /// Returns the identity used for equality and cache keys.
    #[must_use]
    pub fn identity(&self) -> SchemaIdentity<'_> {
        match self {
            Self::Sdl(text) => SchemaIdentity::Text(text.as_ref()),
            Self::Graph(graph) => SchemaIdentity::Graph(graph.id()),
        }
    }
}

impl PartialEq for SchemaSource {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for SchemaSource {}

impl Hash for SchemaSource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl From<&str> for SchemaSource {
    fn from(sdl: &str) -> Self {
        Self::Sdl(Arc::from(sdl))
    }
}

impl From<String> for SchemaSource {
    fn from(sdl: String) -> Self {
        Self::Sdl(Arc::from(sdl))
    }
}

impl From<TypeGraph> for SchemaSource {
    fn from(graph: TypeGraph) -> Self {
        Self::Graph(Arc::new(graph))
    }
}

impl From<Arc<TypeGraph>> for SchemaSource {
    fn from(graph: Arc<TypeGraph>) -> Self {
        Self::Graph(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_text_identity_is_content_based() {
        let a = SchemaSource::from("type A { x: Int }");
        let b = SchemaSource::from("type A { x: Int }");
        let c = SchemaSource::from("type B { x: Int }");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_graph_identity_is_per_build() {
        let first = TypeGraph::parse("type A { x: Int }").unwrap();
        let second = TypeGraph::parse("type A { x: Int }").unwrap();
        let shared = Arc::new(first);

        let a = SchemaSource::from(Arc::clone(&shared));
        let b = SchemaSource::from(shared);
        let c = SchemaSource::from(second);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_sources_are_hashable() {
        let mut set = HashSet::new();
        set.insert(SchemaSource::from("type A { x: Int }"));
        set.insert(SchemaSource::from("type A { x: Int }"));
        set.insert(SchemaSource::from("type B { x: Int }"));
        assert_eq!(set.len(), 2);
    }
}
