//! Caching of rendered documents.
//!
//! Rendered output is keyed by a BLAKE3 digest over everything that can
//! change the result: the schema identity, the output format, the template
//! override location, and the context entries. Each
//! [`RenderPipeline`](crate::RenderPipeline) owns its own cache.
//!
//! # Examples
//!
//! ```
//! use graphdoc_core::{OutputFormat, RenderContext};
//! use graphdoc_render::cache::{CacheKey, RenderCache};
//! use graphdoc_schema::SchemaSource;
//!
//! let cache = RenderCache::default();
//! let schema = SchemaSource::from("type Query { ok: Boolean }");
//! let key = CacheKey::for_render(&schema, OutputFormat::Html, None, &RenderContext::new());
//!
//! cache.insert(key.clone(), "<html></html>".to_string());
//! assert_eq!(cache.get(&key).as_deref(), Some("<html></html>"));
//! ```

use blake3::Hasher;
use graphdoc_core::{OutputFormat, RenderContext};
use graphdoc_schema::{SchemaIdentity, SchemaSource};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Maximum number of rendered documents kept per pipeline.
pub const RENDER_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(50) {
    Some(capacity) => capacity,
    None => panic!("render cache capacity must be non-zero"),
};

/// Cache key for rendered documents.
///
/// # Examples
///
/// ```
/// use graphdoc_render::cache::CacheKey;
///
/// let key1 = CacheKey::new("abc123");
/// let key2 = CacheKey::new("abc123");
/// assert_eq!(key1, key2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Creates a new cache key.
    #[must_use]
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Derives the key for one render request.
    ///
    /// Equal inputs always give equal keys; text schemas are compared by
    /// content and pre-built graphs by identity.
    ///
    /// # Examples
    ///
    /// ```
    /// use graphdoc_core::{OutputFormat, RenderContext};
    /// use graphdoc_render::cache::CacheKey;
    /// use graphdoc_schema::SchemaSource;
    ///
    /// let schema = SchemaSource::from("type Query { ok: Boolean }");
    /// let context = RenderContext::new();
    /// let html = CacheKey::for_render(&schema, OutputFormat::Html, None, &context);
    /// let markdown = CacheKey::for_render(&schema, OutputFormat::Markdown, None, &context);
    ///
    /// assert!(html.as_str().starts_with("render_"));
    /// assert_ne!(html, markdown);
    /// ```
    #[must_use]
    pub fn for_render(
        schema: &SchemaSource,
        format: OutputFormat,
        templates_path: Option<&Path>,
        context: &RenderContext,
    ) -> Self {
        let mut hasher = Hasher::new();

        match schema.identity() {
            SchemaIdentity::Text(text) => {
                hasher.update(b"sdl");
                update_field(&mut hasher, text.as_bytes());
            }
            SchemaIdentity::Graph(id) => {
                hasher.update(b"graph");
                hasher.update(&id.to_le_bytes());
            }
        }

        update_field(&mut hasher, format.as_str().as_bytes());

        match templates_path {
            Some(path) => {
                hasher.update(&[1]);
                update_field(&mut hasher, path.as_os_str().as_encoded_bytes());
            }
            None => {
                hasher.update(&[0]);
            }
        }

        let mut entries: Vec<_> = context.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        hasher.update(&(entries.len() as u64).to_le_bytes());
        for (key, value) in entries {
            update_field(&mut hasher, key.as_bytes());
            update_field(&mut hasher, value.to_string().as_bytes());
        }

        Self::new(format!("render_{}", hasher.finalize().to_hex()))
    }

    /// Returns the cache key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Length prefix keeps adjacent fields from running into each other.
fn update_field(hasher: &mut Hasher, bytes: &[u8]) {
    hasher.update(&(bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

/// LRU cache of rendered documents.
///
/// # Thread Safety
///
/// This type is `Send` and `Sync`, using `Mutex` for safe concurrent access.
///
/// # Examples
///
/// ```
/// use graphdoc_render::cache::RenderCache;
/// use std::num::NonZeroUsize;
///
/// let cache = RenderCache::new(NonZeroUsize::new(10).unwrap());
/// assert_eq!(cache.len(), 0);
/// assert_eq!(cache.capacity(), 10);
/// ```
pub struct RenderCache {
    cache: Mutex<LruCache<CacheKey, String>>,
}

impl std::fmt::Debug for RenderCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl Default for RenderCache {
    fn default() -> Self {
        Self::new(RENDER_CACHE_CAPACITY)
    }
}

impl RenderCache {
    /// Creates a cache holding at most `capacity` documents.
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    // A panic while holding the lock cannot leave the LRU half-updated in a
    // way that matters for string values.
    fn lock(&self) -> MutexGuard<'_, LruCache<CacheKey, String>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Gets a rendered document. Updates LRU order on hit.
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<String> {
        self.lock().get(key).cloned()
    }

    /// Inserts a rendered document, evicting the least recently used entry
    /// when full.
    pub fn insert(&self, key: CacheKey, document: String) {
        let mut cache = self.lock();
        tracing::debug!("Document cached: {} (cache size: {})", key, cache.len() + 1);
        cache.put(key, document);
    }

    /// Checks if a key exists in the cache without touching LRU order.
    #[must_use]
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.lock().contains(key)
    }

    /// Clears all entries from the cache.
    pub fn clear(&self) {
        self.lock().clear();
        tracing::debug!("Render cache cleared");
    }

    /// Returns the number of cached documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns the maximum number of cached documents.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }
}
