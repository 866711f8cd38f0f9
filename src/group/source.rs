use anyhow::Result;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// The backing-store seam: an async function from key to raw value bytes.
///
/// Supplied by the application per namespace and called on cache misses, at
/// most once per key within a single-flight window. Failures surface to the
/// caller as `CacheError::BackingStore` and are never cached.
pub type SourceFn =
    Arc<dyn Fn(String) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send>> + Send + Sync>;

/// Wraps a plain async closure into a [`SourceFn`].
pub fn source_fn<F, Fut>(load: F) -> SourceFn
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<u8>>> + Send + 'static,
{
    Arc::new(move |key: String| {
        Box::pin(load(key)) as Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send>>
    })
}
