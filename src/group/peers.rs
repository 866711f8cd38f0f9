use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::CacheError;

/// Fetches a value for (namespace, key) from one specific peer node.
pub trait PeerGetter: Send + Sync {
    fn fetch<'a>(
        &'a self,
        namespace: &'a str,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, CacheError>> + Send + 'a>>;
}

/// Chooses the peer that owns a key.
///
/// Returns `None` when this node owns the key itself or when no peers are
/// known, in which case the caller loads locally.
pub trait PeerPicker: Send + Sync {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}
