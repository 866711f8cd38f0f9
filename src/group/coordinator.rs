use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::error::CacheError;
use crate::flight::FlightGroup;
use crate::store::shell::{CacheStats, ConcurrentCache};
use crate::store::view::ByteView;

use super::peers::PeerPicker;
use super::source::SourceFn;

/// A named cache namespace.
///
/// Owns its local cache and its single-flight group; holds shared references
/// to the peer picker and the application's backing store.
pub struct Group {
    name: String,
    source: SourceFn,
    main_cache: ConcurrentCache,
    peers: OnceLock<Arc<dyn PeerPicker>>,
    loader: FlightGroup<Result<ByteView, CacheError>>,
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group").field("name", &self.name).finish()
    }
}

impl Group {
    pub fn new(name: &str, cache_bytes: usize, source: SourceFn) -> Self {
        Self {
            name: name.to_string(),
            source,
            main_cache: ConcurrentCache::new(cache_bytes),
            peers: OnceLock::new(),
            loader: FlightGroup::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attaches the peer picker. Exactly one registration is allowed over the
    /// group's lifetime; a second call is a programming error and aborts.
    pub fn register_peers(&self, picker: Arc<dyn PeerPicker>) {
        if self.peers.set(picker).is_err() {
            panic!("peers already registered for group {}", self.name);
        }
    }

    /// Looks up `key`, loading it through a peer or the backing store on a
    /// local cache miss.
    pub async fn get(&self, key: &str) -> Result<ByteView, CacheError> {
        if key.is_empty() {
            return Err(CacheError::InvalidKey);
        }

        if let Some(view) = self.main_cache.get(key) {
            tracing::debug!("cache hit for {}/{}", self.name, key);
            return Ok(view);
        }

        self.load(key).await
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.main_cache.stats()
    }

    /// Runs the miss path under the single-flight, so concurrent misses for
    /// one key produce a single peer call or backing-store call.
    async fn load(&self, key: &str) -> Result<ByteView, CacheError> {
        self.loader
            .work(key, || async {
                if let Some(picker) = self.peers.get() {
                    if let Some(peer) = picker.pick_peer(key) {
                        match peer.fetch(&self.name, key).await {
                            // The owner node caches this value; keeping a
                            // second copy here would duplicate it across the
                            // fleet.
                            Ok(raw) => return Ok(ByteView::from(raw)),
                            Err(e) => {
                                tracing::warn!(
                                    "peer fetch for {}/{} failed, loading locally: {}",
                                    self.name,
                                    key,
                                    e
                                );
                            }
                        }
                    }
                }
                self.load_locally(key).await
            })
            .await
    }

    async fn load_locally(&self, key: &str) -> Result<ByteView, CacheError> {
        let raw = (self.source)(key.to_string())
            .await
            .map_err(|e| CacheError::BackingStore(e.to_string()))?;

        let view = ByteView::from_copy(&raw);
        self.main_cache.add(key, view.clone());
        Ok(view)
    }
}
