use parking_lot::Mutex;

use super::lru::LruStore;
use super::view::ByteView;

/// Snapshot of a cache's occupancy, reported by the stats endpoint.
#[derive(Debug, Clone, Copy)]
pub struct CacheStats {
    pub entries: usize,
    pub used_bytes: usize,
}

/// Mutex shell around a lazily-constructed [`LruStore`].
///
/// The inner store is only allocated on the first `add`, so a namespace that
/// never caches anything never pays for LRU bookkeeping. All access goes
/// through the mutex; the store's list surgery is not safe to interleave.
pub struct ConcurrentCache {
    cache_bytes: usize,
    inner: Mutex<Option<LruStore<ByteView>>>,
}

impl ConcurrentCache {
    pub fn new(cache_bytes: usize) -> Self {
        Self {
            cache_bytes,
            inner: Mutex::new(None),
        }
    }

    pub fn add(&self, key: &str, value: ByteView) {
        let mut inner = self.inner.lock();
        let store = inner.get_or_insert_with(|| LruStore::new(self.cache_bytes, None));
        store.add(key, value);
    }

    pub fn get(&self, key: &str) -> Option<ByteView> {
        let mut inner = self.inner.lock();
        inner.as_mut()?.get(key).cloned()
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        match inner.as_ref() {
            Some(store) => CacheStats {
                entries: store.len(),
                used_bytes: store.used_bytes(),
            },
            None => CacheStats {
                entries: 0,
                used_bytes: 0,
            },
        }
    }
}
