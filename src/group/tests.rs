#[cfg(test)]
mod tests {
    use crate::error::CacheError;
    use crate::group::coordinator::Group;
    use crate::group::peers::{PeerGetter, PeerPicker};
    use crate::group::registry::Registry;
    use crate::group::source::{source_fn, SourceFn};
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Backing store over a fixed score table, counting every load.
    fn score_source(loads: Arc<AtomicUsize>) -> SourceFn {
        source_fn(move |key: String| {
            let loads = loads.clone();
            async move {
                loads.fetch_add(1, Ordering::SeqCst);
                match key.as_str() {
                    "Tom" => Ok(b"630".to_vec()),
                    "Jack" => Ok(b"589".to_vec()),
                    _ => Err(anyhow::anyhow!("{} is not in the score table", key)),
                }
            }
        })
    }

    /// Peer getter returning a canned outcome, counting every fetch.
    struct CannedGetter {
        fetches: Arc<AtomicUsize>,
        outcome: Result<Vec<u8>, CacheError>,
    }

    impl PeerGetter for CannedGetter {
        fn fetch<'a>(
            &'a self,
            _namespace: &'a str,
            _key: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, CacheError>> + Send + 'a>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let outcome = self.outcome.clone();
            Box::pin(async move { outcome })
        }
    }

    /// Picker that routes every key to one getter, counting every pick.
    struct AlwaysPick {
        getter: Arc<CannedGetter>,
        picks: Arc<AtomicUsize>,
    }

    impl PeerPicker for AlwaysPick {
        fn pick_peer(&self, _key: &str) -> Option<Arc<dyn PeerGetter>> {
            self.picks.fetch_add(1, Ordering::SeqCst);
            Some(self.getter.clone())
        }
    }

    // ============================================================
    // GROUP LOOKUP TESTS
    // ============================================================

    #[tokio::test]
    async fn test_local_load_then_cache_hit() {
        let loads = Arc::new(AtomicUsize::new(0));
        let group = Group::new("scores", 2 << 10, score_source(loads.clone()));

        let view = group.get("Tom").await.expect("known key");
        assert_eq!(view.as_slice(), b"630");
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        // Second lookup is served from the cache without touching the store.
        let view = group.get("Tom").await.expect("cached key");
        assert_eq!(view.as_slice(), b"630");
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(group.cache_stats().entries, 1);
    }

    #[tokio::test]
    async fn test_backing_store_error_surfaces_and_is_not_cached() {
        let loads = Arc::new(AtomicUsize::new(0));
        let group = Group::new("scores", 2 << 10, score_source(loads.clone()));

        for attempt in 1..=2 {
            let err = group.get("Unknown").await.unwrap_err();
            assert!(matches!(err, CacheError::BackingStore(_)), "got {:?}", err);
            assert_eq!(loads.load(Ordering::SeqCst), attempt, "failures must not be cached");
        }
        assert_eq!(group.cache_stats().entries, 0);
    }

    #[tokio::test]
    async fn test_empty_key_is_rejected_before_any_work() {
        let loads = Arc::new(AtomicUsize::new(0));
        let picks = Arc::new(AtomicUsize::new(0));
        let fetches = Arc::new(AtomicUsize::new(0));

        let group = Group::new("scores", 2 << 10, score_source(loads.clone()));
        group.register_peers(Arc::new(AlwaysPick {
            getter: Arc::new(CannedGetter {
                fetches: fetches.clone(),
                outcome: Ok(b"unused".to_vec()),
            }),
            picks: picks.clone(),
        }));

        assert_eq!(group.get("").await.unwrap_err(), CacheError::InvalidKey);
        assert_eq!(loads.load(Ordering::SeqCst), 0);
        assert_eq!(picks.load(Ordering::SeqCst), 0);
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
        assert_eq!(group.cache_stats().entries, 0);
    }

    #[tokio::test]
    async fn test_concurrent_misses_make_one_load() {
        let loads = Arc::new(AtomicUsize::new(0));
        let slow_source = {
            let loads = loads.clone();
            source_fn(move |_key: String| {
                let loads = loads.clone();
                async move {
                    loads.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    Ok(b"630".to_vec())
                }
            })
        };
        let group = Arc::new(Group::new("scores", 2 << 10, slow_source));

        let mut handles = Vec::new();
        for _ in 0..10 {
            let group = group.clone();
            handles.push(tokio::spawn(async move { group.get("Tom").await }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap().as_slice(), b"630");
        }

        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    // ============================================================
    // PEER DISPATCH TESTS
    // ============================================================

    #[tokio::test]
    async fn test_peer_served_value_is_not_cached_locally() {
        let loads = Arc::new(AtomicUsize::new(0));
        let picks = Arc::new(AtomicUsize::new(0));
        let fetches = Arc::new(AtomicUsize::new(0));

        let group = Group::new("scores", 2 << 10, score_source(loads.clone()));
        group.register_peers(Arc::new(AlwaysPick {
            getter: Arc::new(CannedGetter {
                fetches: fetches.clone(),
                outcome: Ok(b"630".to_vec()),
            }),
            picks: picks.clone(),
        }));

        for round in 1..=2 {
            let view = group.get("Tom").await.expect("peer value");
            assert_eq!(view.as_slice(), b"630");
            // Still a miss locally, so the peer is asked every time.
            assert_eq!(fetches.load(Ordering::SeqCst), round);
        }

        assert_eq!(loads.load(Ordering::SeqCst), 0);
        assert_eq!(group.cache_stats().entries, 0);
    }

    #[tokio::test]
    async fn test_peer_failure_falls_back_to_local_load() {
        let loads = Arc::new(AtomicUsize::new(0));
        let picks = Arc::new(AtomicUsize::new(0));
        let fetches = Arc::new(AtomicUsize::new(0));

        let group = Group::new("scores", 2 << 10, score_source(loads.clone()));
        group.register_peers(Arc::new(AlwaysPick {
            getter: Arc::new(CannedGetter {
                fetches: fetches.clone(),
                outcome: Err(CacheError::Peer("connection refused".to_string())),
            }),
            picks: picks.clone(),
        }));

        let view = group.get("Tom").await.expect("fallback value");
        assert_eq!(view.as_slice(), b"630");
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        // The fallback populated the local cache, so the next lookup stays
        // off the network entirely.
        let view = group.get("Tom").await.expect("cached value");
        assert_eq!(view.as_slice(), b"630");
        assert_eq!(picks.load(Ordering::SeqCst), 1);
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    #[should_panic(expected = "peers already registered")]
    async fn test_second_peer_registration_panics() {
        let group = Group::new("scores", 2 << 10, score_source(Arc::default()));
        let picker = || {
            Arc::new(AlwaysPick {
                getter: Arc::new(CannedGetter {
                    fetches: Arc::default(),
                    outcome: Ok(Vec::new()),
                }),
                picks: Arc::default(),
            })
        };
        group.register_peers(picker());
        group.register_peers(picker());
    }

    // ============================================================
    // REGISTRY TESTS
    // ============================================================

    #[tokio::test]
    async fn test_registry_lookup_roundtrip() {
        let registry = Registry::new();
        registry
            .new_group("scores", 2 << 10, score_source(Arc::default()))
            .expect("valid group");

        let group = registry.get_group("scores").expect("registered group");
        assert_eq!(group.name(), "scores");
        assert!(registry.get_group("missing").is_none());
        assert_eq!(registry.group_names(), vec!["scores".to_string()]);
    }

    #[tokio::test]
    async fn test_registry_replaces_on_same_name() {
        let registry = Registry::new();
        let first = registry
            .new_group("scores", 2 << 10, score_source(Arc::default()))
            .expect("valid group");
        let second = registry
            .new_group("scores", 2 << 10, score_source(Arc::default()))
            .expect("valid group");

        let resolved = registry.get_group("scores").expect("registered group");
        assert!(Arc::ptr_eq(&resolved, &second));
        assert!(!Arc::ptr_eq(&resolved, &first));
    }

    #[tokio::test]
    async fn test_registry_rejects_empty_name() {
        let registry = Registry::new();
        let err = registry
            .new_group("", 2 << 10, score_source(Arc::default()))
            .unwrap_err();
        assert!(matches!(err, CacheError::InvalidArgument(_)));
    }
}
