use parking_lot::RwLock;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::error::CacheError;
use crate::group::peers::{PeerGetter, PeerPicker};
use crate::ring::HashRing;

use super::protocol::{request_url, DEFAULT_BASE_PATH, DEFAULT_REPLICAS};

const FETCH_TIMEOUT: Duration = Duration::from_millis(500);
const FETCH_ATTEMPTS: usize = 3;

/// This node's view of the fleet: the hash ring plus one HTTP getter per
/// peer. Membership changes replace the whole state under the lock, so
/// lookups always see a consistent ring/getter pair.
struct PoolState {
    ring: HashRing,
    getters: HashMap<String, Arc<HttpGetter>>,
}

/// HTTP side of peer selection. Implements [`PeerPicker`] over the ring and
/// hands out the matching per-peer getter.
pub struct HttpPool {
    self_url: String,
    base_path: String,
    state: RwLock<PoolState>,
}

impl HttpPool {
    /// Creates a pool for the node reachable at `self_url`, serving under the
    /// default base path.
    pub fn new(self_url: &str) -> Arc<Self> {
        Self::with_base_path(self_url, DEFAULT_BASE_PATH)
    }

    pub fn with_base_path(self_url: &str, base_path: &str) -> Arc<Self> {
        let cleaned = base_path.trim_end_matches('/');
        let base_path = if cleaned.starts_with('/') {
            cleaned.to_string()
        } else {
            format!("/{}", cleaned)
        };

        Arc::new(Self {
            self_url: self_url.trim_end_matches('/').to_string(),
            base_path,
            state: RwLock::new(PoolState {
                ring: HashRing::new(DEFAULT_REPLICAS),
                getters: HashMap::new(),
            }),
        })
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn self_url(&self) -> &str {
        &self.self_url
    }

    /// Replaces the fleet membership. The ring and the getter table are
    /// rebuilt from scratch and swapped in as one unit; there is no
    /// incremental removal.
    pub fn set_peers<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ring = HashRing::new(DEFAULT_REPLICAS);
        let mut getters = HashMap::new();
        for peer in peers {
            let peer = peer.as_ref().trim_end_matches('/').to_string();
            ring.add([peer.as_str()]);
            let base_url = format!("{}{}", peer, self.base_path);
            getters.insert(peer, Arc::new(HttpGetter::new(base_url)));
        }

        let mut state = self.state.write();
        *state = PoolState { ring, getters };
    }
}

impl PeerPicker for HttpPool {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let state = self.state.read();
        match state.ring.get(key) {
            Some(owner) if owner != self.self_url => {
                tracing::debug!("key {} is owned by peer {}", key, owner);
                state
                    .getters
                    .get(owner)
                    .map(|getter| getter.clone() as Arc<dyn PeerGetter>)
            }
            _ => None,
        }
    }
}

/// HTTP client for one specific peer's cache endpoint.
pub(crate) struct HttpGetter {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGetter {
    pub(crate) fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Issues a GET with bounded retries on transport errors. Non-OK status
    /// codes are not retried; the peer answered, it just refused.
    async fn get_with_retry(
        &self,
        url: &str,
        timeout: Duration,
        attempts: usize,
    ) -> anyhow::Result<reqwest::Response> {
        let mut delay_ms = 150u64;

        for attempt in 0..attempts {
            match self.client.get(url).timeout(timeout).send().await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    if attempt + 1 == attempts {
                        return Err(anyhow::anyhow!(e));
                    }
                    let jitter = rand::random::<u64>() % 50;
                    tokio::time::sleep(Duration::from_millis(delay_ms + jitter)).await;
                    delay_ms = (delay_ms * 2).min(1200);
                }
            }
        }

        Err(anyhow::anyhow!("retry attempts exhausted"))
    }
}

impl PeerGetter for HttpGetter {
    fn fetch<'a>(
        &'a self,
        namespace: &'a str,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, CacheError>> + Send + 'a>> {
        Box::pin(async move {
            let url = request_url(&self.base_url, namespace, key);

            let response = self
                .get_with_retry(&url, FETCH_TIMEOUT, FETCH_ATTEMPTS)
                .await
                .map_err(|e| CacheError::Peer(e.to_string()))?;

            if !response.status().is_success() {
                return Err(CacheError::Peer(format!(
                    "peer returned {}",
                    response.status()
                )));
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| CacheError::Peer(format!("reading response body: {}", e)))?;
            Ok(body.to_vec())
        })
    }
}
