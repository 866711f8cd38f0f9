//! Wire Protocol
//!
//! Constants and DTOs shared by the HTTP pool (client side) and the handlers
//! (server side). The cache endpoint itself carries raw bytes, not JSON; only
//! the stats endpoint serializes a document.

use serde::{Deserialize, Serialize};

/// Path prefix under which every node serves its cache endpoint.
pub const DEFAULT_BASE_PATH: &str = "/Distribute_cache";

/// Virtual-node multiplier for the peer ring.
pub const DEFAULT_REPLICAS: usize = 50;

/// Builds the request URL for a (namespace, key) lookup against a peer.
///
/// Namespace and key are escaped individually and joined with explicit `/`
/// separators, so distinct pairs can never alias each other no matter what
/// characters they contain.
pub fn request_url(base_url: &str, namespace: &str, key: &str) -> String {
    format!(
        "{}/{}/{}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(namespace),
        urlencoding::encode(key)
    )
}

/// Occupancy of a single namespace on this node.
#[derive(Debug, Serialize, Deserialize)]
pub struct NamespaceStats {
    pub name: String,
    pub entries: usize,
    pub used_bytes: usize,
}

/// Response format for the node stats endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct NodeStatsResponse {
    pub base_url: String,
    pub namespaces: Vec<NamespaceStats>,
    pub cpu_usage: f32,
    pub mem_used_mb: u64,
    pub mem_total_mb: u64,
}
