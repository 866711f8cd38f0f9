//! Cache API Handlers
//!
//! HTTP endpoints other nodes (and clients) call on this node. The cache
//! endpoint translates a path lookup into a `Group::get` and streams the
//! value back as raw bytes; the stats endpoint reports per-namespace
//! occupancy and process health.

use axum::{
    extract::{Extension, Path},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use sysinfo::System;

use crate::error::CacheError;
use crate::group::registry::Registry;

use super::pool::HttpPool;
use super::protocol::{NamespaceStats, NodeStatsResponse};

/// Builds the node's router: the cache endpoint under the pool's base path
/// plus the stats endpoint. Anything outside these paths is a 404 by
/// construction.
pub fn router(registry: Arc<Registry>, pool: Arc<HttpPool>) -> Router {
    let cache_route = format!("{}/:namespace/:key", pool.base_path());

    Router::new()
        .route(&cache_route, get(handle_cache_get))
        .route("/health/stats", get(handle_stats))
        .layer(Extension(registry))
        .layer(Extension(pool))
}

/// Cache lookup endpoint.
///
/// Answers 200 with the raw value bytes, 404 for an unknown namespace, and
/// 500 when the lookup surfaces an error.
pub async fn handle_cache_get(
    Extension(registry): Extension<Arc<Registry>>,
    Path((namespace, key)): Path<(String, String)>,
) -> Response {
    let Some(group) = registry.get_group(&namespace) else {
        let err = CacheError::NamespaceNotFound(namespace);
        return (StatusCode::NOT_FOUND, err.to_string()).into_response();
    };

    match group.get(&key).await {
        Ok(view) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/octet-stream")],
            view.to_vec(),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("lookup {}/{} failed: {}", namespace, key, e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Node stats endpoint: per-namespace cache occupancy plus process CPU and
/// memory readings.
pub async fn handle_stats(
    Extension(registry): Extension<Arc<Registry>>,
    Extension(pool): Extension<Arc<HttpPool>>,
) -> Json<NodeStatsResponse> {
    let mut namespaces: Vec<NamespaceStats> = registry
        .group_names()
        .into_iter()
        .filter_map(|name| {
            registry.get_group(&name).map(|group| {
                let stats = group.cache_stats();
                NamespaceStats {
                    name,
                    entries: stats.entries,
                    used_bytes: stats.used_bytes,
                }
            })
        })
        .collect();
    namespaces.sort_by(|a, b| a.name.cmp(&b.name));

    let mut sys = System::new_all();
    sys.refresh_cpu();
    sys.refresh_memory();
    let cpu_usage = sys.global_cpu_info().cpu_usage();
    // sysinfo returns bytes for memory values.
    let mem_total_mb = sys.total_memory() / (1024 * 1024);
    let mem_used_mb = sys.used_memory() / (1024 * 1024);

    Json(NodeStatsResponse {
        base_url: pool.self_url().to_string(),
        namespaces,
        cpu_usage,
        mem_used_mb,
        mem_total_mb,
    })
}
