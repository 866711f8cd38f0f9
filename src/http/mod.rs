//! HTTP Transport Module
//!
//! Serves cache lookups to peer nodes and fetches from them, speaking the
//! fleet's wire protocol: `GET <base>/<basePath>/<namespace>/<key>` with
//! URL-escaped path segments, answered with the raw value bytes as
//! `application/octet-stream`.
//!
//! ## Core Pieces
//! - **`pool`**: `HttpPool` holds the hash ring and one HTTP client per peer,
//!   and implements `PeerPicker` for the groups on this node.
//! - **`handlers`**: Axum handlers for the cache endpoint and node stats.
//! - **`protocol`**: Wire constants, URL construction, and stats DTOs.

pub mod handlers;
pub mod pool;
pub mod protocol;
