//! Local Storage Module
//!
//! Implements the per-node, byte-accounted storage layer of the cache.
//!
//! ## Core Concepts
//! - **ByteView**: Values are immutable byte blobs. `ByteView` hands out
//!   read-only access and clones by reference count, never by copying.
//! - **Recency Eviction**: `LruStore` keeps a recency list over its entries
//!   and evicts from the least-recent end whenever the byte budget is hit.
//! - **Byte Accounting**: Capacity is measured in bytes of key plus value,
//!   not entry counts, so large values apply proportional eviction pressure.
//! - **Concurrency**: The store itself is single-threaded. `ConcurrentCache`
//!   wraps it in a mutex and builds it lazily on the first write.

pub mod lru;
pub mod shell;
pub mod view;
