//! Distributed In-Memory Cache Library
//!
//! This library crate defines the core modules of a peer-to-peer cache fleet.
//! It serves as the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! The system is composed of five loosely coupled subsystems:
//!
//! - **`store`**: The local storage layer. A byte-accounted LRU store, the
//!   immutable `ByteView` value type, and the mutex shell that makes the store
//!   safe to share between request handlers.
//! - **`ring`**: The placement layer. A consistent-hash ring with virtual-node
//!   smoothing that deterministically assigns every key to an owner node.
//! - **`flight`**: The coalescing layer. Collapses concurrent loads for the
//!   same key into a single execution whose result every caller shares.
//! - **`group`**: The coordination layer. Named namespaces that compose the
//!   local cache, the peer picker, and the application's backing store into
//!   one lookup path, plus the registry that holds them.
//! - **`http`**: The transport layer. An HTTP pool that implements peer
//!   picking over the ring and serves cache lookups to other nodes.

pub mod error;
pub mod flight;
pub mod group;
pub mod http;
pub mod ring;
pub mod store;
