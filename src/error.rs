//! Error taxonomy for cache operations.
//!
//! Every fallible path in the lookup pipeline reports one of the variants
//! below. The enum is `Clone` because a single load may be observed by many
//! coalesced waiters, each of which receives its own copy of the outcome.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// An empty key was supplied to a lookup.
    #[error("key must not be empty")]
    InvalidKey,

    /// Namespace creation was given an unusable configuration.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No namespace is registered under the requested name.
    #[error("no such namespace: {0}")]
    NamespaceNotFound(String),

    /// The application-supplied backing store failed to produce a value.
    /// Never cached; every coalesced waiter sees the failure.
    #[error("backing store failed: {0}")]
    BackingStore(String),

    /// A remote peer fetch failed (connect, non-OK status, or body read).
    /// Recovered by falling back to the local backing store.
    #[error("peer fetch failed: {0}")]
    Peer(String),
}
