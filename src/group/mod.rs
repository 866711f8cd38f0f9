//! Namespace Coordination Module
//!
//! A *group* is a named cache namespace with its own byte budget and its own
//! backing store. This module wires the subsystems into the lookup path a
//! client sees.
//!
//! ## Lookup Path
//! 1. **Local cache**: a hit returns immediately and touches nothing else.
//! 2. **Single-flight**: concurrent misses for one key collapse into a single
//!    load; every waiter receives the same outcome.
//! 3. **Peer dispatch**: if the hash ring assigns the key to another node,
//!    the value is fetched from that owner and *not* cached here, so each
//!    key's memory lives on exactly one node.
//! 4. **Local load**: if this node owns the key (or the peer fetch failed),
//!    the backing store is called and the result populates the local cache.
//!
//! ## Submodules
//! - **`coordinator`**: The `Group` type implementing the lookup path.
//! - **`registry`**: Process-wide directory of named groups.
//! - **`peers`**: Capability contracts the transport layer implements.
//! - **`source`**: The backing-store function seam.

pub mod coordinator;
pub mod peers;
pub mod registry;
pub mod source;

#[cfg(test)]
mod tests;
