//! Consistent-Hash Ring Module
//!
//! Maps keys to owner nodes so that every node in the fleet computes the same
//! assignment independently, and so that membership changes move as few keys
//! as possible.
//!
//! ## Mechanism
//! - **Virtual Nodes**: Each real node is hashed onto the ring `replicas`
//!   times (the replica index in decimal, concatenated with the node id), which
//!   smooths the key distribution across nodes.
//! - **Lookup**: A key is hashed to `u32` and assigned to the first virtual
//!   node clockwise from it (binary search over the sorted ring, wrapping to
//!   the start past the last position).
//! - **Membership**: Nodes are only added. A membership change rebuilds the
//!   ring from scratch and the holder swaps the finished ring in atomically.

use std::collections::HashMap;

/// Hash seam: any `bytes -> u32` function. Defaults to CRC32-IEEE.
pub type HashFn = Box<dyn Fn(&[u8]) -> u32 + Send + Sync>;

pub struct HashRing {
    replicas: usize,
    hash: HashFn,
    ring: Vec<u32>,
    owners: HashMap<u32, String>,
}

impl HashRing {
    /// Creates an empty ring hashing with CRC32-IEEE.
    pub fn new(replicas: usize) -> Self {
        Self::with_hasher(replicas, crc32fast::hash)
    }

    /// Creates an empty ring with an injected hash function.
    pub fn with_hasher<H>(replicas: usize, hash: H) -> Self
    where
        H: Fn(&[u8]) -> u32 + Send + Sync + 'static,
    {
        Self {
            replicas,
            hash: Box::new(hash),
            ring: Vec::new(),
            owners: HashMap::new(),
        }
    }

    /// Adds real nodes, placing `replicas` virtual positions for each, and
    /// re-sorts the ring.
    pub fn add<I, S>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for node in nodes {
            let node = node.into();
            for i in 0..self.replicas {
                let virtual_key = format!("{}{}", i, node);
                let hash = (self.hash)(virtual_key.as_bytes());
                self.ring.push(hash);
                self.owners.insert(hash, node.clone());
            }
        }
        self.ring.sort_unstable();
    }

    /// Returns the node that owns `key`, or `None` when the ring is empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.ring.is_empty() {
            return None;
        }
        let hash = (self.hash)(key.as_bytes());
        let idx = self.ring.partition_point(|&position| position < hash) % self.ring.len();
        self.owners.get(&self.ring[idx]).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Number of virtual positions currently on the ring.
    pub fn virtual_nodes(&self) -> usize {
        self.ring.len()
    }
}
