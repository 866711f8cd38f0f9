use bytes::Bytes;

use super::lru::ValueSize;

/// An immutable, read-only view over a cached value.
///
/// Cloning is cheap (reference counted) and no handle ever permits mutation,
/// so a view can be shared freely between the cache, in-flight loads, and
/// response bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteView {
    data: Bytes,
}

impl ByteView {
    /// Builds a view by copying `raw`, leaving the caller's buffer untouched.
    pub fn from_copy(raw: &[u8]) -> Self {
        Self {
            data: Bytes::copy_from_slice(raw),
        }
    }

    /// Number of bytes in the view.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Read-only access to the underlying bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Copies the bytes out into an owned buffer.
    pub fn to_vec(&self) -> Vec<u8> {
        self.data.to_vec()
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(raw: Vec<u8>) -> Self {
        Self {
            data: Bytes::from(raw),
        }
    }
}

impl ValueSize for ByteView {
    fn size(&self) -> usize {
        self.data.len()
    }
}
