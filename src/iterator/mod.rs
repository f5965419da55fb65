//! Iterator module for triewalk
//!
//! Defines the capability this crate consumes from a trie implementation and
//! the wrappers built on top of it:
//!
//! ```text
//! SeekableTrie::node_iterator(key)
//!     ↓
//! NodeIterator (external, pre-order over trie nodes)
//!     ↓
//! BoundedIterator (stops past its range end)
//!     ↓
//! TrackedIterator (publishes its position to a Tracker)
//! ```
//!
//! ## Key Design Principles
//!
//! 1. **Storage agnostic**: nothing here knows how nodes are stored or hashed
//! 2. **Pass-through**: wrappers only gate `next`; inspection and errors are
//!    forwarded untouched
//! 3. **Single owner**: an iterator is advanced by exactly one worker
use crate::util::Result;

/// Hash of a trie node as reported by the underlying trie.
pub type NodeHash = [u8; 32];

/// Pre-order iterator over the nodes of a trie
///
/// # Lifecycle
///
/// A freshly created iterator is positioned *before* its first node. The
/// first call to `next` moves onto the first node whose path is at or after
/// the seek key it was created with:
///
/// ```ignore
/// let mut it = trie.node_iterator(&[])?;
/// while it.next(true)? {
///     println!("{:x?} leaf={}", it.path(), it.leaf());
/// }
/// ```
///
/// # Error Handling
///
/// `next` returns an error when the underlying storage fails. Wrappers in this
/// crate forward that error unchanged and add no error kinds of their own.
pub trait NodeIterator {
    /// Move to the next node in pre-order
    ///
    /// With `descend == false` the children of the current node are skipped.
    /// Returns Ok(true) if positioned on a node, Ok(false) once exhausted
    fn next(&mut self, descend: bool) -> Result<bool>;

    /// Nibble path of the current node
    fn path(&self) -> &[u8];

    /// Hash of the current node; all zeros for embedded nodes
    fn hash(&self) -> NodeHash;

    /// Hash of the closest hashed ancestor
    fn parent(&self) -> NodeHash;

    /// Whether the current node is a leaf (value) node
    fn leaf(&self) -> bool;

    /// Full key of the current leaf
    ///
    /// Prerequisite: leaf() == true
    fn leaf_key(&self) -> Option<&[u8]>;

    /// Raw value stored at the current leaf
    ///
    /// Prerequisite: leaf() == true
    fn leaf_blob(&self) -> Option<&[u8]>;
}

impl<I: NodeIterator + ?Sized> NodeIterator for Box<I> {
    fn next(&mut self, descend: bool) -> Result<bool> {
        (**self).next(descend)
    }

    fn path(&self) -> &[u8] {
        (**self).path()
    }

    fn hash(&self) -> NodeHash {
        (**self).hash()
    }

    fn parent(&self) -> NodeHash {
        (**self).parent()
    }

    fn leaf(&self) -> bool {
        (**self).leaf()
    }

    fn leaf_key(&self) -> Option<&[u8]> {
        (**self).leaf_key()
    }

    fn leaf_blob(&self) -> Option<&[u8]> {
        (**self).leaf_blob()
    }
}

/// A trie that can hand out node iterators seeked to a key
///
/// `start_key` is a byte key; paths of odd nibble length are padded with a
/// zero nibble before they get here (see [`crate::path::Path::to_key_bytes`]).
pub trait SeekableTrie {
    type Iter: NodeIterator;

    fn node_iterator(&self, start_key: &[u8]) -> Result<Self::Iter>;
}

impl<T: SeekableTrie + ?Sized> SeekableTrie for &T {
    type Iter = T::Iter;

    fn node_iterator(&self, start_key: &[u8]) -> Result<Self::Iter> {
        (**self).node_iterator(start_key)
    }
}

mod bounded_iterator;
mod subtrie;
#[cfg(test)]
pub(crate) mod testing;

pub use bounded_iterator::BoundedIterator;
pub use subtrie::{SubtrieIteratorFactory, subtrie_iterators};
