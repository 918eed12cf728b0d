//! Arena backends for intrusive heap nodes
//!
//! The heap does not own its nodes. They live in an arena owned by the caller,
//! and every tree link is a key into that arena. This module provides the
//! lookup abstraction the heap walks through:
//!
//! - [`NodeStorage`]: key to node lookup, the only thing the heap needs
//! - `SlotMap<K, N>`: generational arena from `slotmap`, stale keys are detectable
//! - `Vec<N>`: plain index arena with `usize` keys
//!
//! [`HeapEntry`] is a ready-made node record: a payload plus its [`Links`].
//!
//! # Example
//!
//! ```rust
//! use rust_intrusive_heap::intrusive::IntrusiveHeap;
//! use rust_intrusive_heap::storage::{HeapEntry, NodeKey};
//! use slotmap::SlotMap;
//!
//! let mut arena: SlotMap<NodeKey, HeapEntry<u32>> = SlotMap::with_key();
//! let mut heap = IntrusiveHeap::new(|a: &HeapEntry<u32>, b: &HeapEntry<u32>| {
//!     a.value().cmp(b.value())
//! });
//!
//! let five = arena.insert(HeapEntry::new(5));
//! let two = arena.insert(HeapEntry::new(2));
//! heap.insert(&mut arena, five);
//! heap.insert(&mut arena, two);
//!
//! assert_eq!(heap.root(), Some(two));
//! assert_eq!(heap.peek(&arena).map(HeapEntry::value), Some(&2));
//! ```

use core::fmt;

use slotmap::{new_key_type, SlotMap};

use crate::link::{HeapNode, Links};

/// Lookup from arena keys to heap nodes.
///
/// Looking up a key that is not in the arena panics. The heap only ever looks
/// up keys that were inserted into it, so a panic here means a caller
/// precondition was broken (a node freed while still linked, or a key from a
/// different arena).
pub trait NodeStorage {
    /// Key type stored in the link slots
    type Key: Copy + Eq + fmt::Debug;

    /// Node record type
    type Node: HeapNode<Self::Key>;

    /// Shared access to the node behind `key`
    fn node(&self, key: Self::Key) -> &Self::Node;

    /// Exclusive access to the node behind `key`
    fn node_mut(&mut self, key: Self::Key) -> &mut Self::Node;

    /// Shorthand for `self.node(key).links()`
    #[inline]
    fn links(&self, key: Self::Key) -> &Links<Self::Key> {
        self.node(key).links()
    }

    /// Shorthand for `self.node_mut(key).links_mut()`
    #[inline]
    fn links_mut(&mut self, key: Self::Key) -> &mut Links<Self::Key> {
        self.node_mut(key).links_mut()
    }
}

// ============================================================================
// SlotMap - generational arena
// ============================================================================

new_key_type! {
    /// Arena key for heap entries
    pub struct NodeKey;
}

impl<K, N> NodeStorage for SlotMap<K, N>
where
    K: slotmap::Key,
    N: HeapNode<K>,
{
    type Key = K;
    type Node = N;

    #[inline]
    fn node(&self, key: K) -> &N {
        &self[key]
    }

    #[inline]
    fn node_mut(&mut self, key: K) -> &mut N {
        &mut self[key]
    }
}

// ============================================================================
// Vec - index arena
// ============================================================================

impl<N> NodeStorage for Vec<N>
where
    N: HeapNode<usize>,
{
    type Key = usize;
    type Node = N;

    #[inline]
    fn node(&self, key: usize) -> &N {
        &self[key]
    }

    #[inline]
    fn node_mut(&mut self, key: usize) -> &mut N {
        &mut self[key]
    }
}

// ============================================================================
// HeapEntry - payload plus links
// ============================================================================

/// A payload wrapped with the three heap slots.
///
/// Created unlinked, so it is ready for its first insertion.
///
/// Mutating the part of the payload that the heap's comparator reads while
/// the entry is linked breaks heap order. Remove it first, mutate, then
/// insert it again.
#[derive(Clone)]
pub struct HeapEntry<V, K = NodeKey> {
    value: V,
    links: Links<K>,
}

impl<V, K> HeapEntry<V, K> {
    #[inline]
    pub const fn new(value: V) -> Self {
        HeapEntry {
            value,
            links: Links::new(),
        }
    }

    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    #[inline]
    pub fn into_value(self) -> V {
        self.value
    }
}

impl<V, K> HeapNode<K> for HeapEntry<V, K> {
    #[inline]
    fn links(&self) -> &Links<K> {
        &self.links
    }

    #[inline]
    fn links_mut(&mut self) -> &mut Links<K> {
        &mut self.links
    }
}

impl<V: fmt::Debug, K: fmt::Debug> fmt::Debug for HeapEntry<V, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeapEntry")
            .field("value", &self.value)
            .field("links", &self.links)
            .finish()
    }
}
