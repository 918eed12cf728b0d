//! Intrusive tree links.
//!
//! A record becomes storable in an [`IntrusiveHeap`](crate::intrusive::IntrusiveHeap)
//! by embedding a [`Links`] and implementing [`HeapNode`]. The heap never owns
//! the record; it only reads and rewrites the three slots.
//!
//! Slots hold keys into the arena the record lives in, not pointers, so a link
//! is always a lookup through [`NodeStorage`](crate::storage::NodeStorage).
//!
//! # Example
//!
//! ```rust
//! use rust_intrusive_heap::link::{HeapNode, Links};
//!
//! struct Job {
//!     due: u64,
//!     links: Links<usize>,
//! }
//!
//! impl HeapNode<usize> for Job {
//!     fn links(&self) -> &Links<usize> {
//!         &self.links
//!     }
//!
//!     fn links_mut(&mut self) -> &mut Links<usize> {
//!         &mut self.links
//!     }
//! }
//!
//! let mut job = Job { due: 10, links: Links::new() };
//! job.prepare();
//! assert!(job.links().is_unlinked());
//! ```

use core::fmt;

use crate::position::Direction;

/// The three structural slots of a heap member.
///
/// When unlinked, all three slots are `None`. A node that is the sole member
/// of a heap is also all `None`: it is the root and has no children.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Links<K> {
    left: Option<K>,
    right: Option<K>,
    parent: Option<K>,
}

impl<K> Links<K> {
    /// Creates a new unlinked set of slots.
    #[inline]
    pub const fn new() -> Self {
        Links {
            left: None,
            right: None,
            parent: None,
        }
    }

    /// Checks whether every slot is empty.
    #[inline]
    pub fn is_unlinked(&self) -> bool {
        self.left.is_none() && self.right.is_none() && self.parent.is_none()
    }

    /// Empties every slot.
    #[inline]
    pub fn clear(&mut self) {
        *self = Links::new();
    }
}

impl<K: Copy> Links<K> {
    #[inline]
    pub fn left(&self) -> Option<K> {
        self.left
    }

    #[inline]
    pub fn right(&self) -> Option<K> {
        self.right
    }

    #[inline]
    pub fn parent(&self) -> Option<K> {
        self.parent
    }

    #[inline]
    pub fn set_left(&mut self, left: Option<K>) {
        self.left = left;
    }

    #[inline]
    pub fn set_right(&mut self, right: Option<K>) {
        self.right = right;
    }

    #[inline]
    pub fn set_parent(&mut self, parent: Option<K>) {
        self.parent = parent;
    }

    /// The child slot on the given side.
    #[inline]
    pub fn child(&self, side: Direction) -> Option<K> {
        match side {
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    #[inline]
    pub fn set_child(&mut self, side: Direction, child: Option<K>) {
        match side {
            Direction::Left => self.left = child,
            Direction::Right => self.right = child,
        }
    }
}

impl<K> Default for Links<K> {
    #[inline]
    fn default() -> Self {
        Links::new()
    }
}

impl<K: fmt::Debug> fmt::Debug for Links<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Links")
            .field("left", &self.left)
            .field("right", &self.right)
            .field("parent", &self.parent)
            .finish()
    }
}

/// Capability of being a member of an intrusive heap.
///
/// Implementors expose get/set access to their embedded [`Links`].
/// `K` is the key type of the arena the node is stored in.
pub trait HeapNode<K> {
    /// Shared access to the node's tree slots.
    fn links(&self) -> &Links<K>;

    /// Exclusive access to the node's tree slots.
    fn links_mut(&mut self) -> &mut Links<K>;

    /// Prepares the node for heap membership by emptying all three slots.
    ///
    /// Must not be called while the node is linked into a heap.
    #[inline]
    fn prepare(&mut self) {
        self.links_mut().clear();
    }
}

impl<K> HeapNode<K> for Links<K> {
    #[inline]
    fn links(&self) -> &Links<K> {
        self
    }

    #[inline]
    fn links_mut(&mut self) -> &mut Links<K> {
        self
    }
}
