//! Intrusive binary min-heap
//!
//! A binary heap kept as an explicit complete binary tree whose links live
//! inside the nodes themselves. Because a node's key is also its position in
//! the tree, an *arbitrary* member can be removed in O(log n) without any
//! auxiliary index. An array-backed heap would need an O(n) search for that.
//!
//! No array and no stored indices: the slot to append to (on insert) and the
//! last occupied slot (on remove) are located by walking from the root along
//! the bits of the element count, see [`position`](crate::position).
//!
//! # Time Complexity
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | `insert`  | O(log n)   |
//! | `remove`  | O(log n)   |
//! | `pop`     | O(log n)   |
//! | `peek`    | O(1)       |
//!
//! # Ownership
//!
//! The heap owns nothing but a root key and a count. Nodes live in a
//! caller-owned arena ([`NodeStorage`]) that is passed to every call. One heap
//! must always be used with the same arena. The heap never inserts into or
//! removes from the arena; the caller may free a node's storage as soon as
//! [`remove`](IntrusiveHeap::remove) returns, since every slot of the removed
//! node is empty by then.
//!
//! # Preconditions
//!
//! Nothing is validated. Inserting a node that is already linked, removing a
//! node that is not a member of this heap, or removing one twice corrupts the
//! tree instead of reporting an error. Callers that need checked removal
//! should track membership themselves, as [`ArenaHeap`](crate::arena::ArenaHeap)
//! does with generational keys.
//!
//! # Example
//!
//! ```rust
//! use rust_intrusive_heap::intrusive::IntrusiveHeap;
//! use rust_intrusive_heap::storage::HeapEntry;
//!
//! let mut arena: Vec<HeapEntry<u32, usize>> =
//!     [5, 3, 8, 1].into_iter().map(HeapEntry::new).collect();
//! let mut heap = IntrusiveHeap::new(|a: &HeapEntry<u32, usize>, b: &HeapEntry<u32, usize>| {
//!     a.value().cmp(b.value())
//! });
//!
//! for key in 0..arena.len() {
//!     heap.insert(&mut arena, key);
//! }
//! assert_eq!(heap.len(), 4);
//! assert_eq!(heap.root(), Some(3)); // the entry holding 1
//!
//! // Cancel the entry holding 8 without touching the minimum
//! heap.remove(&mut arena, 2);
//! assert_eq!(heap.len(), 3);
//! assert_eq!(heap.verify(&arena), Ok(3));
//! ```

use core::cmp::Ordering;
use core::fmt;

use crate::position::{Direction, Path};
use crate::storage::NodeStorage;

/// Intrusive binary min-heap over a caller-owned arena.
///
/// `K` is the arena key type, `C` the comparator. The comparator is bound at
/// construction so one heap has a single ordering for its whole lifetime.
pub struct IntrusiveHeap<K, C> {
    root: Option<K>,
    len: usize,
    compare: C,
}

impl<K, C> IntrusiveHeap<K, C> {
    /// Creates an empty heap ordered by `compare`.
    ///
    /// `compare` must be a consistent total order over the nodes it will see.
    /// The node that compares `Less` than all others ends up at the root.
    #[inline]
    pub const fn new(compare: C) -> Self {
        IntrusiveHeap {
            root: None,
            len: 0,
            compare,
        }
    }

    /// Returns the number of linked nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<K: Copy + Eq + fmt::Debug, C> IntrusiveHeap<K, C> {
    /// Key of the minimum node, if any.
    #[inline]
    pub fn root(&self) -> Option<K> {
        self.root
    }

    /// The minimum node, if any.
    #[inline]
    pub fn peek<'a, S>(&self, storage: &'a S) -> Option<&'a S::Node>
    where
        S: NodeStorage<Key = K>,
    {
        self.root.map(|root| storage.node(root))
    }

    /// Forgets every member without touching the arena.
    ///
    /// The former members keep whatever links they had; call
    /// [`HeapNode::prepare`](crate::link::HeapNode::prepare) on each before
    /// inserting it anywhere again.
    #[inline]
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }
}

impl<K, C> IntrusiveHeap<K, C>
where
    K: Copy + Eq + fmt::Debug,
{
    /// Links `key` into the heap.
    ///
    /// The node must be unlinked (freshly created, prepared, or removed) and
    /// must not be a member of any heap.
    pub fn insert<S>(&mut self, storage: &mut S, key: K)
    where
        S: NodeStorage<Key = K>,
        C: Fn(&S::Node, &S::Node) -> Ordering,
    {
        debug_assert!(storage.links(key).is_unlinked(), "inserting linked node {key:?}");

        // Append position if the heap were an array
        self.len += 1;
        let position = self.len;

        let Some(root) = self.root else {
            self.root = Some(key);
            return;
        };

        let parent = Self::walk_to_parent(storage, root, position);
        storage
            .links_mut(parent)
            .set_child(Direction::of_slot(position), Some(key));
        storage.links_mut(key).set_parent(Some(parent));

        self.sift_up(storage, key);
    }

    /// Unlinks `key`, which may be any member, not only the minimum.
    ///
    /// On return all three slots of the node are empty.
    pub fn remove<S>(&mut self, storage: &mut S, key: K)
    where
        S: NodeStorage<Key = K>,
        C: Fn(&S::Node, &S::Node) -> Ordering,
    {
        debug_assert!(self.len > 0, "removing {key:?} from an empty heap");
        let Some(root) = self.root else {
            return;
        };
        let position = self.len;
        self.len -= 1;

        if position == 1 {
            // Removing the sole member
            self.root = None;
            storage.links_mut(key).clear();
            return;
        }

        // Detach whatever sits in the last occupied slot
        let last_parent = Self::walk_to_parent(storage, root, position);
        let side = Direction::of_slot(position);
        let last = storage
            .links(last_parent)
            .child(side)
            .expect("complete tree has a node in its last occupied slot");
        storage.links_mut(last_parent).set_child(side, None);
        storage.links_mut(last).set_parent(None);

        if last == key {
            // The last slot is gone, so the tree is still complete
            return;
        }

        // Splice the last node into the gap left by `key`
        let gap = *storage.links(key);
        storage.links_mut(key).clear();
        *storage.links_mut(last) = gap;

        match gap.parent() {
            None => self.root = Some(last),
            Some(parent) => {
                let links = storage.links_mut(parent);
                if links.left() == Some(key) {
                    links.set_left(Some(last));
                } else {
                    links.set_right(Some(last));
                }
            }
        }
        for child in [gap.left(), gap.right()].into_iter().flatten() {
            storage.links_mut(child).set_parent(Some(last));
        }

        // Where `last` belongs relative to its new neighbours is unknown, so
        // both directions are always tried.
        self.sift_down(storage, last);
        self.sift_up(storage, last);
    }

    /// Unlinks and returns the minimum.
    pub fn pop<S>(&mut self, storage: &mut S) -> Option<K>
    where
        S: NodeStorage<Key = K>,
        C: Fn(&S::Node, &S::Node) -> Ordering,
    {
        let root = self.root?;
        self.remove(storage, root);
        Some(root)
    }

    /// Follows `position`'s bits from `root` to the parent of that slot.
    fn walk_to_parent<S>(storage: &S, root: K, position: usize) -> K
    where
        S: NodeStorage<Key = K>,
    {
        Path::to_parent(position).fold(root, |node, step| {
            storage
                .links(node)
                .child(step)
                .expect("complete tree has a node on every path above the last slot")
        })
    }

    fn sift_up<S>(&mut self, storage: &mut S, key: K)
    where
        S: NodeStorage<Key = K>,
        C: Fn(&S::Node, &S::Node) -> Ordering,
    {
        let mut parent = storage.links(key).parent();
        while let Some(p) = parent {
            if (self.compare)(storage.node(key), storage.node(p)) != Ordering::Less {
                break;
            }
            parent = Self::swap(storage, p, key);
        }

        if parent.is_none() {
            self.root = Some(key);
        }
    }

    fn sift_down<S>(&mut self, storage: &mut S, key: K)
    where
        S: NodeStorage<Key = K>,
        C: Fn(&S::Node, &S::Node) -> Ordering,
    {
        // A node with no left child has no right child either
        while let Some(left) = storage.links(key).left() {
            let right = storage.links(key).right();

            let mut smallest = key;
            if (self.compare)(storage.node(smallest), storage.node(left)) == Ordering::Greater {
                smallest = left;
            }
            if let Some(right) = right {
                if (self.compare)(storage.node(smallest), storage.node(right)) == Ordering::Greater
                {
                    smallest = right;
                }
            }
            if smallest == key {
                break;
            }

            Self::swap(storage, key, smallest);
            if self.root == Some(key) {
                self.root = Some(smallest);
            }
        }
    }

    /// Exchanges `parent` with its direct child `child`.
    ///
    /// `child` takes over `parent`'s place under the grandparent and keeps
    /// `parent`'s other subtree; `parent` inherits `child`'s two subtrees.
    /// Returns the grandparent, which is `child`'s new parent.
    fn swap<S>(storage: &mut S, parent: K, child: K) -> Option<K>
    where
        S: NodeStorage<Key = K>,
    {
        let above = *storage.links(parent);
        let below = *storage.links(child);
        let grandparent = above.parent();

        if let Some(g) = grandparent {
            let links = storage.links_mut(g);
            if links.left() == Some(parent) {
                links.set_left(Some(child));
            } else {
                links.set_right(Some(child));
            }
        }

        let links = storage.links_mut(parent);
        links.set_left(below.left());
        links.set_right(below.right());
        links.set_parent(Some(child));
        for grandchild in [below.left(), below.right()].into_iter().flatten() {
            storage.links_mut(grandchild).set_parent(Some(parent));
        }

        let (left, right, sibling) = if above.left() == Some(child) {
            (Some(parent), above.right(), above.right())
        } else {
            (above.left(), Some(parent), above.left())
        };
        let links = storage.links_mut(child);
        links.set_left(left);
        links.set_right(right);
        links.set_parent(grandparent);
        if let Some(sibling) = sibling {
            storage.links_mut(sibling).set_parent(Some(child));
        }

        grandparent
    }
}

// ============================================================================
// Invariant checking
// ============================================================================

/// A broken heap invariant found by [`IntrusiveHeap::verify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation<K> {
    /// The root has a parent link
    RootHasParent(K),
    /// A child's parent slot does not point back at the node holding it
    BrokenParentLink { parent: K, child: K },
    /// A node sits at a breadth-first position beyond the element count,
    /// so the tree is not complete
    OutOfPlace { node: K, position: usize },
    /// A child compares less than its parent
    OrderViolated { parent: K, child: K },
    /// The number of reachable nodes differs from the element count
    CountMismatch { len: usize, reachable: usize },
}

impl<K: fmt::Debug> fmt::Display for InvariantViolation<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::RootHasParent(root) => {
                write!(f, "root {root:?} has a parent link")
            }
            InvariantViolation::BrokenParentLink { parent, child } => {
                write!(f, "child {child:?} of {parent:?} does not link back to it")
            }
            InvariantViolation::OutOfPlace { node, position } => {
                write!(f, "node {node:?} at position {position} leaves the tree incomplete")
            }
            InvariantViolation::OrderViolated { parent, child } => {
                write!(f, "child {child:?} is ordered before its parent {parent:?}")
            }
            InvariantViolation::CountMismatch { len, reachable } => {
                write!(f, "heap length is {len} but {reachable} nodes are reachable")
            }
        }
    }
}

impl<K: fmt::Debug> std::error::Error for InvariantViolation<K> {}

impl<K, C> IntrusiveHeap<K, C>
where
    K: Copy + Eq + fmt::Debug,
{
    /// Walks the whole tree and checks every structural invariant.
    ///
    /// Returns the number of reachable nodes. A tree passes when the root has
    /// no parent, every parent/child pair links both ways, every node's
    /// breadth-first position is within `1..=len` (which together with the
    /// count makes the tree complete), and no child is ordered before its
    /// parent. O(n); meant for tests and debugging, never called internally.
    pub fn verify<S>(&self, storage: &S) -> Result<usize, InvariantViolation<K>>
    where
        S: NodeStorage<Key = K>,
        C: Fn(&S::Node, &S::Node) -> Ordering,
    {
        let Some(root) = self.root else {
            return if self.len == 0 {
                Ok(0)
            } else {
                Err(InvariantViolation::CountMismatch {
                    len: self.len,
                    reachable: 0,
                })
            };
        };
        if storage.links(root).parent().is_some() {
            return Err(InvariantViolation::RootHasParent(root));
        }

        let mut reachable = 0usize;
        let mut stack = vec![(root, 1usize)];
        while let Some((node, position)) = stack.pop() {
            if position > self.len {
                return Err(InvariantViolation::OutOfPlace { node, position });
            }
            reachable += 1;

            let links = storage.links(node);
            let children = [(links.left(), 0usize), (links.right(), 1usize)];
            for (child, bit) in children {
                let Some(child) = child else { continue };
                if storage.links(child).parent() != Some(node) {
                    return Err(InvariantViolation::BrokenParentLink {
                        parent: node,
                        child,
                    });
                }
                if (self.compare)(storage.node(node), storage.node(child)) == Ordering::Greater {
                    return Err(InvariantViolation::OrderViolated {
                        parent: node,
                        child,
                    });
                }
                // Saturate so a corrupted, overly deep tree reports OutOfPlace
                let child_position = position.saturating_mul(2).saturating_add(bit);
                stack.push((child, child_position));
            }
        }

        if reachable != self.len {
            return Err(InvariantViolation::CountMismatch {
                len: self.len,
                reachable,
            });
        }
        Ok(reachable)
    }
}

impl<K: fmt::Debug, C> fmt::Debug for IntrusiveHeap<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntrusiveHeap")
            .field("root", &self.root)
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}
