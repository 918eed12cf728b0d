//! Owning heap over a generational arena
//!
//! [`ArenaHeap`] bundles a `slotmap` arena with an
//! [`IntrusiveHeap`] ordered by priority. It owns its elements and hands out
//! generational handles, so removing through a handle whose element is
//! already gone is reported as [`HeapError::InvalidHandle`] instead of
//! corrupting the tree.
//!
//! # Time Complexity
//!
//! | Operation         | Complexity |
//! |-------------------|------------|
//! | `push`            | O(log n)   |
//! | `pop`             | O(log n)   |
//! | `peek`            | O(1)       |
//! | `remove`          | O(log n)   |
//! | `update_priority` | O(log n)   |
//!
//! # Example
//!
//! ```rust
//! use rust_intrusive_heap::arena::ArenaHeap;
//! use rust_intrusive_heap::{Heap, RemovableHeap};
//!
//! let mut heap = ArenaHeap::new();
//! let a = heap.push_with_handle(5, "a");
//! let b = heap.push_with_handle(3, "b");
//!
//! heap.update_priority(&a, 1).unwrap();
//! assert_eq!(heap.peek(), Some((&1, &"a")));
//!
//! assert_eq!(heap.remove(&b), Ok((3, "b")));
//! assert_eq!(heap.pop(), Some((1, "a")));
//! assert!(heap.is_empty());
//! ```

use core::cmp::Ordering;
use core::fmt;

use slotmap::SlotMap;

use crate::intrusive::{IntrusiveHeap, InvariantViolation};
use crate::storage::{HeapEntry, NodeKey};
use crate::traits::{Handle, Heap, HeapError, RemovableHeap};

type Entry<T, P> = HeapEntry<(P, T)>;
type Arena<T, P> = SlotMap<NodeKey, Entry<T, P>>;
type ByPriority<T, P> = fn(&Entry<T, P>, &Entry<T, P>) -> Ordering;

fn by_priority<T, P: Ord>(a: &Entry<T, P>, b: &Entry<T, P>) -> Ordering {
    a.value().0.cmp(&b.value().0)
}

/// Handle to an element in an [`ArenaHeap`]
///
/// Handles are generational: once the element is popped or removed, the
/// handle stays invalid even if its arena slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ArenaHandle(NodeKey);

impl Handle for ArenaHandle {}

/// Min-heap owning its elements, with O(log n) removal by handle
pub struct ArenaHeap<T, P: Ord> {
    nodes: Arena<T, P>,
    heap: IntrusiveHeap<NodeKey, ByPriority<T, P>>,
}

impl<T, P: Ord> ArenaHeap<T, P> {
    /// Creates an empty heap with room for `capacity` elements
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: SlotMap::with_capacity_and_key(capacity),
            heap: IntrusiveHeap::new(by_priority::<T, P> as ByPriority<T, P>),
        }
    }

    /// Returns the priority and item behind a handle, if still present
    pub fn get(&self, handle: &ArenaHandle) -> Option<(&P, &T)> {
        self.nodes.get(handle.0).map(|entry| {
            let (priority, item) = entry.value();
            (priority, item)
        })
    }

    /// Handle of the current minimum
    pub fn peek_handle(&self) -> Option<ArenaHandle> {
        self.heap.root().map(ArenaHandle)
    }

    /// Changes the priority of an element in place
    ///
    /// The element is unlinked, updated, and linked again; its handle stays
    /// valid. Works for both lower and higher priorities.
    ///
    /// # Errors
    /// Returns `HeapError::InvalidHandle` if the element is gone.
    pub fn update_priority(&mut self, handle: &ArenaHandle, priority: P) -> Result<(), HeapError> {
        if !self.nodes.contains_key(handle.0) {
            return Err(HeapError::InvalidHandle);
        }
        self.heap.remove(&mut self.nodes, handle.0);
        self.nodes[handle.0].value_mut().0 = priority;
        self.heap.insert(&mut self.nodes, handle.0);
        Ok(())
    }

    /// Removes every element
    pub fn clear(&mut self) {
        self.heap.clear();
        self.nodes.clear();
    }

    /// Checks the tree invariants, returning the element count
    pub fn verify(&self) -> Result<usize, InvariantViolation<NodeKey>> {
        let count = self.heap.verify(&self.nodes)?;
        if count != self.nodes.len() {
            return Err(InvariantViolation::CountMismatch {
                len: self.nodes.len(),
                reachable: count,
            });
        }
        Ok(count)
    }
}

impl<T, P: Ord> Heap<T, P> for ArenaHeap<T, P> {
    fn new() -> Self {
        Self::with_capacity(0)
    }

    fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn len(&self) -> usize {
        self.heap.len()
    }

    fn push(&mut self, priority: P, item: T) {
        let _ = self.push_with_handle(priority, item);
    }

    fn peek(&self) -> Option<(&P, &T)> {
        self.heap.peek(&self.nodes).map(|entry| {
            let (priority, item) = entry.value();
            (priority, item)
        })
    }

    fn pop(&mut self) -> Option<(P, T)> {
        let key = self.heap.pop(&mut self.nodes)?;
        self.nodes.remove(key).map(HeapEntry::into_value)
    }
}

impl<T, P: Ord> RemovableHeap<T, P> for ArenaHeap<T, P> {
    type Handle = ArenaHandle;

    fn push_with_handle(&mut self, priority: P, item: T) -> ArenaHandle {
        let key = self.nodes.insert(HeapEntry::new((priority, item)));
        self.heap.insert(&mut self.nodes, key);
        ArenaHandle(key)
    }

    fn contains(&self, handle: &ArenaHandle) -> bool {
        self.nodes.contains_key(handle.0)
    }

    fn remove(&mut self, handle: &ArenaHandle) -> Result<(P, T), HeapError> {
        if !self.nodes.contains_key(handle.0) {
            return Err(HeapError::InvalidHandle);
        }
        self.heap.remove(&mut self.nodes, handle.0);
        let entry = self.nodes.remove(handle.0).expect("handle checked above");
        Ok(entry.into_value())
    }
}

impl<T, P: Ord> Default for ArenaHeap<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P: Ord> fmt::Debug for ArenaHeap<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArenaHeap")
            .field("len", &self.heap.len())
            .field("root", &self.heap.root())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut heap = ArenaHeap::new();

        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);

        heap.push(3, "three");
        heap.push(1, "one");
        heap.push(2, "two");

        assert!(!heap.is_empty());
        assert_eq!(heap.len(), 3);
        assert_eq!(heap.peek(), Some((&1, &"one")));

        assert_eq!(heap.pop(), Some((1, "one")));
        assert_eq!(heap.pop(), Some((2, "two")));
        assert_eq!(heap.pop(), Some((3, "three")));
        assert_eq!(heap.pop(), None);
    }

    #[test]
    fn test_duplicate_priorities() {
        let mut heap = ArenaHeap::new();

        heap.push(1, "a");
        heap.push(1, "b");
        heap.push(1, "c");

        assert_eq!(heap.len(), 3);
        for _ in 0..3 {
            let (priority, _) = heap.pop().unwrap();
            assert_eq!(priority, 1);
        }
        assert!(heap.is_empty());
    }

    #[test]
    fn test_remove_arbitrary() {
        let mut heap = ArenaHeap::new();
        let handles: Vec<_> = (0..20).map(|i| heap.push_with_handle(i, i * 10)).collect();

        assert_eq!(heap.remove(&handles[7]), Ok((7, 70)));
        assert_eq!(heap.remove(&handles[0]), Ok((0, 0)));
        assert_eq!(heap.remove(&handles[19]), Ok((19, 190)));
        assert_eq!(heap.verify(), Ok(17));

        let popped: Vec<_> = std::iter::from_fn(|| heap.pop()).map(|(p, _)| p).collect();
        let expected: Vec<_> = (1..19).filter(|&p| p != 7).collect();
        assert_eq!(popped, expected);
    }

    #[test]
    fn test_stale_handle_rejected() {
        let mut heap = ArenaHeap::new();
        let handle = heap.push_with_handle(1, "x");

        assert_eq!(heap.pop(), Some((1, "x")));
        assert!(!heap.contains(&handle));
        assert_eq!(heap.remove(&handle), Err(HeapError::InvalidHandle));
        assert_eq!(heap.update_priority(&handle, 0), Err(HeapError::InvalidHandle));

        // Slot reuse must not revive the old handle
        let fresh = heap.push_with_handle(2, "y");
        assert_ne!(fresh, handle);
        assert_eq!(heap.remove(&handle), Err(HeapError::InvalidHandle));
        assert_eq!(heap.len(), 1);
    }

    #[test]
    fn test_double_remove_leaves_heap_intact() {
        let mut heap = ArenaHeap::new();
        let handles: Vec<_> = (0..5).map(|i| heap.push_with_handle(i, i)).collect();

        assert_eq!(heap.remove(&handles[2]), Ok((2, 2)));
        assert_eq!(heap.remove(&handles[2]), Err(HeapError::InvalidHandle));
        assert_eq!(heap.len(), 4);
        assert_eq!(heap.verify(), Ok(4));
        assert_eq!(heap.get(&handles[3]), Some((&3, &3)));
    }

    #[test]
    fn test_update_priority_both_directions() {
        let mut heap = ArenaHeap::new();
        let a = heap.push_with_handle(10, 'a');
        let b = heap.push_with_handle(20, 'b');
        let c = heap.push_with_handle(30, 'c');

        heap.update_priority(&c, 5).unwrap();
        assert_eq!(heap.peek_handle(), Some(c));

        heap.update_priority(&c, 40).unwrap();
        assert_eq!(heap.peek_handle(), Some(a));

        heap.update_priority(&a, 25).unwrap();
        assert_eq!(heap.get(&a), Some((&25, &'a')));
        assert_eq!(heap.peek_handle(), Some(b));
        assert_eq!(heap.verify(), Ok(3));
    }

    #[test]
    fn test_clear() {
        let mut heap = ArenaHeap::with_capacity(8);
        let handle = heap.push_with_handle(1, ());
        heap.push(2, ());

        heap.clear();
        assert!(heap.is_empty());
        assert!(!heap.contains(&handle));
        assert_eq!(heap.verify(), Ok(0));

        heap.push(3, ());
        assert_eq!(heap.peek(), Some((&3, &())));
    }
}
