//! Common traits for owning heaps
//!
//! This module provides a two-tier trait hierarchy for heaps that own their
//! elements:
//!
//! - [`Heap`]: Base trait with the familiar push/peek/pop surface
//! - [`RemovableHeap`]: Extended trait adding handle-based removal of
//!   arbitrary elements
//!
//! The low-level [`IntrusiveHeap`](crate::intrusive::IntrusiveHeap) does not
//! implement these; it works on a caller-owned arena instead of owning
//! elements. [`ArenaHeap`](crate::arena::ArenaHeap) wraps it behind this API.

use std::fmt;

/// Error type for handle-based heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// The handle is no longer valid (element was popped or removed)
    InvalidHandle,
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::InvalidHandle => {
                write!(f, "handle is no longer valid (element was removed)")
            }
        }
    }
}

impl std::error::Error for HeapError {}

/// A handle to an element in the heap, used for removal
///
/// This is an opaque type that identifies a specific element in the heap.
pub trait Handle: Clone + PartialEq + Eq {}

/// Base trait for heap/priority queue data structures
///
/// This trait provides a simple API similar to Rust's `BinaryHeap`:
/// - `push` inserts an element (returns `()`)
/// - `pop` removes and returns the minimum
/// - `peek` returns the minimum without removing it
///
/// Unlike `BinaryHeap` which stores values directly (using `Ord`), these heaps
/// store (priority, item) pairs to separate the ordering key from the data.
///
/// # Example
///
/// ```rust
/// use rust_intrusive_heap::Heap;
/// use rust_intrusive_heap::arena::ArenaHeap;
///
/// let mut heap = ArenaHeap::new();
/// heap.push(3, "three");
/// heap.push(1, "one");
/// heap.push(2, "two");
///
/// assert_eq!(heap.peek(), Some((&1, &"one")));
/// assert_eq!(heap.pop(), Some((1, "one")));
/// ```
pub trait Heap<T, P: Ord> {
    /// Creates a new empty heap
    fn new() -> Self;

    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool;

    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Inserts an element with the given priority
    ///
    /// # Time Complexity
    /// O(log n)
    fn push(&mut self, priority: P, item: T);

    /// Returns the minimum priority and associated item without removing it
    ///
    /// Note that `BinaryHeap` is a max-heap, while these heaps are min-heaps.
    ///
    /// # Time Complexity
    /// O(1)
    fn peek(&self) -> Option<(&P, &T)>;

    /// Removes and returns the minimum priority and associated item
    ///
    /// # Time Complexity
    /// O(log n)
    fn pop(&mut self) -> Option<(P, T)>;
}

/// Extended heap trait with removal of arbitrary elements
///
/// - `push_with_handle` returns a handle identifying the element
/// - `remove` takes that element out wherever it sits in the heap
///
/// This is what a scheduler needs to cancel a pending entry that is not the
/// next one due.
///
/// # Example
///
/// ```rust
/// use rust_intrusive_heap::{Heap, RemovableHeap};
/// use rust_intrusive_heap::arena::ArenaHeap;
///
/// let mut heap = ArenaHeap::new();
/// heap.push(1, "first");
/// let handle = heap.push_with_handle(10, "cancel me");
/// heap.push(20, "last");
///
/// assert_eq!(heap.remove(&handle), Ok((10, "cancel me")));
/// assert!(heap.remove(&handle).is_err());
/// assert_eq!(heap.len(), 2);
/// ```
pub trait RemovableHeap<T, P: Ord>: Heap<T, P> {
    /// The handle type for this heap
    type Handle: Handle;

    /// Inserts an element with the given priority, returning a handle
    ///
    /// # Time Complexity
    /// O(log n)
    fn push_with_handle(&mut self, priority: P, item: T) -> Self::Handle;

    /// Returns true if the handle still refers to an element of this heap
    fn contains(&self, handle: &Self::Handle) -> bool;

    /// Removes the element identified by the handle, wherever it is
    ///
    /// # Errors
    /// Returns `HeapError::InvalidHandle` if the element was already popped
    /// or removed.
    ///
    /// # Time Complexity
    /// O(log n)
    fn remove(&mut self, handle: &Self::Handle) -> Result<(P, T), HeapError>;
}
