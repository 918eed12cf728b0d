//! Intrusive Binary Heap for Rust
//!
//! This crate provides a binary min-heap whose tree links live inside the
//! elements themselves, so that any element (not just the minimum) can be
//! removed in O(log n) given only a reference to it. That is the operation a
//! timer scheduler needs to cancel a pending deadline.
//!
//! # Layers
//!
//! - **[`intrusive::IntrusiveHeap`]**: the core. A complete binary tree over a
//!   caller-owned arena, addressed by the bits of the element count instead
//!   of an array. Unchecked preconditions, no allocation.
//! - **[`arena::ArenaHeap`]**: an owning heap with generational handles and
//!   checked removal, implementing [`Heap`] and [`RemovableHeap`].
//! - **[`timer::TimerQueue`]**: a deadline-ordered, cancellable timer queue
//!   for event loops.
//!
//! # Example
//!
//! ```rust
//! use rust_intrusive_heap::arena::ArenaHeap;
//! use rust_intrusive_heap::{Heap, RemovableHeap};
//!
//! let mut heap = ArenaHeap::new();
//! heap.push(5, "five");
//! let three = heap.push_with_handle(3, "three");
//! heap.push(8, "eight");
//! heap.push(1, "one");
//!
//! assert_eq!(heap.peek(), Some((&1, &"one")));
//! assert_eq!(heap.remove(&three), Ok((3, "three")));
//! assert_eq!(heap.pop(), Some((1, "one")));
//! assert_eq!(heap.pop(), Some((5, "five")));
//! ```

pub mod arena;
pub mod intrusive;
pub mod link;
pub mod position;
pub mod storage;
pub mod timer;
pub mod traits;

// Re-export the main traits for convenience
pub use traits::{Heap, HeapError, RemovableHeap};
