//! Position addressing for complete binary trees.
//!
//! A complete binary tree laid out breadth-first from 1 gives every slot a
//! unique position. The bits of a position below its highest set bit, read
//! most significant first, spell the walk from the root to that slot:
//! `0` descends left, `1` descends right. The highest set bit only marks the
//! end of the walk.
//!
//! ```text
//!             1
//!        2         3
//!      4   5     6   7
//!     8 9
//! ```
//!
//! Position 9 is `0b1001`: below the leading `1` the bits are `0, 0, 1`,
//! so the walk is left, left, right.
//!
//! This lets the heap find its append slot (or its last occupied slot) in
//! O(log n) link lookups without storing an index in any node.
//!
//! # Example
//!
//! ```rust
//! use rust_intrusive_heap::position::{Direction, Path};
//!
//! let steps: Vec<_> = Path::to(9).collect();
//! assert_eq!(steps, [Direction::Left, Direction::Left, Direction::Right]);
//!
//! // The parent walk stops one level short; the last step picks the slot.
//! let steps: Vec<_> = Path::to_parent(9).collect();
//! assert_eq!(steps, [Direction::Left, Direction::Left]);
//! assert_eq!(Direction::of_slot(9), Direction::Right);
//! ```

/// Index of the highest set bit of `v`, computed by successive range halving.
///
/// Branchless: each step compares against a threshold and shifts by the
/// comparison result. `log2(0)` is `0`, the same as `log2(1)`.
///
/// ```rust
/// use rust_intrusive_heap::position::log2;
///
/// assert_eq!(log2(1), 0);
/// assert_eq!(log2(8), 3);
/// assert_eq!(log2(9), 3);
/// assert_eq!(log2(u64::MAX), 63);
/// ```
#[inline]
pub const fn log2(v: u64) -> u32 {
    let mut v = v;

    let mut r = ((v > 0xFFFF_FFFF) as u32) << 5;
    v >>= r;

    let mut s = ((v > 0xFFFF) as u32) << 4;
    v >>= s;
    r |= s;

    s = ((v > 0xFF) as u32) << 3;
    v >>= s;
    r |= s;

    s = ((v > 0xF) as u32) << 2;
    v >>= s;
    r |= s;

    s = ((v > 0x3) as u32) << 1;
    v >>= s;
    r |= s;

    r | (v >> 1) as u32
}

/// One step of a root-to-slot walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Which side of its parent the slot at `position` hangs from.
    ///
    /// Even positions are left children, odd positions right children.
    /// Meaningless for the root (position 1).
    #[inline]
    pub const fn of_slot(position: usize) -> Direction {
        if position & 1 == 0 {
            Direction::Left
        } else {
            Direction::Right
        }
    }
}

/// Iterator over the steps from the root towards a slot.
///
/// Yields nothing for positions 0 and 1.
#[derive(Debug, Clone)]
pub struct Path {
    position: usize,
    mask: usize,
    // Steps are produced while `mask > stop`.
    stop: usize,
}

impl Path {
    /// Full walk from the root to the slot at `position`.
    #[inline]
    pub fn to(position: usize) -> Self {
        Self::new(position, 0)
    }

    /// Walk from the root to the parent of the slot at `position`.
    ///
    /// The remaining step is [`Direction::of_slot`].
    #[inline]
    pub fn to_parent(position: usize) -> Self {
        Self::new(position, 1)
    }

    fn new(position: usize, stop: usize) -> Self {
        let top = 1usize << log2(position as u64);
        Path {
            position,
            mask: top >> 1,
            stop,
        }
    }
}

impl Iterator for Path {
    type Item = Direction;

    #[inline]
    fn next(&mut self) -> Option<Direction> {
        if self.mask <= self.stop {
            return None;
        }
        let step = if self.position & self.mask == 0 {
            Direction::Left
        } else {
            Direction::Right
        };
        self.mask >>= 1;
        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.mask <= self.stop {
            0
        } else {
            log2(self.mask as u64) as usize + 1 - self.stop
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Path {}

#[cfg(test)]
mod tests {
    use super::*;
    use super::Direction::{Left, Right};

    #[test]
    fn test_log2_matches_leading_zeros() {
        for v in 1..=4096u64 {
            assert_eq!(log2(v), 63 - v.leading_zeros(), "log2({v})");
        }
        for shift in 0..64 {
            let v = 1u64 << shift;
            assert_eq!(log2(v), shift);
            assert_eq!(log2(v | (v >> 1)), shift);
        }
    }

    #[test]
    fn test_log2_zero() {
        assert_eq!(log2(0), 0);
    }

    #[test]
    fn test_root_has_no_steps() {
        assert_eq!(Path::to(1).count(), 0);
        assert_eq!(Path::to_parent(1).count(), 0);
        assert_eq!(Path::to(0).count(), 0);
    }

    #[test]
    fn test_children_of_root() {
        assert_eq!(Path::to(2).collect::<Vec<_>>(), [Left]);
        assert_eq!(Path::to(3).collect::<Vec<_>>(), [Right]);
        assert_eq!(Path::to_parent(2).count(), 0);
        assert_eq!(Path::to_parent(3).count(), 0);
    }

    #[test]
    fn test_deep_paths() {
        assert_eq!(Path::to(6).collect::<Vec<_>>(), [Right, Left]);
        assert_eq!(Path::to(13).collect::<Vec<_>>(), [Right, Left, Right]);
        assert_eq!(Path::to_parent(13).collect::<Vec<_>>(), [Right, Left]);
    }

    #[test]
    fn test_path_reconstructs_position() {
        for position in 1..2000usize {
            let rebuilt = Path::to(position).fold(1usize, |p, step| match step {
                Left => p * 2,
                Right => p * 2 + 1,
            });
            assert_eq!(rebuilt, position);
        }
    }

    #[test]
    fn test_exact_size() {
        for position in 1..600usize {
            let full = Path::to(position);
            assert_eq!(full.len(), full.clone().count());
            let parent = Path::to_parent(position);
            assert_eq!(parent.len(), parent.clone().count());
        }
    }

    #[test]
    fn test_slot_side() {
        assert_eq!(Direction::of_slot(2), Left);
        assert_eq!(Direction::of_slot(3), Right);
        assert_eq!(Direction::of_slot(8), Left);
        assert_eq!(Direction::of_slot(9), Right);
    }
}
