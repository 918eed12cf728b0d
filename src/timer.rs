//! Deadline-ordered timer queue.
//!
//! This is the scheduling side of the heap: it owns timer payloads, labels
//! them with [`TimerId`]s, and decides when they fire. The event loop asks
//! [`TimerQueue::time_until_next`] how long it may sleep, then drains
//! [`TimerQueue::pop_expired`] after waking.
//!
//! Cancelling is O(log n) for any pending timer, not only the next one due.
//! Cancelling a timer that already fired (or was already cancelled) is an
//! error rather than undefined behaviour, because ids are generational.
//!
//! Timers with equal deadlines fire in the order they were scheduled.

use std::time::{Duration, Instant};

use crate::arena::{ArenaHandle, ArenaHeap};
use crate::traits::{Heap, HeapError, RemovableHeap};

/// Ordering key: the deadline, then the scheduling sequence number.
type Slot = (Instant, u64);

/// Identifies a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(ArenaHandle);

/// Timer queue ordered by deadline.
#[derive(Debug)]
pub struct TimerQueue<T> {
    heap: ArenaHeap<T, Slot>,
    next_seq: u64,
}

impl<T> TimerQueue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty queue with room for `capacity` pending timers.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: ArenaHeap::with_capacity(capacity),
            next_seq: 0,
        }
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn next_slot(&mut self, deadline: Instant) -> Slot {
        let seq = self.next_seq;
        self.next_seq += 1;
        (deadline, seq)
    }

    /// Schedules `payload` to fire at `deadline`.
    pub fn schedule(&mut self, deadline: Instant, payload: T) -> TimerId {
        let slot = self.next_slot(deadline);
        let id = TimerId(self.heap.push_with_handle(slot, payload));
        tracing::trace!(
            event = "timer.schedule",
            timer = ?id,
            deadline = ?slot.0,
            seq = slot.1,
            pending = self.heap.len(),
            "Scheduled timer"
        );
        id
    }

    /// Cancels a pending timer and hands back its payload.
    ///
    /// # Errors
    /// Returns `HeapError::InvalidHandle` if the timer already fired or was
    /// already cancelled.
    pub fn cancel(&mut self, id: &TimerId) -> Result<T, HeapError> {
        match self.heap.remove(&id.0) {
            Ok((_, payload)) => {
                tracing::trace!(
                    event = "timer.cancel",
                    timer = ?id,
                    pending = self.heap.len(),
                    "Cancelled timer"
                );
                Ok(payload)
            }
            Err(err) => {
                tracing::debug!(
                    event = "timer.cancel.stale",
                    timer = ?id,
                    "Cancel for a timer that is no longer pending"
                );
                Err(err)
            }
        }
    }

    /// Moves a pending timer to a new deadline.
    ///
    /// The timer is ordered after every timer already scheduled for the same
    /// deadline, as if it had just been scheduled.
    ///
    /// # Errors
    /// Returns `HeapError::InvalidHandle` if the timer is no longer pending.
    pub fn reschedule(&mut self, id: &TimerId, deadline: Instant) -> Result<(), HeapError> {
        if !self.heap.contains(&id.0) {
            return Err(HeapError::InvalidHandle);
        }
        let slot = self.next_slot(deadline);
        self.heap.update_priority(&id.0, slot)?;
        tracing::trace!(
            event = "timer.reschedule",
            timer = ?id,
            deadline = ?slot.0,
            seq = slot.1,
            "Rescheduled timer"
        );
        Ok(())
    }

    /// Returns true if the timer has neither fired nor been cancelled.
    #[must_use]
    pub fn is_scheduled(&self, id: &TimerId) -> bool {
        self.heap.contains(&id.0)
    }

    /// Deadline of the timer due next.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.heap.peek().map(|(slot, _)| slot.0)
    }

    /// How long the caller may wait before the next timer is due.
    ///
    /// Zero if a timer is already overdue; `None` if nothing is pending.
    #[must_use]
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Removes and returns the next timer if its deadline is `<= now`.
    pub fn pop_expired(&mut self, now: Instant) -> Option<(TimerId, T)> {
        let handle = self.heap.peek_handle()?;
        let (slot, _) = self.heap.peek()?;
        if slot.0 > now {
            return None;
        }

        let (slot, payload) = self.heap.remove(&handle).ok()?;
        let id = TimerId(handle);
        let lateness = now.saturating_duration_since(slot.0);
        tracing::trace!(
            event = "timer.fire",
            timer = ?id,
            lateness_us = micros_saturating(lateness),
            pending = self.heap.len(),
            "Timer expired"
        );
        Some((id, payload))
    }

    /// Removes every timer whose deadline is `<= now`, in firing order.
    pub fn drain_expired(&mut self, now: Instant) -> Vec<(TimerId, T)> {
        let expired: Vec<_> = std::iter::from_fn(|| self.pop_expired(now)).collect();
        if !expired.is_empty() {
            tracing::debug!(
                event = "timer.drain",
                fired = expired.len(),
                pending = self.heap.len(),
                "Drained expired timers"
            );
        }
        expired
    }

    /// Drops every pending timer.
    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

fn micros_saturating(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
