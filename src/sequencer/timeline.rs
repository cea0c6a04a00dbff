//! Virtual clock with a queue of timed triggers
//!
//! Triggers fire in (due time, insertion order). Time only moves when the
//! owner advances it, so playback is fully deterministic.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[derive(Debug)]
struct Scheduled<E> {
    due: u64,
    seq: u64,
    event: E,
}

impl<E> PartialEq for Scheduled<E> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<E> Eq for Scheduled<E> {}

impl<E> PartialOrd for Scheduled<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Scheduled<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

/// Priority queue of events keyed by virtual milliseconds
#[derive(Debug)]
pub struct Timeline<E> {
    now: u64,
    next_seq: u64,
    queue: BinaryHeap<Reverse<Scheduled<E>>>,
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<E> Timeline<E> {
    /// Create a timeline whose clock reads `now`
    pub fn new(now: u64) -> Self {
        Self {
            now,
            next_seq: 0,
            queue: BinaryHeap::new(),
        }
    }

    /// Current virtual time
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Schedule at an absolute time. Past times fire on the next poll.
    pub fn schedule_at(&mut self, due: u64, event: E) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Scheduled { due, seq, event }));
    }

    /// Due time of the earliest pending event
    pub fn next_due(&self) -> Option<u64> {
        self.queue.peek().map(|Reverse(s)| s.due)
    }

    /// Pop the earliest event due at or before `until`, moving the clock
    /// forward to its due time.
    pub fn pop_due(&mut self, until: u64) -> Option<(u64, E)> {
        if self.next_due()? > until {
            return None;
        }
        let Reverse(scheduled) = self.queue.pop()?;
        self.now = self.now.max(scheduled.due);
        Some((scheduled.due, scheduled.event))
    }

    /// Move the clock forward without firing anything
    pub fn set_now(&mut self, now: u64) {
        self.now = self.now.max(now);
    }

    /// Remove every pending event matching `pred`, in firing order.
    pub fn cancel_where<F>(&mut self, mut pred: F) -> Vec<E>
    where
        F: FnMut(&E) -> bool,
    {
        let mut all = std::mem::take(&mut self.queue).into_sorted_vec();
        // into_sorted_vec on Reverse yields latest first
        all.reverse();
        let mut cancelled = Vec::new();
        for Reverse(scheduled) in all {
            if pred(&scheduled.event) {
                cancelled.push(scheduled.event);
            } else {
                self.queue.push(Reverse(scheduled));
            }
        }
        cancelled
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
