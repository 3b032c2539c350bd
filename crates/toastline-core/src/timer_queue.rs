#![forbid(unsafe_code)]

//! One-shot task queue with cancellable handles.
//!
//! Tasks are ordered by deadline and, for equal deadlines, by scheduling
//! order. Nothing fires on its own: the owner pops due tasks after advancing
//! its [`DeterministicClock`](crate::clock::DeterministicClock).
//!
//! # Invariants
//!
//! 1. A handle refers to at most one pending task and is never reissued.
//! 2. A cancelled or popped task never fires again.
//! 3. Due tasks pop in `(deadline, schedule order)` order.
//!
//! # Example
//!
//! ```
//! use core::time::Duration;
//! use toastline_core::timer_queue::TimerQueue;
//!
//! let mut queue = TimerQueue::new();
//! let late = queue.schedule(Duration::from_millis(20), "late");
//! queue.schedule(Duration::from_millis(10), "early");
//! queue.cancel(late);
//!
//! let (_, _, task) = queue.pop_due(Duration::from_millis(50)).unwrap();
//! assert_eq!(task, "early");
//! assert!(queue.pop_due(Duration::from_millis(50)).is_none());
//! ```

use core::time::Duration;
use std::collections::{BTreeMap, HashMap};

/// Handle to a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Raw sequence number, stable for logging.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Deadline-ordered one-shot task queue.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    next_seq: u64,
    tasks: BTreeMap<(Duration, u64), T>,
    deadlines: HashMap<u64, Duration>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_seq: 0,
            tasks: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    /// Schedule `task` to become due at `deadline`.
    pub fn schedule(&mut self, deadline: Duration, task: T) -> TimerHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.tasks.insert((deadline, seq), task);
        self.deadlines.insert(seq, deadline);
        TimerHandle(seq)
    }

    /// Cancel a pending task, returning it if it had not fired yet.
    pub fn cancel(&mut self, handle: TimerHandle) -> Option<T> {
        let deadline = self.deadlines.remove(&handle.0)?;
        self.tasks.remove(&(deadline, handle.0))
    }

    /// Whether the task behind `handle` is still pending.
    #[must_use]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.deadlines.contains_key(&handle.0)
    }

    /// Deadline of the task behind `handle`, if still pending.
    #[must_use]
    pub fn deadline(&self, handle: TimerHandle) -> Option<Duration> {
        self.deadlines.get(&handle.0).copied()
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.tasks.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Pop the earliest task whose deadline is at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, TimerHandle, T)> {
        let (&(deadline, seq), _) = self.tasks.iter().next()?;
        if deadline > now {
            return None;
        }
        let task = self.tasks.remove(&(deadline, seq))?;
        self.deadlines.remove(&seq);
        Some((deadline, TimerHandle(seq), task))
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no task is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Drop every pending task.
    pub fn clear(&mut self) {
        self.tasks.clear();
        self.deadlines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn pops_in_deadline_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(ms(30), 3);
        queue.schedule(ms(10), 1);
        queue.schedule(ms(20), 2);

        let order: Vec<i32> = std::iter::from_fn(|| queue.pop_due(ms(100)).map(|(_, _, t)| t))
            .collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn equal_deadlines_keep_schedule_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(ms(10), "a");
        queue.schedule(ms(10), "b");
        assert_eq!(queue.pop_due(ms(10)).map(|(_, _, t)| t), Some("a"));
        assert_eq!(queue.pop_due(ms(10)).map(|(_, _, t)| t), Some("b"));
    }

    #[test]
    fn not_due_stays_pending() {
        let mut queue = TimerQueue::new();
        let handle = queue.schedule(ms(50), ());
        assert!(queue.pop_due(ms(49)).is_none());
        assert!(queue.is_pending(handle));
        assert_eq!(queue.deadline(handle), Some(ms(50)));
        assert!(queue.pop_due(ms(50)).is_some());
        assert!(!queue.is_pending(handle));
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut queue = TimerQueue::new();
        let handle = queue.schedule(ms(5), "x");
        assert_eq!(queue.cancel(handle), Some("x"));
        assert_eq!(queue.cancel(handle), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn handles_are_never_reused() {
        let mut queue = TimerQueue::new();
        let a = queue.schedule(ms(1), ());
        queue.cancel(a);
        let b = queue.schedule(ms(1), ());
        assert_ne!(a, b);
        assert!(b.raw() > a.raw());
    }

    #[test]
    fn next_deadline_tracks_earliest() {
        let mut queue = TimerQueue::new();
        assert_eq!(queue.next_deadline(), None);
        let early = queue.schedule(ms(5), ());
        queue.schedule(ms(9), ());
        assert_eq!(queue.next_deadline(), Some(ms(5)));
        queue.cancel(early);
        assert_eq!(queue.next_deadline(), Some(ms(9)));
        queue.clear();
        assert_eq!(queue.len(), 0);
    }
}
