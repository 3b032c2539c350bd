#![forbid(unsafe_code)]

//! Per-toast removal timers.
//!
//! Each toast owns at most one pending timer: either an auto-remove timer
//! (armed from its duration) or the eviction timer that ends its grace
//! period. `arm`, `arm_eviction`, and `cancel` are the only mutation points.
//!
//! # Invariants
//!
//! 1. At most one pending timer per id. Re-arming cancels the previous one
//!    first, so `n` re-arms produce exactly one eventual fire.
//! 2. A persistent duration never schedules anything.

use core::time::Duration;
use std::collections::HashMap;

use toastline_core::{TimerHandle, TimerQueue, ToastId};

use crate::config::REMOVE_GRACE;
use crate::record::ToastDuration;

/// What happens when a timer fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerTask {
    /// Request removal of a toast whose lifetime elapsed.
    AutoRemove(ToastId),
    /// Permanently evict a removed toast after its grace period.
    Evict(ToastId),
}

impl TimerTask {
    /// Toast the task belongs to.
    #[must_use]
    pub fn id(&self) -> &ToastId {
        match self {
            Self::AutoRemove(id) | Self::Evict(id) => id,
        }
    }

    /// Kind of the task.
    #[must_use]
    pub const fn kind(&self) -> TimerKind {
        match self {
            Self::AutoRemove(_) => TimerKind::AutoRemove,
            Self::Evict(_) => TimerKind::Evict,
        }
    }
}

/// Kind of a pending timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Auto-remove timer.
    AutoRemove,
    /// Grace-period eviction timer.
    Evict,
}

/// Pending-timer bookkeeping keyed by toast id.
#[derive(Debug, Default)]
pub struct TimerRegistry {
    queue: TimerQueue<TimerTask>,
    pending: HashMap<ToastId, (TimerHandle, TimerKind)>,
}

impl TimerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the auto-remove timer for `id`, replacing any pending timer.
    ///
    /// Persistent durations are a no-op and leave existing timers alone.
    pub fn arm(
        &mut self,
        id: &ToastId,
        duration: ToastDuration,
        now: Duration,
    ) -> Option<TimerHandle> {
        let lifetime = duration.lifetime()?;
        let deadline = now.saturating_add(lifetime);
        let handle = self.schedule(id, deadline, TimerTask::AutoRemove(id.clone()));
        tracing::trace!(toast = %id, ms = duration.as_millis(), "armed removal timer");
        Some(handle)
    }

    /// Replace any pending timer for `id` with the grace-period eviction.
    pub fn arm_eviction(&mut self, id: &ToastId, now: Duration) -> TimerHandle {
        let deadline = now.saturating_add(REMOVE_GRACE);
        self.schedule(id, deadline, TimerTask::Evict(id.clone()))
    }

    fn schedule(&mut self, id: &ToastId, deadline: Duration, task: TimerTask) -> TimerHandle {
        self.cancel(id);
        let kind = task.kind();
        let handle = self.queue.schedule(deadline, task);
        self.pending.insert(id.clone(), (handle, kind));
        handle
    }

    /// Cancel the pending timer for `id`. Returns `true` if one was pending.
    pub fn cancel(&mut self, id: &ToastId) -> bool {
        match self.pending.remove(id) {
            Some((handle, _)) => {
                self.queue.cancel(handle);
                tracing::trace!(toast = %id, "cancelled timer");
                true
            }
            None => false,
        }
    }

    /// Kind and deadline of the pending timer for `id`.
    #[must_use]
    pub fn pending(&self, id: &ToastId) -> Option<(TimerKind, Duration)> {
        let (handle, kind) = *self.pending.get(id)?;
        self.queue.deadline(handle).map(|deadline| (kind, deadline))
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.next_deadline()
    }

    /// Pop the earliest task due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, TimerTask)> {
        let (deadline, handle, task) = self.queue.pop_due(now)?;
        if self.pending.get(task.id()).map(|(h, _)| *h) == Some(handle) {
            self.pending.remove(task.id());
        }
        Some((deadline, task))
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no timer is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn id(raw: &str) -> ToastId {
        ToastId::new(raw)
    }

    fn drain(registry: &mut TimerRegistry, now: Duration) -> Vec<TimerTask> {
        std::iter::from_fn(|| registry.pop_due(now).map(|(_, t)| t)).collect()
    }

    #[test]
    fn arm_schedules_auto_remove() {
        let mut registry = TimerRegistry::new();
        registry.arm(&id("a"), ToastDuration::After(ms(4000)), ms(0));
        assert_eq!(
            registry.pending(&id("a")),
            Some((TimerKind::AutoRemove, ms(4000)))
        );
        assert!(drain(&mut registry, ms(3999)).is_empty());
        assert_eq!(
            drain(&mut registry, ms(4000)),
            vec![TimerTask::AutoRemove(id("a"))]
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn persistent_is_noop() {
        let mut registry = TimerRegistry::new();
        assert!(registry.arm(&id("a"), ToastDuration::Persistent, ms(0)).is_none());
        assert!(registry.is_empty());

        registry.arm(&id("a"), ToastDuration::After(ms(10)), ms(0));
        registry.arm(&id("a"), ToastDuration::Persistent, ms(0));
        assert_eq!(
            registry.pending(&id("a")),
            Some((TimerKind::AutoRemove, ms(10)))
        );
    }

    #[test]
    fn rearm_leaves_single_timer() {
        let mut registry = TimerRegistry::new();
        for t in 0..10 {
            registry.arm(&id("a"), ToastDuration::After(ms(100)), ms(t));
        }
        assert_eq!(registry.len(), 1);
        assert_eq!(drain(&mut registry, ms(1_000)).len(), 1);
    }

    #[test]
    fn eviction_replaces_removal_timer() {
        let mut registry = TimerRegistry::new();
        registry.arm(&id("a"), ToastDuration::After(ms(4000)), ms(0));
        registry.arm_eviction(&id("a"), ms(50));
        assert_eq!(registry.pending(&id("a")), Some((TimerKind::Evict, ms(250))));
        assert_eq!(
            drain(&mut registry, ms(10_000)),
            vec![TimerTask::Evict(id("a"))]
        );
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut registry = TimerRegistry::new();
        registry.arm(&id("a"), ToastDuration::After(ms(5)), ms(0));
        assert!(registry.cancel(&id("a")));
        assert!(!registry.cancel(&id("a")));
        assert!(!registry.cancel(&id("missing")));
        assert!(drain(&mut registry, ms(100)).is_empty());
    }

    #[test]
    fn timers_are_independent_per_id() {
        let mut registry = TimerRegistry::new();
        registry.arm(&id("a"), ToastDuration::After(ms(20)), ms(0));
        registry.arm(&id("b"), ToastDuration::After(ms(10)), ms(0));
        assert_eq!(
            drain(&mut registry, ms(20)),
            vec![TimerTask::AutoRemove(id("b")), TimerTask::AutoRemove(id("a"))]
        );
    }
}
