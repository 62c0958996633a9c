#![forbid(unsafe_code)]

//! Deterministic frame and timer scheduling.
//!
//! The view layer only ever waits for two things: the next animation frame
//! (so a CSS transition can start before a class flips, or layout settles
//! before focus moves) and a timeout (toast expiry, exit animations). Both
//! are modelled here as payloads of type `T` queued against a monotonic clock
//! that the host advances explicitly.
//!
//! # Invariants
//!
//! 1. Tasks fire in due-time order; ties fire in scheduling order.
//! 2. A frame task is due at the first frame boundary strictly after the
//!    time it was requested.
//! 3. [`Scheduler::pop_due`] advances the clock to the popped task's due
//!    time, so work scheduled while handling a task is measured from that
//!    moment, not from the end of the advance window.
//!
//! # Example
//!
//! ```
//! use lather_core::clock::Scheduler;
//! use web_time::Duration;
//!
//! let mut sched = Scheduler::new();
//! sched.set_timeout(Duration::from_millis(100), "late");
//! sched.request_animation_frame("soon");
//!
//! let until = Duration::from_millis(200);
//! assert_eq!(sched.pop_due(until), Some("soon"));
//! assert_eq!(sched.pop_due(until), Some("late"));
//! assert_eq!(sched.pop_due(until), None);
//! sched.settle(until);
//! assert_eq!(sched.now(), until);
//! ```

use web_time::Duration;

/// Interval between animation frames (~60 Hz).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Handle to a scheduled task, usable with [`Scheduler::cancel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Scheduled<T> {
    id: TimerId,
    due: Duration,
    task: T,
}

/// Queue of frame and timeout tasks against a host-driven clock.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    frame_interval: Duration,
    pending: Vec<Scheduled<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    /// Create a scheduler at time zero with the default frame interval.
    #[must_use]
    pub fn new() -> Self {
        Self::with_frame_interval(FRAME_INTERVAL)
    }

    /// Create a scheduler with a custom frame interval (clamped to >= 1ms).
    #[must_use]
    pub fn with_frame_interval(frame_interval: Duration) -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 1,
            frame_interval: frame_interval.max(Duration::from_millis(1)),
            pending: Vec::new(),
        }
    }

    /// Current monotonic time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Number of tasks not yet fired or cancelled.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Whether a task is still queued.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|s| s.id == id)
    }

    /// Queue `task` for the next frame boundary.
    pub fn request_animation_frame(&mut self, task: T) -> TimerId {
        let interval = self.frame_interval.as_nanos();
        let now = self.now.as_nanos();
        let next = (now / interval + 1) * interval;
        let due = Duration::from_nanos(u64::try_from(next).unwrap_or(u64::MAX));
        self.insert(due, task)
    }

    /// Queue `task` to fire `delay` from now.
    pub fn set_timeout(&mut self, delay: Duration, task: T) -> TimerId {
        let due = self.now.saturating_add(delay);
        self.insert(due, task)
    }

    fn insert(&mut self, due: Duration, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        // Keep sorted by (due, id); ids are monotonic so appends are common.
        let at = self
            .pending
            .iter()
            .position(|s| s.due > due)
            .unwrap_or(self.pending.len());
        self.pending.insert(at, Scheduled { id, due, task });
        id
    }

    /// Cancel a queued task. Returns the task if it had not fired yet.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let idx = self.pending.iter().position(|s| s.id == id)?;
        Some(self.pending.remove(idx).task)
    }

    /// Pop the earliest task due at or before `until`, moving the clock to
    /// its due time.
    pub fn pop_due(&mut self, until: Duration) -> Option<T> {
        let first = self.pending.first()?;
        if first.due > until {
            return None;
        }
        let scheduled = self.pending.remove(0);
        self.now = self.now.max(scheduled.due);
        Some(scheduled.task)
    }

    /// Move the clock forward to `until` (never backwards). Call after
    /// draining [`pop_due`](Self::pop_due).
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    /// Due time of the earliest queued task.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.first().map(|s| s.due)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn frame_is_due_at_next_boundary() {
        let mut s = Scheduler::new();
        s.settle(ms(20));
        s.request_animation_frame(1);
        assert_eq!(s.next_due(), Some(ms(32)));
    }

    #[test]
    fn frame_at_exact_boundary_waits_a_full_frame() {
        let mut s = Scheduler::new();
        s.settle(ms(16));
        s.request_animation_frame(1);
        assert_eq!(s.next_due(), Some(ms(32)));
    }

    #[test]
    fn ties_fire_in_scheduling_order() {
        let mut s = Scheduler::new();
        s.set_timeout(ms(10), "a");
        s.set_timeout(ms(10), "b");
        s.set_timeout(ms(5), "c");
        let until = ms(10);
        assert_eq!(s.pop_due(until), Some("c"));
        assert_eq!(s.pop_due(until), Some("a"));
        assert_eq!(s.pop_due(until), Some("b"));
    }

    #[test]
    fn pop_due_moves_clock_to_task_time() {
        let mut s = Scheduler::new();
        s.set_timeout(ms(100), ());
        assert_eq!(s.pop_due(ms(500)), Some(()));
        assert_eq!(s.now(), ms(100));
        s.set_timeout(ms(100), ());
        assert_eq!(s.next_due(), Some(ms(200)));
    }

    #[test]
    fn cancel_removes_task() {
        let mut s = Scheduler::new();
        let id = s.set_timeout(ms(10), 7);
        assert!(s.is_pending(id));
        assert_eq!(s.cancel(id), Some(7));
        assert!(!s.is_pending(id));
        assert_eq!(s.cancel(id), None);
        assert_eq!(s.pop_due(ms(100)), None);
    }

    #[test]
    fn settle_never_rewinds() {
        let mut s: Scheduler<()> = Scheduler::new();
        s.settle(ms(50));
        s.settle(ms(10));
        assert_eq!(s.now(), ms(50));
    }

    proptest! {
        #[test]
        fn tasks_pop_in_nondecreasing_due_order(delays in proptest::collection::vec(0u64..1000, 0..40)) {
            let mut s = Scheduler::new();
            for (i, d) in delays.iter().enumerate() {
                s.set_timeout(ms(*d), i);
            }
            let mut last = Duration::ZERO;
            let mut seen = 0;
            while let Some(i) = s.pop_due(ms(1000)) {
                let due = ms(delays[i]);
                prop_assert!(due >= last);
                last = due;
                seen += 1;
            }
            prop_assert_eq!(seen, delays.len());
        }
    }
}
