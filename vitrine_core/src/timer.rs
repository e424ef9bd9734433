// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timer capability shared by every time-driven component.
//!
//! Components never call `setTimeout` themselves. Operations that need a
//! deferred continuation take a [`TimerHost`], ask it to
//! [`schedule`](TimerHost::schedule) a [`Timeout`], and keep the returned
//! [`TimerId`] if they may need to [`cancel`](TimerHost::cancel) it. When the
//! timer elapses, the host's dispatcher routes the [`Timeout`] back to the
//! owning component.
//!
//! [`ManualTimers`] is a deterministic virtual clock implementing the trait,
//! used by tests and by anything that wants to drive the site headlessly.

use alloc::vec::Vec;

use crate::notify::NoticeId;
use crate::time::{Duration, HostTime};

/// Opaque handle for a scheduled timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

/// What a scheduled timer is for.
///
/// The dispatcher matches on this to decide which component receives the
/// continuation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Timeout {
    /// Trailing run of the throttled scroll handler.
    ScrollTrailing,
    /// Quiescence reached for the debounced resize handler.
    ResizeSettled,
    /// Carousel autoplay advance.
    CarouselAdvance,
    /// Simulated submission latency elapsed.
    SubmissionSettled,
    /// Slide a notice into view.
    NoticeShow(NoticeId),
    /// Begin hiding a notice.
    NoticeDismiss(NoticeId),
    /// Remove a hidden notice from the page.
    NoticeRemove(NoticeId),
    /// Next typing-animation keystroke.
    TypingStep,
    /// Loading screen may be hidden.
    LoadingDone,
    /// Start the entrance animation of the hero element at this index.
    EntranceStep(usize),
    /// Fill the skill bar at this index.
    SkillBarFill(usize),
    /// Caller-defined purpose, for wrappers used outside the site.
    Custom(u32),
}

/// Schedules and cancels one-shot timers.
///
/// Implemented by the browser backend on top of `setTimeout` and by
/// [`ManualTimers`] for tests.
pub trait TimerHost {
    /// Current time.
    fn now(&self) -> HostTime;

    /// Schedules `purpose` to be delivered after `delay`.
    fn schedule(&mut self, delay: Duration, purpose: Timeout) -> TimerId;

    /// Cancels a pending timer. Cancelling an elapsed or unknown timer is a
    /// no-op.
    fn cancel(&mut self, id: TimerId);
}

#[derive(Clone, Copy, Debug)]
struct Pending {
    due: HostTime,
    id: TimerId,
    purpose: Timeout,
}

/// Deterministic virtual clock.
///
/// Time only moves when the caller says so. Timers fire in deadline order;
/// timers sharing a deadline fire in scheduling order.
#[derive(Debug, Default)]
pub struct ManualTimers {
    now: HostTime,
    next_id: u64,
    pending: Vec<Pending>,
}

impl ManualTimers {
    /// Creates a clock at [`HostTime::ZERO`] with nothing scheduled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock starting at `now`.
    #[must_use]
    pub fn starting_at(now: HostTime) -> Self {
        Self {
            now,
            ..Self::default()
        }
    }

    /// Moves the clock to `t` without firing anything.
    ///
    /// Going backwards is ignored.
    pub fn set_now(&mut self, t: HostTime) {
        self.now = self.now.max(t);
    }

    /// Number of timers still pending.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Returns how many pending timers carry `purpose`.
    #[must_use]
    pub fn count(&self, purpose: Timeout) -> usize {
        self.pending.iter().filter(|p| p.purpose == purpose).count()
    }

    /// Returns the deadline of the earliest pending timer carrying `purpose`.
    #[must_use]
    pub fn deadline_of(&self, purpose: Timeout) -> Option<HostTime> {
        self.pending
            .iter()
            .filter(|p| p.purpose == purpose)
            .map(|p| p.due)
            .min()
    }

    /// Removes and returns the earliest timer due at or before `until`,
    /// moving the clock to its deadline.
    ///
    /// Intended for dispatch loops where handlers may schedule further
    /// timers inside the window:
    ///
    /// ```rust,ignore
    /// while let Some(t) = timers.next_due(until) {
    ///     site.on_timeout(&mut timers, t);
    /// }
    /// timers.set_now(until);
    /// ```
    pub fn next_due(&mut self, until: HostTime) -> Option<Timeout> {
        let (pos, _) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= until)
            .min_by_key(|(_, p)| (p.due, p.id))?;
        let fired = self.pending.remove(pos);
        self.now = self.now.max(fired.due);
        Some(fired.purpose)
    }

    /// Advances the clock by `by` and returns every timer that came due, in
    /// firing order.
    ///
    /// Timers scheduled by the caller while handling the returned list are
    /// not included; use [`next_due`](Self::next_due) for that.
    pub fn advance(&mut self, by: Duration) -> Vec<Timeout> {
        let until = self.now.saturating_add(by);
        let mut fired = Vec::new();
        while let Some(t) = self.next_due(until) {
            fired.push(t);
        }
        self.now = until;
        fired
    }
}

impl TimerHost for ManualTimers {
    fn now(&self) -> HostTime {
        self.now
    }

    fn schedule(&mut self, delay: Duration, purpose: Timeout) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            due: self.now.saturating_add(delay),
            id,
            purpose,
        });
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.pending.retain(|p| p.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_deadline_then_schedule_order() {
        let mut timers = ManualTimers::new();
        timers.schedule(Duration(50), Timeout::Custom(1));
        timers.schedule(Duration(10), Timeout::Custom(2));
        timers.schedule(Duration(50), Timeout::Custom(3));

        let fired = timers.advance(Duration(100));
        assert_eq!(
            fired,
            [Timeout::Custom(2), Timeout::Custom(1), Timeout::Custom(3)],
            "deadline order, ties broken by scheduling order"
        );
        assert_eq!(timers.now(), HostTime(100));
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let mut timers = ManualTimers::new();
        let a = timers.schedule(Duration(10), Timeout::Custom(1));
        timers.schedule(Duration(20), Timeout::Custom(2));
        timers.cancel(a);
        timers.cancel(TimerId(999));

        assert_eq!(timers.advance(Duration(30)), [Timeout::Custom(2)]);
    }

    #[test]
    fn next_due_moves_clock_to_deadline() {
        let mut timers = ManualTimers::starting_at(HostTime(1000));
        timers.schedule(Duration(250), Timeout::ResizeSettled);

        assert_eq!(timers.next_due(HostTime(1100)), None, "not yet due");
        assert_eq!(
            timers.next_due(HostTime(2000)),
            Some(Timeout::ResizeSettled)
        );
        assert_eq!(timers.now(), HostTime(1250));
    }

    #[test]
    fn set_now_never_goes_backwards() {
        let mut timers = ManualTimers::starting_at(HostTime(500));
        timers.set_now(HostTime(100));
        assert_eq!(timers.now(), HostTime(500));
    }
}
