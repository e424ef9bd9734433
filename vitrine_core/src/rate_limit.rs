// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Throttle and debounce.
//!
//! Each limiter comes in two layers:
//!
//! - A *gate* ([`Throttle`], [`Debounce`]) that only decides whether the
//!   caller should run its handler now, and owns the trailing timer. The site
//!   coordinator uses gates because its handlers need `&mut self` access to
//!   the rest of the page state.
//! - A *wrapper* ([`Throttled`], [`Debounced`]) built with [`throttle`] /
//!   [`debounce`], owning the handler closure.
//!
//! Every instance carries its own state; nothing is shared between wrapped
//! handlers.

use crate::time::{Duration, HostTime};
use crate::timer::{TimerHost, TimerId, Timeout};

/// Decision returned by [`Throttle::call`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gate {
    /// Run the handler now.
    Run,
    /// A trailing run has been scheduled at the interval boundary.
    Deferred,
}

/// Rate-limiting gate: at most one run per interval, with one trailing run.
///
/// A call arriving inside the interval schedules a single trailing run at
/// the interval boundary, replacing any trailing run already scheduled.
#[derive(Clone, Debug)]
pub struct Throttle {
    interval: Duration,
    last_run: Option<HostTime>,
    trailing: Option<TimerId>,
}

impl Throttle {
    /// Creates a gate with the given interval.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_run: None,
            trailing: None,
        }
    }

    /// The configured interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns `true` while a trailing run is scheduled.
    #[must_use]
    pub const fn has_trailing(&self) -> bool {
        self.trailing.is_some()
    }

    /// Registers a call. `purpose` is what the trailing timer delivers.
    pub fn call<H: TimerHost + ?Sized>(&mut self, timers: &mut H, purpose: Timeout) -> Gate {
        let now = timers.now();
        if let Some(id) = self.trailing.take() {
            timers.cancel(id);
        }
        match self.last_run {
            Some(last) if now.saturating_duration_since(last) < self.interval => {
                let wait = self.interval - now.saturating_duration_since(last);
                self.trailing = Some(timers.schedule(wait, purpose));
                Gate::Deferred
            }
            _ => {
                self.last_run = Some(now);
                Gate::Run
            }
        }
    }

    /// Handles the trailing timer. Returns `true` if the handler should run.
    ///
    /// Stale deliveries (the trailing run was superseded and its timer could
    /// not be cancelled in time) return `false`.
    pub fn on_timeout(&mut self, now: HostTime) -> bool {
        if self.trailing.take().is_some() {
            self.last_run = Some(now);
            true
        } else {
            false
        }
    }
}

/// Quiescence gate: runs only after `delay` has passed with no further calls.
#[derive(Clone, Debug)]
pub struct Debounce {
    delay: Duration,
    pending: Option<TimerId>,
}

impl Debounce {
    /// Creates a gate with the given quiet period.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// The configured quiet period.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns `true` while a run is scheduled.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Registers a call, cancelling and restarting the pending timer.
    pub fn call<H: TimerHost + ?Sized>(&mut self, timers: &mut H, purpose: Timeout) {
        if let Some(id) = self.pending.take() {
            timers.cancel(id);
        }
        self.pending = Some(timers.schedule(self.delay, purpose));
    }

    /// Handles the timer. Returns `true` if the handler should run.
    pub fn on_timeout(&mut self) -> bool {
        self.pending.take().is_some()
    }
}

/// A handler wrapped by [`throttle`].
pub struct Throttled<F> {
    gate: Throttle,
    purpose: Timeout,
    handler: F,
}

impl<F> core::fmt::Debug for Throttled<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Throttled")
            .field("gate", &self.gate)
            .field("purpose", &self.purpose)
            .finish_non_exhaustive()
    }
}

impl<F: FnMut()> Throttled<F> {
    /// Invokes the wrapper.
    pub fn call<H: TimerHost + ?Sized>(&mut self, timers: &mut H) {
        if self.gate.call(timers, self.purpose) == Gate::Run {
            (self.handler)();
        }
    }

    /// Delivers the trailing timer.
    pub fn fire(&mut self, now: HostTime) {
        if self.gate.on_timeout(now) {
            (self.handler)();
        }
    }

    /// The timer purpose this wrapper schedules.
    #[must_use]
    pub const fn purpose(&self) -> Timeout {
        self.purpose
    }
}

/// A handler wrapped by [`debounce`].
pub struct Debounced<F> {
    gate: Debounce,
    purpose: Timeout,
    handler: F,
}

impl<F> core::fmt::Debug for Debounced<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Debounced")
            .field("gate", &self.gate)
            .field("purpose", &self.purpose)
            .finish_non_exhaustive()
    }
}

impl<F: FnMut()> Debounced<F> {
    /// Invokes the wrapper.
    pub fn call<H: TimerHost + ?Sized>(&mut self, timers: &mut H) {
        self.gate.call(timers, self.purpose);
    }

    /// Delivers the quiescence timer.
    pub fn fire(&mut self) {
        if self.gate.on_timeout() {
            (self.handler)();
        }
    }

    /// The timer purpose this wrapper schedules.
    #[must_use]
    pub const fn purpose(&self) -> Timeout {
        self.purpose
    }
}

/// Wraps `handler` so it runs at most once per `interval`.
#[must_use]
pub fn throttle<F: FnMut()>(handler: F, interval: Duration, purpose: Timeout) -> Throttled<F> {
    Throttled {
        gate: Throttle::new(interval),
        purpose,
        handler,
    }
}

/// Wraps `handler` so it runs once calls have stopped for `delay`.
#[must_use]
pub fn debounce<F: FnMut()>(handler: F, delay: Duration, purpose: Timeout) -> Debounced<F> {
    Debounced {
        gate: Debounce::new(delay),
        purpose,
        handler,
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::{Cell, RefCell};

    use proptest::prelude::*;

    use super::*;
    use crate::timer::ManualTimers;

    const KEY: Timeout = Timeout::Custom(7);

    #[test]
    fn debounce_collapses_a_burst_into_one_run() {
        let runs = Rc::new(RefCell::new(Vec::new()));
        let mut timers = ManualTimers::new();
        let log = Rc::clone(&runs);
        let clock = Rc::new(Cell::new(HostTime::ZERO));
        let seen = Rc::clone(&clock);
        let mut wrapped = debounce(move || log.borrow_mut().push(seen.get()), Duration(250), KEY);

        for i in 0..10 {
            timers.set_now(HostTime(i * 20));
            wrapped.call(&mut timers);
        }
        assert_eq!(timers.count(KEY), 1, "only the latest timer survives");

        while let Some(t) = timers.next_due(HostTime(10_000)) {
            assert_eq!(t, KEY);
            clock.set(timers.now());
            wrapped.fire();
        }
        assert_eq!(*runs.borrow(), [HostTime(180 + 250)], "one run, delay after the last call");
    }

    #[test]
    fn throttle_runs_first_call_immediately() {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let mut timers = ManualTimers::starting_at(HostTime(5));
        let mut wrapped = throttle(move || c.set(c.get() + 1), Duration(16), KEY);

        wrapped.call(&mut timers);
        assert_eq!(count.get(), 1);
        assert_eq!(timers.pending_len(), 0);
    }

    #[test]
    fn throttle_schedules_single_trailing_run_at_boundary() {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let mut timers = ManualTimers::new();
        let mut wrapped = throttle(move || c.set(c.get() + 1), Duration(16), KEY);

        wrapped.call(&mut timers);
        timers.set_now(HostTime(4));
        wrapped.call(&mut timers);
        timers.set_now(HostTime(9));
        wrapped.call(&mut timers);

        assert_eq!(count.get(), 1);
        assert_eq!(timers.count(KEY), 1, "trailing runs are superseded, not queued");
        assert_eq!(timers.deadline_of(KEY), Some(HostTime(16)));

        let now = HostTime(16);
        assert_eq!(timers.next_due(now), Some(KEY));
        wrapped.fire(now);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn stale_trailing_delivery_is_ignored() {
        let mut gate = Throttle::new(Duration(16));
        assert!(!gate.on_timeout(HostTime(100)));
        let mut debounce = Debounce::new(Duration(16));
        assert!(!debounce.on_timeout());
    }

    proptest! {
        #[test]
        fn throttle_spacing_and_no_lost_trailing(gaps in proptest::collection::vec(0_u64..40, 1..60)) {
            let mut gate = Throttle::new(Duration(16));
            let mut timers = ManualTimers::new();
            let mut runs: Vec<HostTime> = Vec::new();
            let mut t = 0_u64;
            let mut last_call = HostTime::ZERO;

            for gap in gaps {
                t += gap;
                while let Some(fired) = timers.next_due(HostTime(t)) {
                    prop_assert_eq!(fired, KEY);
                    if gate.on_timeout(timers.now()) {
                        runs.push(timers.now());
                    }
                }
                timers.set_now(HostTime(t));
                last_call = HostTime(t);
                if gate.call(&mut timers, KEY) == Gate::Run {
                    runs.push(HostTime(t));
                }
            }
            while let Some(_fired) = timers.next_due(HostTime(u64::MAX)) {
                if gate.on_timeout(timers.now()) {
                    runs.push(timers.now());
                }
            }

            for pair in runs.windows(2) {
                prop_assert!(pair[1].saturating_duration_since(pair[0]) >= Duration(16), "runs too close: {:?}", pair);
            }
            let last_run = *runs.last().expect("at least the first call runs");
            prop_assert!(last_run >= last_call, "the final call must be honoured");
        }

        #[test]
        fn debounce_runs_once_per_quiet_period(gaps in proptest::collection::vec(0_u64..600, 1..40)) {
            let delay = Duration(250);
            let mut gate = Debounce::new(delay);
            let mut timers = ManualTimers::new();
            let mut runs: Vec<HostTime> = Vec::new();
            let mut expected: Vec<HostTime> = Vec::new();
            let mut t = 0_u64;
            let mut last_call: Option<u64> = None;

            for gap in gaps {
                t += gap;
                if let Some(last) = last_call {
                    if t > last + delay.0 {
                        expected.push(HostTime(last + delay.0));
                    }
                }
                while let Some(fired) = timers.next_due(HostTime(t.saturating_sub(1))) {
                    prop_assert_eq!(fired, KEY);
                    if gate.on_timeout() {
                        runs.push(timers.now());
                    }
                }
                timers.set_now(HostTime(t));
                gate.call(&mut timers, KEY);
                prop_assert_eq!(timers.count(KEY), 1, "one pending run at most");
                last_call = Some(t);
            }
            while let Some(_fired) = timers.next_due(HostTime(u64::MAX)) {
                if gate.on_timeout() {
                    runs.push(timers.now());
                }
            }
            if let Some(last) = last_call {
                expected.push(HostTime(last + delay.0));
            }

            prop_assert_eq!(runs, expected);
            prop_assert!(!gate.is_pending());
        }
    }
}
