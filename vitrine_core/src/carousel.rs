// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Testimonial carousel.
//!
//! [`Carousel`] owns a rotating index over a fixed number of slides. The
//! index moves by [`next`](Carousel::next), [`prev`](Carousel::prev),
//! [`goto`](Carousel::goto), an arrow key, or the autoplay timer. Every
//! transition returns a [`SlideChange`] naming the slide to deactivate and
//! the one to activate, so a presenter can flip both in one pass.
//!
//! Autoplay fires every `autoplay_interval` while the pointer is outside the
//! carousel. Entering cancels the pending advance; leaving starts a fresh
//! interval from zero. Manual navigation does not touch the autoplay timer.

use crate::time::Duration;
use crate::timer::{TimerHost, TimerId, Timeout};

/// Where arrow keys are honoured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum KeyboardScope {
    /// Anywhere on the page.
    #[default]
    Global,
    /// Only while focus is inside the carousel.
    CarouselFocus,
}

/// Carousel behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CarouselConfig {
    /// Autoplay period.
    pub autoplay_interval: Duration,
    /// Arrow-key scope.
    pub keyboard_scope: KeyboardScope,
}

impl CarouselConfig {
    /// 5 s autoplay, global arrow keys.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            autoplay_interval: Duration(5000),
            keyboard_scope: KeyboardScope::Global,
        }
    }
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A key press relevant to the carousel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrowKey {
    /// `ArrowLeft`.
    Left,
    /// `ArrowRight`.
    Right,
}

impl ArrowKey {
    /// Maps a `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Self::Left),
            "ArrowRight" => Some(Self::Right),
            _ => None,
        }
    }
}

/// Active-slide transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlideChange {
    /// Slide (and indicator) to deactivate.
    pub from: usize,
    /// Slide (and indicator) to activate.
    pub to: usize,
}

/// Bounded rotating index plus autoplay state.
#[derive(Clone, Debug)]
pub struct Carousel {
    config: CarouselConfig,
    len: usize,
    current: usize,
    hovering: bool,
    autoplay: Option<TimerId>,
}

impl Carousel {
    /// Creates a carousel over `len` slides with slide 0 active.
    #[must_use]
    pub fn new(config: CarouselConfig, len: usize) -> Self {
        Self {
            config,
            len,
            current: 0,
            hovering: false,
            autoplay: None,
        }
    }

    /// Number of slides.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` for a carousel with no slides.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The active slide.
    #[must_use]
    pub const fn current(&self) -> usize {
        self.current
    }

    /// Whether slide `i` is the active one.
    #[must_use]
    pub const fn is_active(&self, i: usize) -> bool {
        self.len > 0 && i == self.current
    }

    /// Whether an autoplay advance is scheduled.
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.autoplay.is_some()
    }

    /// The keyboard scope in effect.
    #[must_use]
    pub const fn keyboard_scope(&self) -> KeyboardScope {
        self.config.keyboard_scope
    }

    /// Moves to `(current + 1) mod len`.
    pub fn next(&mut self) -> Option<SlideChange> {
        if self.len == 0 {
            return None;
        }
        self.show((self.current + 1) % self.len)
    }

    /// Moves to `(current - 1 + len) mod len`.
    pub fn prev(&mut self) -> Option<SlideChange> {
        if self.len == 0 {
            return None;
        }
        self.show((self.current + self.len - 1) % self.len)
    }

    /// Moves to slide `i`. Out-of-range indices are a no-op.
    pub fn goto(&mut self, i: usize) -> Option<SlideChange> {
        if i >= self.len {
            return None;
        }
        self.show(i)
    }

    /// Handles an arrow key. `focus_inside` says whether the focused element
    /// is inside the carousel; it only matters for
    /// [`KeyboardScope::CarouselFocus`].
    pub fn on_key(&mut self, key: ArrowKey, focus_inside: bool) -> Option<SlideChange> {
        if self.config.keyboard_scope == KeyboardScope::CarouselFocus && !focus_inside {
            return None;
        }
        match key {
            ArrowKey::Left => self.prev(),
            ArrowKey::Right => self.next(),
        }
    }

    /// Starts autoplay. Does nothing while hovering, for a single slide, or
    /// when already playing.
    pub fn start_autoplay<H: TimerHost + ?Sized>(&mut self, timers: &mut H) {
        if self.hovering || self.len < 2 || self.autoplay.is_some() {
            return;
        }
        self.autoplay = Some(timers.schedule(self.config.autoplay_interval, Timeout::CarouselAdvance));
    }

    /// Pointer entered the carousel: cancel the pending advance.
    pub fn hover_enter<H: TimerHost + ?Sized>(&mut self, timers: &mut H) {
        self.hovering = true;
        if let Some(id) = self.autoplay.take() {
            timers.cancel(id);
        }
    }

    /// Pointer left the carousel: restart autoplay from zero.
    pub fn hover_leave<H: TimerHost + ?Sized>(&mut self, timers: &mut H) {
        self.hovering = false;
        self.start_autoplay(timers);
    }

    /// Handles [`Timeout::CarouselAdvance`]: advances and schedules the next
    /// advance. Stale deliveries return `None`.
    pub fn on_timeout<H: TimerHost + ?Sized>(&mut self, timers: &mut H) -> Option<SlideChange> {
        self.autoplay.take()?;
        let change = self.next();
        self.start_autoplay(timers);
        change
    }

    fn show(&mut self, to: usize) -> Option<SlideChange> {
        let from = self.current;
        self.current = to;
        tracing::debug!(from, to, "slide change");
        Some(SlideChange { from, to })
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use proptest::prelude::*;

    use super::*;
    use crate::time::HostTime;
    use crate::timer::ManualTimers;

    #[test]
    fn wraps_in_both_directions() {
        let mut c = Carousel::new(CarouselConfig::new(), 3);
        assert_eq!(c.prev(), Some(SlideChange { from: 0, to: 2 }));
        assert_eq!(c.next(), Some(SlideChange { from: 2, to: 0 }));
        assert_eq!(c.goto(5), None, "out of range");
        assert_eq!(c.current(), 0);
        assert_eq!(c.goto(1), Some(SlideChange { from: 0, to: 1 }));
    }

    #[test]
    fn empty_carousel_never_moves() {
        let mut c = Carousel::new(CarouselConfig::new(), 0);
        let mut timers = ManualTimers::new();
        assert_eq!(c.next(), None);
        assert_eq!(c.prev(), None);
        c.start_autoplay(&mut timers);
        assert!(!c.is_playing());
        assert!(!c.is_active(0));
    }

    #[test]
    fn autoplay_advances_every_interval() {
        let mut c = Carousel::new(CarouselConfig::new(), 3);
        let mut timers = ManualTimers::new();
        c.start_autoplay(&mut timers);
        let mut seen = Vec::new();
        while let Some(t) = timers.next_due(HostTime(15_000)) {
            assert_eq!(t, Timeout::CarouselAdvance);
            seen.push((timers.now(), c.on_timeout(&mut timers).map(|s| s.to)));
        }
        assert_eq!(
            seen,
            [
                (HostTime(5000), Some(1)),
                (HostTime(10_000), Some(2)),
                (HostTime(15_000), Some(0)),
            ]
        );
    }

    #[test]
    fn hover_leave_restarts_from_zero() {
        let mut c = Carousel::new(CarouselConfig::new(), 3);
        let mut timers = ManualTimers::new();
        c.start_autoplay(&mut timers);
        timers.set_now(HostTime(4000));
        c.hover_enter(&mut timers);
        assert_eq!(timers.pending_len(), 0);
        assert!(!c.is_playing());

        // Re-arming while hovering is refused.
        c.start_autoplay(&mut timers);
        assert!(!c.is_playing());

        timers.set_now(HostTime(4500));
        c.hover_leave(&mut timers);
        assert_eq!(
            timers.deadline_of(Timeout::CarouselAdvance),
            Some(HostTime(9500)),
            "full interval after leaving, not the 1000ms left before entering"
        );
    }

    #[test]
    fn keyboard_scope_gates_arrows() {
        let mut global = Carousel::new(CarouselConfig::new(), 2);
        assert!(global.on_key(ArrowKey::Right, false).is_some());

        let mut focused = Carousel::new(
            CarouselConfig {
                keyboard_scope: KeyboardScope::CarouselFocus,
                ..CarouselConfig::new()
            },
            2,
        );
        assert_eq!(focused.on_key(ArrowKey::Right, false), None);
        assert_eq!(
            focused.on_key(ArrowKey::Left, true),
            Some(SlideChange { from: 0, to: 1 })
        );
        assert_eq!(ArrowKey::from_key("ArrowUp"), None);
    }

    #[test]
    fn stale_advance_is_ignored() {
        let mut c = Carousel::new(CarouselConfig::new(), 3);
        let mut timers = ManualTimers::new();
        assert_eq!(c.on_timeout(&mut timers), None);
        assert_eq!(c.current(), 0);
    }

    #[derive(Clone, Copy, Debug)]
    enum Op {
        Next,
        Prev,
        Goto(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Next),
            Just(Op::Prev),
            (0_usize..12).prop_map(Op::Goto),
        ]
    }

    proptest! {
        #[test]
        fn index_stays_in_bounds_and_next_prev_round_trips(len in 1_usize..8, ops in proptest::collection::vec(op(), 0..50)) {
            let mut c = Carousel::new(CarouselConfig::new(), len);
            for op in ops {
                let _ = match op {
                    Op::Next => c.next(),
                    Op::Prev => c.prev(),
                    Op::Goto(i) => c.goto(i),
                };
                prop_assert!(c.current() < len);
                prop_assert_eq!((0..len).filter(|&i| c.is_active(i)).count(), 1);
            }
            let before = c.current();
            c.next();
            c.prev();
            prop_assert_eq!(c.current(), before);
            c.prev();
            c.next();
            prop_assert_eq!(c.current(), before);
        }
    }
}
