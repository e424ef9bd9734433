// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-shot animations started by the viewport observer.
//!
//! - [`CounterAnimation`] counts a displayed integer up to its target, one
//!   step per animation frame.
//! - [`SkillBars`] fill progress bars to their target width after a short
//!   delay.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::time::Duration;
use crate::timer::{TimerHost, Timeout};

/// Timing for counter animations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CounterConfig {
    /// Nominal length of the count-up.
    pub duration: Duration,
    /// Nominal frame interval used to derive the per-frame increment.
    pub frame_interval: Duration,
}

impl CounterConfig {
    /// 2 s at ~60 fps.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            duration: Duration(2000),
            frame_interval: Duration(16),
        }
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts a displayed value from 0 up to `target`.
///
/// Each frame adds `target / (duration / frame_interval)` to an exact
/// fractional accumulator and displays its floor. The frame that would reach
/// or pass the target displays the target itself, so rounding never drifts
/// and the displayed value is non-decreasing and bounded by the target.
#[derive(Clone, Debug)]
pub struct CounterAnimation {
    target: u64,
    increment: f64,
    current: f64,
    displayed: u64,
    finished: bool,
}

impl CounterAnimation {
    /// Creates an animation toward `target`.
    #[must_use]
    pub fn new(target: u64, config: &CounterConfig) -> Self {
        let frames = if config.frame_interval.is_zero() {
            1.0
        } else {
            (config.duration.millis() as f64 / config.frame_interval.millis() as f64).max(1.0)
        };
        Self {
            target,
            increment: target as f64 / frames,
            current: 0.0,
            displayed: 0,
            finished: false,
        }
    }

    /// The value the counter ends on.
    #[must_use]
    pub const fn target(&self) -> u64 {
        self.target
    }

    /// The value currently displayed.
    #[must_use]
    pub const fn displayed(&self) -> u64 {
        self.displayed
    }

    /// Returns `true` once the target has been displayed.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advances one frame and returns the value to display.
    ///
    /// After finishing, keeps returning the target.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "accumulator is non-negative and below target, which fits in u64"
    )]
    pub fn step(&mut self) -> u64 {
        if self.finished {
            return self.target;
        }
        self.current += self.increment;
        if self.current < self.target as f64 {
            self.displayed = (self.current.floor() as u64).min(self.target);
        } else {
            self.displayed = self.target;
            self.finished = true;
        }
        self.displayed
    }
}

/// The set of counters on a page, indexed like their elements.
#[derive(Clone, Debug)]
pub struct CounterBank {
    config: CounterConfig,
    running: Vec<Option<CounterAnimation>>,
}

impl CounterBank {
    /// Creates a bank for `count` counter elements, none running.
    #[must_use]
    pub fn new(config: CounterConfig, count: usize) -> Self {
        Self {
            config,
            running: alloc::vec![None; count],
        }
    }

    /// Starts counter `i` toward `target`. Out-of-range indices are ignored.
    pub fn start(&mut self, i: usize, target: u64) {
        if let Some(slot) = self.running.get_mut(i) {
            *slot = Some(CounterAnimation::new(target, &self.config));
        }
    }

    /// Returns `true` while any counter still needs frames.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.iter().flatten().any(|c| !c.is_finished())
    }

    /// Advances every unfinished counter by one frame and returns
    /// `(index, displayed value)` for each.
    pub fn frame(&mut self) -> Vec<(usize, u64)> {
        self.running
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| {
                let anim = slot.as_mut()?;
                if anim.is_finished() {
                    return None;
                }
                Some((i, anim.step()))
            })
            .collect()
    }
}

/// Delayed width fills for skill bars.
#[derive(Clone, Debug)]
pub struct SkillBars {
    delay: Duration,
    widths: Vec<f64>,
    scheduled: Vec<bool>,
}

impl SkillBars {
    /// Creates a set of bars with target widths in percent. Widths are
    /// clamped to `[0, 100]`; non-finite widths become 0.
    #[must_use]
    pub fn new(delay: Duration, widths: impl IntoIterator<Item = f64>) -> Self {
        let widths: Vec<f64> = widths
            .into_iter()
            .map(|w| if w.is_finite() { w.clamp(0.0, 100.0) } else { 0.0 })
            .collect();
        let scheduled = alloc::vec![false; widths.len()];
        Self {
            delay,
            widths,
            scheduled,
        }
    }

    /// Bar `i` became visible: schedule its fill once.
    pub fn on_visible<H: TimerHost + ?Sized>(&mut self, timers: &mut H, i: usize) {
        let Some(done) = self.scheduled.get_mut(i) else {
            return;
        };
        if !*done {
            *done = true;
            timers.schedule(self.delay, Timeout::SkillBarFill(i));
        }
    }

    /// The fill timer for bar `i` elapsed: returns its width in percent.
    #[must_use]
    pub fn fill(&self, i: usize) -> Option<f64> {
        self.widths.get(i).copied()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::time::HostTime;
    use crate::timer::ManualTimers;

    #[test]
    fn counter_takes_about_duration_over_frame_interval_frames() {
        let mut anim = CounterAnimation::new(250, &CounterConfig::new());
        let mut frames = 0;
        while !anim.is_finished() {
            anim.step();
            frames += 1;
        }
        assert_eq!(anim.displayed(), 250);
        assert_eq!(frames, 125, "2000ms / 16ms frames");
    }

    #[test]
    fn zero_target_finishes_on_first_frame() {
        let mut anim = CounterAnimation::new(0, &CounterConfig::new());
        assert_eq!(anim.step(), 0);
        assert!(anim.is_finished());
    }

    #[test]
    fn bank_reports_only_running_counters() {
        let mut bank = CounterBank::new(CounterConfig::new(), 3);
        assert!(!bank.is_running());
        bank.start(1, 10);
        bank.start(7, 10);
        let first = bank.frame();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].0, 1);
        while bank.is_running() {
            bank.frame();
        }
        assert!(bank.frame().is_empty(), "finished counters stop reporting");
    }

    #[test]
    fn skill_bar_fills_once_after_delay() {
        let mut timers = ManualTimers::new();
        let mut bars = SkillBars::new(Duration(300), [90.0, 140.0, f64::NAN]);
        bars.on_visible(&mut timers, 1);
        bars.on_visible(&mut timers, 1);
        bars.on_visible(&mut timers, 5);
        assert_eq!(timers.count(Timeout::SkillBarFill(1)), 1);
        assert_eq!(
            timers.deadline_of(Timeout::SkillBarFill(1)),
            Some(HostTime(300))
        );
        assert_eq!(bars.fill(1), Some(100.0), "clamped");
        assert_eq!(bars.fill(2), Some(0.0));
        assert_eq!(bars.fill(3), None);
    }

    proptest! {
        #[test]
        fn counter_is_monotone_bounded_and_exact(target in 0_u64..1_000_000, duration in 0_u64..5000, frame in 0_u64..100) {
            let config = CounterConfig { duration: Duration(duration), frame_interval: Duration(frame) };
            let mut anim = CounterAnimation::new(target, &config);
            let mut last = 0;
            for _ in 0..10_000 {
                let shown = anim.step();
                prop_assert!(shown >= last, "went backwards: {} -> {}", last, shown);
                prop_assert!(shown <= target);
                last = shown;
                if anim.is_finished() {
                    break;
                }
            }
            prop_assert!(anim.is_finished());
            prop_assert_eq!(anim.displayed(), target);
        }
    }
}
