// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loading screen and staggered hero entrance.

use crate::time::Duration;
use crate::timer::{TimerHost, Timeout};

/// Intro timings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IntroConfig {
    /// How long the loading screen stays up.
    pub loading_duration: Duration,
    /// Gap between starting consecutive hero entrances.
    pub stagger: Duration,
    /// CSS animation delay added per hero element.
    pub animation_delay_step: Duration,
}

impl IntroConfig {
    /// 2 s loader, 100ms stagger, 0.2 s animation delay step.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            loading_duration: Duration(2000),
            stagger: Duration(100),
            animation_delay_step: Duration(200),
        }
    }
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// One hero element's entrance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entrance {
    /// Hero element index.
    pub index: usize,
    /// CSS `animation-delay` for the element.
    pub animation_delay: Duration,
}

/// Drives the loader and the entrance sequence.
#[derive(Clone, Debug)]
pub struct Intro {
    config: IntroConfig,
    hero_count: usize,
    started: bool,
    loaded: bool,
}

impl Intro {
    /// Creates the intro for `hero_count` hero elements.
    #[must_use]
    pub const fn new(config: IntroConfig, hero_count: usize) -> Self {
        Self {
            config,
            hero_count,
            started: false,
            loaded: false,
        }
    }

    /// Whether the loading screen has been hidden.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Schedules the end of the loading screen. Only the first call counts.
    pub fn start<H: TimerHost + ?Sized>(&mut self, timers: &mut H) {
        if self.started {
            return;
        }
        self.started = true;
        timers.schedule(self.config.loading_duration, Timeout::LoadingDone);
    }

    /// Handles [`Timeout::LoadingDone`]: schedules one entrance per hero
    /// element. Returns `true` the first time, when the loader should hide.
    pub fn on_loading_done<H: TimerHost + ?Sized>(&mut self, timers: &mut H) -> bool {
        if self.loaded {
            return false;
        }
        self.loaded = true;
        tracing::info!("loading screen hidden");
        for i in 0..self.hero_count {
            timers.schedule(
                self.config.stagger.saturating_mul(i as u64),
                Timeout::EntranceStep(i),
            );
        }
        true
    }

    /// Handles [`Timeout::EntranceStep`].
    #[must_use]
    pub fn entrance(&self, index: usize) -> Option<Entrance> {
        (index < self.hero_count).then(|| Entrance {
            index,
            animation_delay: self.config.animation_delay_step.saturating_mul(index as u64),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::HostTime;
    use crate::timer::ManualTimers;

    #[test]
    fn entrances_are_staggered_after_loading() {
        let mut intro = Intro::new(IntroConfig::new(), 3);
        let mut timers = ManualTimers::new();
        intro.start(&mut timers);
        intro.start(&mut timers);
        assert_eq!(timers.pending_len(), 1);

        assert_eq!(timers.advance(Duration(2000)), [Timeout::LoadingDone]);
        assert!(intro.on_loading_done(&mut timers));
        assert!(!intro.on_loading_done(&mut timers), "hides once");

        assert_eq!(
            timers.deadline_of(Timeout::EntranceStep(2)),
            Some(HostTime(2200))
        );
        let fired = timers.advance(Duration(500));
        assert_eq!(
            fired,
            [
                Timeout::EntranceStep(0),
                Timeout::EntranceStep(1),
                Timeout::EntranceStep(2)
            ]
        );
        assert_eq!(
            intro.entrance(2),
            Some(Entrance {
                index: 2,
                animation_delay: Duration(400)
            })
        );
        assert_eq!(intro.entrance(3), None);
    }
}
