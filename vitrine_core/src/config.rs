// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Site configuration.
//!
//! [`SiteConfig`] aggregates the per-component configs. Every component
//! config has a `const fn new()` holding the stock timings, and with the
//! `serde` feature every type deserializes with missing fields defaulted, so
//! a page only has to spell out what it changes:
//!
//! ```json
//! { "carousel": { "autoplay_interval": 8000, "keyboard_scope": "carousel-focus" } }
//! ```

use crate::animate::CounterConfig;
use crate::carousel::CarouselConfig;
use crate::error::ConfigError;
use crate::form::FormConfig;
use crate::intro::IntroConfig;
use crate::notify::NoticeConfig;
use crate::time::Duration;
use crate::typing::TypingConfig;
use crate::view_state::ScrollConfig;
use crate::viewport::ObserverSpec;

/// Visibility predicates for each observed group.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ObserverConfig {
    /// Scroll reveals.
    pub reveal: ObserverSpec,
    /// Animated counters.
    pub counters: ObserverSpec,
    /// Skill bars.
    pub skill_bars: ObserverSpec,
}

impl ObserverConfig {
    /// Reveals at 10% with a -50px bottom margin; counters and bars at 50%.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            reveal: ObserverSpec::reveal(),
            counters: ObserverSpec::half_visible(),
            skill_bars: ObserverSpec::half_visible(),
        }
    }
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Skill bar timing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SkillBarConfig {
    /// Delay between a bar becoming visible and its fill.
    pub delay: Duration,
}

impl SkillBarConfig {
    /// 300ms delay.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delay: Duration(300),
        }
    }
}

impl Default for SkillBarConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Maximum runtime log verbosity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Warnings and errors.
    Warn,
    /// Lifecycle messages.
    #[default]
    Info,
    /// State transitions.
    Debug,
    /// Everything.
    Trace,
}

impl LogLevel {
    /// The matching `tracing` level.
    #[must_use]
    pub const fn to_level(self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }
}

/// Everything tunable about the page.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SiteConfig {
    /// Scroll-derived state.
    pub scroll: ScrollConfig,
    /// Visibility predicates.
    pub observer: ObserverConfig,
    /// Counter animation.
    pub counters: CounterConfig,
    /// Skill bar fill.
    pub skill_bars: SkillBarConfig,
    /// Testimonial carousel.
    pub carousel: CarouselConfig,
    /// Contact form submission.
    pub form: FormConfig,
    /// Notification toasts.
    pub notices: NoticeConfig,
    /// Typing animation.
    pub typing: TypingConfig,
    /// Loading screen and entrance.
    pub intro: IntroConfig,
    /// Maximum log verbosity.
    pub log_level: LogLevel,
    /// Route structured trace events to the debug log.
    pub debug_trace: bool,
}

impl SiteConfig {
    /// Checks the values no component can work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let intervals = [
            ("scroll.throttle", self.scroll.throttle),
            ("scroll.resize_debounce", self.scroll.resize_debounce),
            ("counters.frame_interval", self.counters.frame_interval),
            ("carousel.autoplay_interval", self.carousel.autoplay_interval),
            ("typing.type_delay", self.typing.type_delay),
            ("typing.delete_delay", self.typing.delete_delay),
        ];
        if let Some(&(field, _)) = intervals.iter().find(|(_, d)| d.is_zero()) {
            return Err(ConfigError::ZeroInterval(field));
        }

        let thresholds = [
            ("observer.reveal.threshold", self.observer.reveal.threshold),
            ("observer.counters.threshold", self.observer.counters.threshold),
            ("observer.skill_bars.threshold", self.observer.skill_bars.threshold),
        ];
        for (field, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Threshold { field, value });
            }
        }

        if !(0.0..=1.0).contains(&self.form.success_ratio) {
            return Err(ConfigError::SuccessRatio(self.form.success_ratio));
        }
        if self.typing.phrases.is_empty() {
            return Err(ConfigError::NoPhrases);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(SiteConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_unusable_values() {
        let mut config = SiteConfig::default();
        config.carousel.autoplay_interval = Duration::ZERO;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroInterval("carousel.autoplay_interval"))
        );

        let mut config = SiteConfig::default();
        config.observer.counters.threshold = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Threshold {
                field: "observer.counters.threshold",
                ..
            })
        ));

        let mut config = SiteConfig::default();
        config.form.success_ratio = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::SuccessRatio(_))));

        let mut config = SiteConfig::default();
        config.typing.phrases.clear();
        assert_eq!(config.validate(), Err(ConfigError::NoPhrases));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_keeps_other_defaults() {
        let config: SiteConfig = serde_json::from_str(
            r#"{
                "carousel": { "autoplay_interval": 8000, "keyboard_scope": "carousel-focus" },
                "notices": { "policy": "stack" },
                "log_level": "debug"
            }"#,
        )
        .expect("valid config JSON");
        assert_eq!(config.carousel.autoplay_interval, Duration(8000));
        assert_eq!(
            config.carousel.keyboard_scope,
            crate::carousel::KeyboardScope::CarouselFocus
        );
        assert_eq!(config.notices.policy, crate::notify::NoticePolicy::Stack);
        assert_eq!(config.notices.dismiss_after, Duration(5000));
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.scroll, ScrollConfig::new());
        assert_eq!(config.typing.phrases.len(), 4);
    }
}
