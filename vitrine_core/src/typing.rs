// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typewriter effect for the hero subtitle.

use alloc::string::String;
use alloc::vec::Vec;

use crate::time::Duration;
use crate::timer::{TimerHost, TimerId, Timeout};

/// Phrases and pacing for [`Typewriter`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TypingConfig {
    /// Phrases typed in turn, wrapping around.
    pub phrases: Vec<String>,
    /// Delay after typing a character.
    pub type_delay: Duration,
    /// Delay after deleting a character.
    pub delete_delay: Duration,
    /// Pause with the full phrase shown.
    pub hold_full: Duration,
    /// Pause with the text empty, before the next phrase.
    pub hold_empty: Duration,
    /// Delay before the first keystroke.
    pub start_delay: Duration,
}

impl TypingConfig {
    /// The stock phrases and timings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            phrases: [
                "Full Stack Developer",
                "UI/UX Designer",
                "Problem Solver",
                "Creative Thinker",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            type_delay: Duration(100),
            delete_delay: Duration(50),
            hold_full: Duration(2000),
            hold_empty: Duration(500),
            start_delay: Duration(1000),
        }
    }
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Types and deletes phrases one character per step.
///
/// Characters are Unicode scalar values.
#[derive(Clone, Debug)]
pub struct Typewriter {
    config: TypingConfig,
    phrase: usize,
    chars: usize,
    deleting: bool,
    pending: Option<TimerId>,
}

impl Typewriter {
    /// Creates a typewriter showing nothing.
    #[must_use]
    pub fn new(config: TypingConfig) -> Self {
        Self {
            config,
            phrase: 0,
            chars: 0,
            deleting: false,
            pending: None,
        }
    }

    /// Index of the phrase being typed.
    #[must_use]
    pub const fn phrase_index(&self) -> usize {
        self.phrase
    }

    /// Whether the current phrase is being deleted.
    #[must_use]
    pub const fn is_deleting(&self) -> bool {
        self.deleting
    }

    /// The text currently shown.
    #[must_use]
    pub fn text(&self) -> &str {
        let Some(phrase) = self.config.phrases.get(self.phrase) else {
            return "";
        };
        let end = phrase
            .char_indices()
            .nth(self.chars)
            .map_or(phrase.len(), |(i, _)| i);
        &phrase[..end]
    }

    /// Schedules the first keystroke. Does nothing without phrases.
    pub fn start<H: TimerHost + ?Sized>(&mut self, timers: &mut H) {
        if self.config.phrases.is_empty() || self.pending.is_some() {
            return;
        }
        self.pending = Some(timers.schedule(self.config.start_delay, Timeout::TypingStep));
    }

    /// Handles [`Timeout::TypingStep`]: performs one keystroke, schedules the
    /// next, and returns the text to show.
    pub fn on_timeout<H: TimerHost + ?Sized>(&mut self, timers: &mut H) -> Option<&str> {
        self.pending.take()?;
        let delay = self.step();
        self.pending = Some(timers.schedule(delay, Timeout::TypingStep));
        Some(self.text())
    }

    /// Performs one keystroke and returns the delay before the next.
    pub fn step(&mut self) -> Duration {
        let Some(phrase) = self.config.phrases.get(self.phrase) else {
            return self.config.hold_empty;
        };
        let len = phrase.chars().count();
        if self.deleting {
            self.chars = self.chars.saturating_sub(1);
            if self.chars == 0 {
                self.deleting = false;
                self.phrase = (self.phrase + 1) % self.config.phrases.len();
                return self.config.hold_empty;
            }
            self.config.delete_delay
        } else {
            self.chars = (self.chars + 1).min(len);
            if self.chars == len {
                self.deleting = true;
                return self.config.hold_full;
            }
            self.config.type_delay
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;

    use super::*;
    use crate::time::HostTime;
    use crate::timer::ManualTimers;

    fn config(phrases: &[&str]) -> TypingConfig {
        TypingConfig {
            phrases: phrases.iter().map(|p| String::from(*p)).collect(),
            ..TypingConfig::new()
        }
    }

    #[test]
    fn types_holds_deletes_and_advances() {
        let mut tw = Typewriter::new(config(&["ab", "c"]));
        let mut trace = Vec::new();
        for _ in 0..7 {
            let delay = tw.step();
            trace.push(format!("{}@{}", tw.text(), delay.millis()));
        }
        assert_eq!(
            trace,
            ["a@100", "ab@2000", "a@50", "@500", "c@2000", "@500", "a@100"]
        );
    }

    #[test]
    fn multibyte_characters_are_single_keystrokes() {
        let mut tw = Typewriter::new(config(&["héllo"]));
        tw.step();
        tw.step();
        assert_eq!(tw.text(), "hé");
    }

    #[test]
    fn first_keystroke_after_start_delay() {
        let mut tw = Typewriter::new(TypingConfig::new());
        let mut timers = ManualTimers::new();
        tw.start(&mut timers);
        tw.start(&mut timers);
        assert_eq!(timers.count(Timeout::TypingStep), 1);
        assert_eq!(timers.deadline_of(Timeout::TypingStep), Some(HostTime(1000)));

        timers.advance(Duration(1000));
        assert_eq!(tw.on_timeout(&mut timers), Some("F"));
        assert_eq!(timers.deadline_of(Timeout::TypingStep), Some(HostTime(1100)));
    }

    #[test]
    fn no_phrases_never_starts() {
        let mut tw = Typewriter::new(config(&[]));
        let mut timers = ManualTimers::new();
        tw.start(&mut timers);
        assert_eq!(timers.pending_len(), 0);
        assert_eq!(tw.text(), "");
    }
}
