// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transient notification toasts.
//!
//! A notice goes through three timed steps after [`Notices::show`]:
//!
//! ```text
//!   Created ──enter_delay──► Shown ──dismiss_after──► Hiding ──exit_duration──► Removed
//! ```
//!
//! `dismiss_after` counts from creation. Under [`NoticePolicy::Replace`] a new
//! notice sends every live notice straight to `Hiding`, so at most one is
//! ever fully visible.

use alloc::string::String;
use alloc::vec::Vec;

use crate::time::Duration;
use crate::timer::{TimerHost, TimerId, Timeout};

/// Identifies one notice for its lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NoticeId(pub u32);

/// Visual flavour of a notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    /// Operation completed.
    Success,
    /// Operation failed or input was rejected.
    Error,
    /// Neutral information.
    Info,
}

impl NoticeKind {
    /// Class name carried by the toast element.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Success => "notification-success",
            Self::Error => "notification-error",
            Self::Info => "notification-info",
        }
    }
}

/// What happens to live notices when another is shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NoticePolicy {
    /// Dismiss live notices immediately.
    #[default]
    Replace,
    /// Leave live notices to their own timers.
    Stack,
}

/// Notice timing and overlap policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NoticeConfig {
    /// Time from creation until the notice starts hiding.
    pub dismiss_after: Duration,
    /// Time from creation until the notice slides in.
    pub enter_delay: Duration,
    /// Length of the hide transition before removal.
    pub exit_duration: Duration,
    /// Overlap policy.
    pub policy: NoticePolicy,
}

impl NoticeConfig {
    /// Defaults: in after 100ms, out after 5s, removed 300ms later.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dismiss_after: Duration(5000),
            enter_delay: Duration(100),
            exit_duration: Duration(300),
            policy: NoticePolicy::Replace,
        }
    }
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A presentation step for one notice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NoticeChange {
    /// Insert a toast element.
    Created {
        /// The new notice.
        id: NoticeId,
        /// Flavour.
        kind: NoticeKind,
        /// Text content.
        message: String,
    },
    /// Add the `show` class.
    Shown(NoticeId),
    /// Remove the `show` class.
    Hiding(NoticeId),
    /// Remove the toast element.
    Removed(NoticeId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Entering,
    Visible,
    Leaving,
}

#[derive(Clone, Debug)]
struct Live {
    id: NoticeId,
    phase: Phase,
    show: Option<TimerId>,
    dismiss: Option<TimerId>,
}

/// The set of notices on the page.
#[derive(Clone, Debug, Default)]
pub struct Notices {
    config: NoticeConfig,
    next_id: u32,
    live: Vec<Live>,
}

impl Notices {
    /// Creates an empty set.
    #[must_use]
    pub fn new(config: NoticeConfig) -> Self {
        Self {
            config,
            next_id: 0,
            live: Vec::new(),
        }
    }

    /// Number of notices not yet removed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Returns `true` if nothing is on screen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Number of notices shown and not hiding.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.live.iter().filter(|n| n.phase == Phase::Visible).count()
    }

    /// Shows a new notice and returns the resulting changes in order.
    pub fn show<H: TimerHost + ?Sized>(
        &mut self,
        timers: &mut H,
        message: impl Into<String>,
        kind: NoticeKind,
    ) -> Vec<NoticeChange> {
        let mut changes = Vec::new();
        if self.config.policy == NoticePolicy::Replace {
            let ids: Vec<NoticeId> = self
                .live
                .iter()
                .filter(|n| n.phase != Phase::Leaving)
                .map(|n| n.id)
                .collect();
            for id in ids {
                changes.extend(self.begin_hiding(timers, id));
            }
        }

        let id = NoticeId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let show = timers.schedule(self.config.enter_delay, Timeout::NoticeShow(id));
        let dismiss = timers.schedule(self.config.dismiss_after, Timeout::NoticeDismiss(id));
        self.live.push(Live {
            id,
            phase: Phase::Entering,
            show: Some(show),
            dismiss: Some(dismiss),
        });
        changes.push(NoticeChange::Created {
            id,
            kind,
            message: message.into(),
        });
        changes
    }

    /// Handles a notice timer. Other purposes, and timers for notices that
    /// were already removed, return `None`.
    pub fn on_timeout<H: TimerHost + ?Sized>(
        &mut self,
        timers: &mut H,
        purpose: Timeout,
    ) -> Option<NoticeChange> {
        match purpose {
            Timeout::NoticeShow(id) => {
                let n = self.live.iter_mut().find(|n| n.id == id)?;
                n.show = None;
                if n.phase != Phase::Entering {
                    return None;
                }
                n.phase = Phase::Visible;
                Some(NoticeChange::Shown(id))
            }
            Timeout::NoticeDismiss(id) => {
                let n = self.live.iter_mut().find(|n| n.id == id)?;
                n.dismiss = None;
                self.begin_hiding(timers, id)
            }
            Timeout::NoticeRemove(id) => {
                let pos = self.live.iter().position(|n| n.id == id)?;
                self.live.remove(pos);
                Some(NoticeChange::Removed(id))
            }
            _ => None,
        }
    }

    fn begin_hiding<H: TimerHost + ?Sized>(
        &mut self,
        timers: &mut H,
        id: NoticeId,
    ) -> Option<NoticeChange> {
        let n = self.live.iter_mut().find(|n| n.id == id)?;
        if n.phase == Phase::Leaving {
            return None;
        }
        for t in [n.show.take(), n.dismiss.take()].into_iter().flatten() {
            timers.cancel(t);
        }
        n.phase = Phase::Leaving;
        timers.schedule(self.config.exit_duration, Timeout::NoticeRemove(id));
        Some(NoticeChange::Hiding(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::HostTime;
    use crate::timer::ManualTimers;

    fn drive(notices: &mut Notices, timers: &mut ManualTimers, until: u64) -> Vec<(u64, NoticeChange)> {
        let mut out = Vec::new();
        while let Some(t) = timers.next_due(HostTime(until)) {
            if let Some(c) = notices.on_timeout(timers, t) {
                out.push((timers.now().millis(), c));
            }
        }
        timers.set_now(HostTime(until));
        out
    }

    #[test]
    fn notice_lifecycle_follows_configured_timings() {
        let mut timers = ManualTimers::new();
        let mut notices = Notices::new(NoticeConfig::new());
        let created = notices.show(&mut timers, "Message sent", NoticeKind::Success);
        assert_eq!(created.len(), 1);
        let id = NoticeId(0);

        let steps = drive(&mut notices, &mut timers, 10_000);
        assert_eq!(
            steps,
            [
                (100, NoticeChange::Shown(id)),
                (5000, NoticeChange::Hiding(id)),
                (5300, NoticeChange::Removed(id)),
            ]
        );
        assert!(notices.is_empty());
    }

    #[test]
    fn replace_policy_hides_live_notice_at_once() {
        let mut timers = ManualTimers::new();
        let mut notices = Notices::new(NoticeConfig::new());
        notices.show(&mut timers, "first", NoticeKind::Info);
        drive(&mut notices, &mut timers, 1000);
        assert_eq!(notices.visible_count(), 1);

        let changes = notices.show(&mut timers, "second", NoticeKind::Error);
        assert_eq!(changes[0], NoticeChange::Hiding(NoticeId(0)));
        assert!(matches!(changes[1], NoticeChange::Created { id: NoticeId(1), .. }));
        assert_eq!(timers.count(Timeout::NoticeDismiss(NoticeId(0))), 0, "old dismiss cancelled");

        let steps = drive(&mut notices, &mut timers, 1300);
        assert!(steps.contains(&(1100, NoticeChange::Shown(NoticeId(1)))));
        assert!(steps.contains(&(1300, NoticeChange::Removed(NoticeId(0)))));
        assert_eq!(notices.len(), 1);
    }

    #[test]
    fn stack_policy_keeps_both() {
        let mut timers = ManualTimers::new();
        let mut notices = Notices::new(NoticeConfig {
            policy: NoticePolicy::Stack,
            ..NoticeConfig::new()
        });
        notices.show(&mut timers, "a", NoticeKind::Info);
        let changes = notices.show(&mut timers, "b", NoticeKind::Info);
        assert_eq!(changes.len(), 1);
        drive(&mut notices, &mut timers, 200);
        assert_eq!(notices.visible_count(), 2);
    }

    #[test]
    fn replaced_before_entering_never_shows() {
        let mut timers = ManualTimers::new();
        let mut notices = Notices::new(NoticeConfig::new());
        notices.show(&mut timers, "a", NoticeKind::Info);
        notices.show(&mut timers, "b", NoticeKind::Info);
        let steps = drive(&mut notices, &mut timers, 400);
        assert!(
            !steps.contains(&(100, NoticeChange::Shown(NoticeId(0)))),
            "show timer cancelled with the replacement: {steps:?}"
        );
    }

    #[test]
    fn unrelated_timeouts_are_ignored() {
        let mut timers = ManualTimers::new();
        let mut notices = Notices::new(NoticeConfig::new());
        assert_eq!(notices.on_timeout(&mut timers, Timeout::TypingStep), None);
        assert_eq!(
            notices.on_timeout(&mut timers, Timeout::NoticeRemove(NoticeId(42))),
            None
        );
    }
}
