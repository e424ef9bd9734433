// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structured diagnostics for page interactions.
//!
//! This module provides a [`TraceSink`] trait with one method per observable
//! transition. All method bodies default to no-ops, so implementing only the
//! events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.

use crate::notify::NoticeId;
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// What moved the carousel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlideCause {
    /// Autoplay timer.
    Autoplay,
    /// Previous/next buttons.
    Button,
    /// Indicator dot.
    Indicator,
    /// Arrow key.
    Keyboard,
}

/// How a reveal item was detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RevealSource {
    /// Native intersection observer.
    Observer,
    /// Scroll-tick measurement.
    ScrollFallback,
}

/// Submission milestones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubmissionPhase {
    /// Refused because of field errors.
    Invalid,
    /// Sent; waiting for the outcome.
    Started,
    /// Went through.
    Succeeded,
    /// Failed.
    Failed,
}

/// Notice lifecycle steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoticeStep {
    /// Inserted.
    Created,
    /// Slid in.
    Shown,
    /// Sliding out.
    Hiding,
    /// Removed.
    Removed,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when the active navigation link changes.
#[derive(Clone, Copy, Debug)]
pub struct NavEvent {
    /// When it happened.
    pub at: HostTime,
    /// Link active before.
    pub previous: Option<usize>,
    /// Link active now.
    pub current: Option<usize>,
}

/// Emitted on every carousel transition.
#[derive(Clone, Copy, Debug)]
pub struct SlideEvent {
    /// When it happened.
    pub at: HostTime,
    /// Slide deactivated.
    pub from: usize,
    /// Slide activated.
    pub to: usize,
    /// What caused it.
    pub cause: SlideCause,
}

/// Emitted when a filter control is selected.
#[derive(Clone, Copy, Debug)]
pub struct FilterEvent {
    /// When it happened.
    pub at: HostTime,
    /// Control selected.
    pub control: usize,
    /// Items visible afterwards.
    pub visible: usize,
    /// Items in the grid.
    pub total: usize,
}

/// Emitted at each submission milestone.
#[derive(Clone, Copy, Debug)]
pub struct SubmissionEvent {
    /// When it happened.
    pub at: HostTime,
    /// Milestone reached.
    pub phase: SubmissionPhase,
}

/// Emitted when a reveal item latches.
#[derive(Clone, Copy, Debug)]
pub struct RevealEvent {
    /// When it happened.
    pub at: HostTime,
    /// Reveal item index.
    pub target: usize,
    /// Detection path.
    pub source: RevealSource,
}

/// Emitted when a counter starts counting.
#[derive(Clone, Copy, Debug)]
pub struct CounterEvent {
    /// When it happened.
    pub at: HostTime,
    /// Counter index.
    pub counter: usize,
    /// Value it counts up to.
    pub target: u64,
}

/// Emitted at each notice lifecycle step.
#[derive(Clone, Copy, Debug)]
pub struct NoticeEvent {
    /// When it happened.
    pub at: HostTime,
    /// Which notice.
    pub id: NoticeId,
    /// Step reached.
    pub step: NoticeStep,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the page.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when the active nav link changes.
    fn on_nav(&mut self, e: &NavEvent) {
        _ = e;
    }

    /// Called on every carousel transition.
    fn on_slide(&mut self, e: &SlideEvent) {
        _ = e;
    }

    /// Called when a filter control is selected.
    fn on_filter(&mut self, e: &FilterEvent) {
        _ = e;
    }

    /// Called at each submission milestone.
    fn on_submission(&mut self, e: &SubmissionEvent) {
        _ = e;
    }

    /// Called when a reveal item latches.
    fn on_reveal(&mut self, e: &RevealEvent) {
        _ = e;
    }

    /// Called when a counter starts.
    fn on_counter(&mut self, e: &CounterEvent) {
        _ = e;
    }

    /// Called at each notice lifecycle step.
    fn on_notice(&mut self, e: &NoticeEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

macro_rules! emit {
    ($(#[$doc:meta])* $name:ident, $event:ty, $hook:ident) => {
        $(#[$doc])*
        #[inline]
        pub fn $name(&mut self, e: &$event) {
            #[cfg(feature = "trace")]
            if let Some(s) = &mut self.sink {
                s.$hook(e);
            }
            #[cfg(not(feature = "trace"))]
            {
                _ = e;
            }
        }
    };
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Reborrows the tracer for a shorter scope.
    #[inline]
    pub fn reborrow(&mut self) -> Tracer<'_> {
        #[cfg(feature = "trace")]
        {
            Tracer {
                sink: match &mut self.sink {
                    Some(s) => Some(&mut **s),
                    None => None,
                },
            }
        }
        #[cfg(not(feature = "trace"))]
        {
            Tracer {
                _marker: core::marker::PhantomData,
            }
        }
    }

    emit!(
        /// Emits a [`NavEvent`].
        nav, NavEvent, on_nav
    );
    emit!(
        /// Emits a [`SlideEvent`].
        slide, SlideEvent, on_slide
    );
    emit!(
        /// Emits a [`FilterEvent`].
        filter, FilterEvent, on_filter
    );
    emit!(
        /// Emits a [`SubmissionEvent`].
        submission, SubmissionEvent, on_submission
    );
    emit!(
        /// Emits a [`RevealEvent`].
        reveal, RevealEvent, on_reveal
    );
    emit!(
        /// Emits a [`CounterEvent`].
        counter, CounterEvent, on_counter
    );
    emit!(
        /// Emits a [`NoticeEvent`].
        notice, NoticeEvent, on_notice
    );
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[derive(Default)]
    struct Slides(Vec<(usize, usize)>);

    impl TraceSink for Slides {
        fn on_slide(&mut self, e: &SlideEvent) {
            self.0.push((e.from, e.to));
        }
    }

    #[test]
    fn tracer_dispatches_only_with_feature() {
        let mut sink = Slides::default();
        {
            let mut tracer = Tracer::new(&mut sink);
            let mut inner = tracer.reborrow();
            inner.slide(&SlideEvent {
                at: HostTime(5),
                from: 0,
                to: 1,
                cause: SlideCause::Button,
            });
            inner.nav(&NavEvent {
                at: HostTime(5),
                previous: None,
                current: Some(1),
            });
        }
        let expected: &[(usize, usize)] = if cfg!(feature = "trace") { &[(0, 1)] } else { &[] };
        assert_eq!(sink.0, expected);
    }

    #[test]
    fn none_tracer_is_inert() {
        let mut tracer = Tracer::none();
        tracer.counter(&CounterEvent {
            at: HostTime::ZERO,
            counter: 0,
            target: 10,
        });
    }
}
