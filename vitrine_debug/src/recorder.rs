// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and appends every event to a
//! `Vec<RecordedEvent>` in arrival order. The recording can be inspected
//! directly or handed to [`chrome::export`](crate::chrome::export).

use vitrine_core::time::HostTime;
use vitrine_core::trace::{
    CounterEvent, FilterEvent, NavEvent, NoticeEvent, RevealEvent, SlideEvent, SubmissionEvent,
    TraceSink,
};

// ---------------------------------------------------------------------------
// RecordedEvent
// ---------------------------------------------------------------------------

/// One recorded trace event.
#[derive(Clone, Copy, Debug)]
pub enum RecordedEvent {
    /// Active nav link changed.
    Nav(NavEvent),
    /// Carousel moved.
    Slide(SlideEvent),
    /// Filter control selected.
    Filter(FilterEvent),
    /// Submission milestone.
    Submission(SubmissionEvent),
    /// Reveal item latched.
    Reveal(RevealEvent),
    /// Counter started.
    Counter(CounterEvent),
    /// Notice lifecycle step.
    Notice(NoticeEvent),
}

impl RecordedEvent {
    /// When the event happened.
    #[must_use]
    pub fn at(&self) -> HostTime {
        match self {
            Self::Nav(e) => e.at,
            Self::Slide(e) => e.at,
            Self::Filter(e) => e.at,
            Self::Submission(e) => e.at,
            Self::Reveal(e) => e.at,
            Self::Counter(e) => e.at,
            Self::Notice(e) => e.at,
        }
    }
}

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that keeps every event.
#[derive(Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The events recorded so far.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Number of events recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drops every recorded event.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Consumes the recorder and returns the events.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }
}

impl TraceSink for RecorderSink {
    fn on_nav(&mut self, e: &NavEvent) {
        self.events.push(RecordedEvent::Nav(*e));
    }

    fn on_slide(&mut self, e: &SlideEvent) {
        self.events.push(RecordedEvent::Slide(*e));
    }

    fn on_filter(&mut self, e: &FilterEvent) {
        self.events.push(RecordedEvent::Filter(*e));
    }

    fn on_submission(&mut self, e: &SubmissionEvent) {
        self.events.push(RecordedEvent::Submission(*e));
    }

    fn on_reveal(&mut self, e: &RevealEvent) {
        self.events.push(RecordedEvent::Reveal(*e));
    }

    fn on_counter(&mut self, e: &CounterEvent) {
        self.events.push(RecordedEvent::Counter(*e));
    }

    fn on_notice(&mut self, e: &NoticeEvent) {
        self.events.push(RecordedEvent::Notice(*e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::trace::{SlideCause, SubmissionPhase, Tracer};

    #[test]
    fn records_in_arrival_order() {
        let mut rec = RecorderSink::new();
        {
            let mut tracer = Tracer::new(&mut rec);
            tracer.submission(&SubmissionEvent {
                at: HostTime(100),
                phase: SubmissionPhase::Started,
            });
            tracer.slide(&SlideEvent {
                at: HostTime(150),
                from: 0,
                to: 1,
                cause: SlideCause::Keyboard,
            });
        }
        assert_eq!(rec.len(), 2);
        assert!(matches!(
            rec.events()[0],
            RecordedEvent::Submission(SubmissionEvent {
                phase: SubmissionPhase::Started,
                ..
            })
        ));
        assert_eq!(rec.events()[1].at(), HostTime(150));

        rec.clear();
        assert!(rec.is_empty());
    }
}
