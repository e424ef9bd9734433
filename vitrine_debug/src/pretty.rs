// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use vitrine_core::time::HostTime;
use vitrine_core::trace::{
    CounterEvent, FilterEvent, NavEvent, NoticeEvent, NoticeStep, RevealEvent, RevealSource,
    SlideCause, SlideEvent, SubmissionEvent, SubmissionPhase, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn secs(t: HostTime) -> f64 {
    t.millis() as f64 / 1000.0
}

fn link(i: Option<usize>) -> String {
    i.map_or_else(|| String::from("-"), |i| i.to_string())
}

pub(crate) fn cause_name(cause: SlideCause) -> &'static str {
    match cause {
        SlideCause::Autoplay => "autoplay",
        SlideCause::Button => "button",
        SlideCause::Indicator => "dot",
        SlideCause::Keyboard => "key",
    }
}

pub(crate) fn source_name(source: RevealSource) -> &'static str {
    match source {
        RevealSource::Observer => "observer",
        RevealSource::ScrollFallback => "scroll",
    }
}

pub(crate) fn phase_name(phase: SubmissionPhase) -> &'static str {
    match phase {
        SubmissionPhase::Invalid => "invalid",
        SubmissionPhase::Started => "started",
        SubmissionPhase::Succeeded => "ok",
        SubmissionPhase::Failed => "FAILED",
    }
}

pub(crate) fn step_name(step: NoticeStep) -> &'static str {
    match step {
        NoticeStep::Created => "created",
        NoticeStep::Shown => "shown",
        NoticeStep::Hiding => "hiding",
        NoticeStep::Removed => "removed",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_nav(&mut self, e: &NavEvent) {
        let _ = writeln!(
            self.writer,
            "[nav] {:.3}s {} -> {}",
            secs(e.at),
            link(e.previous),
            link(e.current),
        );
    }

    fn on_slide(&mut self, e: &SlideEvent) {
        let _ = writeln!(
            self.writer,
            "[slide] {:.3}s {} -> {} by {}",
            secs(e.at),
            e.from,
            e.to,
            cause_name(e.cause),
        );
    }

    fn on_filter(&mut self, e: &FilterEvent) {
        let _ = writeln!(
            self.writer,
            "[filter] {:.3}s control={} visible={}/{}",
            secs(e.at),
            e.control,
            e.visible,
            e.total,
        );
    }

    fn on_submission(&mut self, e: &SubmissionEvent) {
        let _ = writeln!(
            self.writer,
            "[submit] {:.3}s {}",
            secs(e.at),
            phase_name(e.phase),
        );
    }

    fn on_reveal(&mut self, e: &RevealEvent) {
        let _ = writeln!(
            self.writer,
            "[reveal] {:.3}s item={} via {}",
            secs(e.at),
            e.target,
            source_name(e.source),
        );
    }

    fn on_counter(&mut self, e: &CounterEvent) {
        let _ = writeln!(
            self.writer,
            "[counter] {:.3}s #{} to {}",
            secs(e.at),
            e.counter,
            e.target,
        );
    }

    fn on_notice(&mut self, e: &NoticeEvent) {
        let _ = writeln!(
            self.writer,
            "[notice] {:.3}s id={} {}",
            secs(e.at),
            e.id.0,
            step_name(e.step),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::notify::NoticeId;

    #[test]
    fn pretty_print_slide() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_slide(&SlideEvent {
            at: HostTime(5_250),
            from: 2,
            to: 0,
            cause: SlideCause::Autoplay,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(output, "[slide] 5.250s 2 -> 0 by autoplay\n");
    }

    #[test]
    fn missing_nav_link_prints_dash() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_nav(&NavEvent {
            at: HostTime(10),
            previous: None,
            current: Some(3),
        });
        sink.on_notice(&NoticeEvent {
            at: HostTime(20),
            id: NoticeId(7),
            step: NoticeStep::Hiding,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines, ["[nav] 0.010s - -> 3", "[notice] 0.020s id=7 hiding"]);
    }
}
