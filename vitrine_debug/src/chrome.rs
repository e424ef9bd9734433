// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads events recorded by a
//! [`RecorderSink`](super::recorder::RecorderSink) and writes
//! [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Submissions become duration slices, notices become async slices keyed by
//! their id, and everything else is an instant.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use vitrine_core::time::HostTime;
use vitrine_core::trace::{NoticeStep, SubmissionPhase};

use crate::pretty::{cause_name, phase_name, source_name, step_name};
use crate::recorder::RecordedEvent;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
pub fn export(events: &[RecordedEvent], writer: &mut dyn Write) -> io::Result<()> {
    let events: Vec<Value> = events.iter().map(to_json).collect();
    serde_json::to_writer(&mut *writer, &events)?;
    writer.flush()
}

fn instant(name: &str, cat: &str, at: HostTime, args: Value) -> Value {
    json!({
        "ph": "i",
        "name": name,
        "cat": cat,
        "ts": to_us(at),
        "pid": 0,
        "tid": 0,
        "s": "g",
        "args": args,
    })
}

fn to_json(event: &RecordedEvent) -> Value {
    match event {
        RecordedEvent::Nav(e) => instant(
            "Nav",
            "View",
            e.at,
            json!({ "previous": e.previous, "current": e.current }),
        ),
        RecordedEvent::Reveal(e) => instant(
            "Reveal",
            "View",
            e.at,
            json!({ "target": e.target, "source": source_name(e.source) }),
        ),
        RecordedEvent::Counter(e) => instant(
            "Counter",
            "View",
            e.at,
            json!({ "counter": e.counter, "target": e.target }),
        ),
        RecordedEvent::Slide(e) => instant(
            "Slide",
            "Carousel",
            e.at,
            json!({ "from": e.from, "to": e.to, "cause": cause_name(e.cause) }),
        ),
        RecordedEvent::Filter(e) => instant(
            "Filter",
            "Filter",
            e.at,
            json!({ "control": e.control, "visible": e.visible, "total": e.total }),
        ),
        RecordedEvent::Submission(e) => {
            let ph = match e.phase {
                SubmissionPhase::Invalid => {
                    return instant("Invalid", "Form", e.at, json!({}));
                }
                SubmissionPhase::Started => "B",
                SubmissionPhase::Succeeded | SubmissionPhase::Failed => "E",
            };
            json!({
                "ph": ph,
                "name": "Submission",
                "cat": "Form",
                "ts": to_us(e.at),
                "pid": 0,
                "tid": 1,
                "args": { "phase": phase_name(e.phase) },
            })
        }
        RecordedEvent::Notice(e) => {
            let ph = match e.step {
                NoticeStep::Created => "b",
                NoticeStep::Shown | NoticeStep::Hiding => "n",
                NoticeStep::Removed => "e",
            };
            json!({
                "ph": ph,
                "name": "Notice",
                "cat": "Notify",
                "id": e.id.0,
                "ts": to_us(e.at),
                "pid": 0,
                "tid": 2,
                "args": { "step": step_name(e.step) },
            })
        }
    }
}

fn to_us(t: HostTime) -> u64 {
    t.millis().saturating_mul(1000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use vitrine_core::notify::NoticeId;
    use vitrine_core::trace::{NoticeEvent, SlideCause, SlideEvent, SubmissionEvent, TraceSink};

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_submission(&SubmissionEvent {
            at: HostTime(1_000),
            phase: SubmissionPhase::Started,
        });
        rec.on_slide(&SlideEvent {
            at: HostTime(1_200),
            from: 1,
            to: 2,
            cause: SlideCause::Indicator,
        });
        rec.on_submission(&SubmissionEvent {
            at: HostTime(3_000),
            phase: SubmissionPhase::Succeeded,
        });

        let mut out = Vec::new();
        export(rec.events(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 3);

        assert_eq!(parsed[0]["ph"], "B");
        assert_eq!(parsed[0]["ts"], 1_000_000);
        assert_eq!(parsed[1]["name"], "Slide");
        assert_eq!(parsed[1]["args"]["cause"], "dot");
        assert_eq!(parsed[2]["ph"], "E");
        assert_eq!(parsed[2]["args"]["phase"], "ok");
    }

    #[test]
    fn notices_are_async_slices() {
        let mut rec = RecorderSink::new();
        for (ms, step) in [
            (0, NoticeStep::Created),
            (100, NoticeStep::Shown),
            (5_000, NoticeStep::Hiding),
            (5_300, NoticeStep::Removed),
        ] {
            rec.on_notice(&NoticeEvent {
                at: HostTime(ms),
                id: NoticeId(4),
                step,
            });
        }
        let mut out = Vec::new();
        export(rec.events(), &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        let phases: Vec<&str> = parsed.iter().map(|v| v["ph"].as_str().unwrap()).collect();
        assert_eq!(phases, ["b", "n", "n", "e"]);
        assert!(parsed.iter().all(|v| v["id"] == 4));
    }

    #[test]
    fn empty_recording_is_empty_array() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        assert_eq!(out, b"[]");
    }
}
