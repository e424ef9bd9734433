// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Routes structured trace events into the debug log.

use std::io;

use vitrine_debug::pretty::PrettyPrintSink;

/// Forwards each complete line written to it as a `tracing::debug!` event.
#[derive(Debug, Default)]
pub(crate) struct DebugLines {
    pending: Vec<u8>,
}

impl DebugLines {
    /// Splits off every complete line buffered so far.
    fn take_lines(&mut self) -> Vec<String> {
        let Some(end) = self.pending.iter().rposition(|&b| b == b'\n') else {
            return Vec::new();
        };
        let rest = self.pending.split_off(end + 1);
        let done = core::mem::replace(&mut self.pending, rest);
        String::from_utf8_lossy(&done)
            .lines()
            .map(str::to_owned)
            .collect()
    }
}

impl io::Write for DebugLines {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(bytes);
        for line in self.take_lines() {
            tracing::debug!(target: "vitrine::trace", "{line}");
        }
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Trace sink used when `debug_trace` is on.
pub(crate) type DebugTraceSink = PrettyPrintSink<DebugLines>;

pub(crate) fn debug_sink() -> DebugTraceSink {
    PrettyPrintSink::with_writer(DebugLines::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn only_complete_lines_are_taken() {
        let mut lines = DebugLines::default();
        lines.pending.extend_from_slice(b"[slide] 1.000s 0 -> 1 by button\n[nav");
        assert_eq!(lines.take_lines(), ["[slide] 1.000s 0 -> 1 by button"]);
        assert_eq!(lines.pending, b"[nav");
        assert!(lines.take_lines().is_empty(), "partial line stays buffered");
    }

    #[test]
    fn writes_accept_every_byte() {
        let mut lines = DebugLines::default();
        assert_eq!(lines.write(b"[filter] 0.5").unwrap(), 12);
        assert_eq!(lines.write(b"00s control=1 visible=2/4\n").unwrap(), 26);
        assert!(lines.pending.is_empty());
    }
}
