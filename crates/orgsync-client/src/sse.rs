//! Incremental decoder for the `text/event-stream` wire format.
//!
//! Bytes are buffered until a full line is available, so chunk boundaries may
//! fall anywhere: inside a field, inside a multi-byte UTF-8 sequence, or between
//! the CR and LF of a CRLF pair. Event ids are not tracked; after a reconnect
//! the replica is resynced instead of replayed.

use std::time::Duration;

/// Longest line kept in memory. Anything longer is discarded up to the next
/// line break, together with the event it belonged to.
pub const MAX_LINE_BYTES: usize = 1 << 20;

/// One dispatched event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SseFrame {
    /// Event name; `message` when the server sent none.
    pub event: String,
    /// Data lines joined with `\n`.
    pub data: String,
}

#[derive(Debug, Default)]
pub struct SseDecoder {
    line: Vec<u8>,
    after_cr: bool,
    overflowed: bool,
    event: String,
    data: String,
    retry: Option<Duration>,
}

impl SseDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every event it completes.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        let mut frames = Vec::new();
        for &byte in chunk {
            if std::mem::take(&mut self.after_cr) && byte == b'\n' {
                continue;
            }
            match byte {
                b'\n' => self.end_line(&mut frames),
                b'\r' => {
                    self.end_line(&mut frames);
                    self.after_cr = true;
                }
                _ => self.push(byte),
            }
        }
        frames
    }

    /// Reconnection delay last requested by the server via `retry:`.
    #[must_use]
    pub const fn retry(&self) -> Option<Duration> {
        self.retry
    }

    fn push(&mut self, byte: u8) {
        if self.overflowed {
            return;
        }
        if self.line.len() < MAX_LINE_BYTES {
            self.line.push(byte);
            return;
        }
        tracing::warn!(
            limit = MAX_LINE_BYTES,
            "event-stream line too long, dropping the pending event"
        );
        self.line = Vec::new();
        self.event.clear();
        self.data.clear();
        self.overflowed = true;
    }

    fn end_line(&mut self, frames: &mut Vec<SseFrame>) {
        if std::mem::take(&mut self.overflowed) {
            return;
        }
        let raw = std::mem::take(&mut self.line);
        let line = String::from_utf8_lossy(&raw);

        if line.is_empty() {
            if let Some(frame) = self.dispatch() {
                frames.push(frame);
            }
            return;
        }
        if line.starts_with(':') {
            return;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line.as_ref(), ""),
        };
        match field {
            "event" => value.clone_into(&mut self.event),
            "data" => {
                self.data.push_str(value);
                self.data.push('\n');
            }
            "retry" => {
                if let Ok(ms) = value.parse() {
                    self.retry = Some(Duration::from_millis(ms));
                }
            }
            _ => tracing::trace!(field, "ignoring event-stream field"),
        }
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        let event = std::mem::take(&mut self.event);
        let mut data = std::mem::take(&mut self.data);
        if data.is_empty() {
            return None;
        }
        data.pop();
        Some(SseFrame {
            event: if event.is_empty() {
                "message".to_string()
            } else {
                event
            },
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn frame(event: &str, data: &str) -> SseFrame {
        SseFrame {
            event: event.into(),
            data: data.into(),
        }
    }

    #[test]
    fn decodes_named_event() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(b"event: ORGANIZATION_DELETED\ndata: 7\n\n");
        assert_eq!(frames, vec![frame("ORGANIZATION_DELETED", "7")]);
    }

    #[test]
    fn joins_multiple_data_lines() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(b"event: X\ndata: {\"a\":\ndata: 1}\n\n");
        assert_eq!(frames, vec![frame("X", "{\"a\":\n1}")]);
    }

    #[test]
    fn handles_chunks_split_anywhere() {
        let wire = "event: ADDRESS_CREATED\r\ndata: {\"street\":\"Straße\"}\r\n\r\n".as_bytes();
        for split in 1..wire.len() {
            let mut decoder = SseDecoder::new();
            let mut frames = decoder.feed(&wire[..split]);
            frames.extend(decoder.feed(&wire[split..]));
            assert_eq!(
                frames,
                vec![frame("ADDRESS_CREATED", "{\"street\":\"Straße\"}")],
                "split at byte {split}"
            );
        }
    }

    #[test]
    fn bare_cr_terminates_lines() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(b"event: A\rdata: 1\r\r");
        assert_eq!(frames, vec![frame("A", "1")]);
    }

    #[test]
    fn comments_and_empty_events_are_skipped() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(b": keep-alive\n\nevent: A\n\ndata: x\n\n");
        // The `event: A` block has no data and is dropped; its name does not
        // leak into the next block.
        assert_eq!(frames, vec![frame("message", "x")]);
    }

    #[test]
    fn remembers_server_retry_and_ignores_ids() {
        let mut decoder = SseDecoder::new();
        assert_eq!(decoder.retry(), None);
        let frames = decoder.feed(b"id: 41\nretry: 2500\nevent: A\ndata: 1\n\nretry: soon\n\n");
        assert_eq!(frames, vec![frame("A", "1")]);
        assert_eq!(decoder.retry(), Some(Duration::from_millis(2500)));
    }

    #[test]
    fn oversized_line_drops_its_event_and_recovers() {
        let mut decoder = SseDecoder::new();
        let mut wire = b"event: A\ndata: ".to_vec();
        wire.extend(std::iter::repeat_n(b'x', MAX_LINE_BYTES + 10));
        wire.extend(b"\n\nevent: B\ndata: 2\n\n");

        let frames = decoder.feed(&wire);

        assert_eq!(frames, vec![frame("B", "2")]);
        assert!(decoder.line.is_empty());
    }

    #[test]
    fn field_without_colon_has_empty_value() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.feed(b"data\n\n");
        assert_eq!(frames, vec![frame("message", "")]);
    }

    #[test]
    fn incomplete_event_waits_for_blank_line() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"event: A\ndata: 1\n").is_empty());
        assert_eq!(decoder.feed(b"\n"), vec![frame("A", "1")]);
    }
}
