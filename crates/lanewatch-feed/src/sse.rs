//! Incremental server-sent-event frame reassembly.
//!
//! The feed arrives as a `text/event-stream` byte stream; chunk
//! boundaries are arbitrary, so a frame may span multiple reads. The
//! buffer accumulates bytes and yields the `data:` payload of each
//! complete event (events are terminated by a blank line). Only `data`
//! fields matter to the feed; comments and other SSE fields are
//! ignored. A `data:` prefix is matched at the start of a line only,
//! so payload text containing the string never confuses the parser.

/// Accumulates stream bytes and yields complete `data:` payloads.
#[derive(Debug, Default)]
pub struct SseFrameBuffer {
    buffer: String,
}

impl SseFrameBuffer {
    /// Create an empty buffer.
    pub const fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    /// Append a chunk and return the payloads of all events completed
    /// by it, in stream order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));

        let mut payloads = Vec::new();
        while let Some((end, terminator)) = find_frame_end(&self.buffer) {
            let frame: String = self
                .buffer
                .drain(..end.saturating_add(terminator))
                .collect();
            if let Some(payload) = extract_data(&frame) {
                payloads.push(payload);
            }
        }
        payloads
    }

    /// Bytes currently held waiting for a frame terminator.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

/// Locate the earliest frame terminator (blank line), returning its
/// byte offset and length. Both LF and CRLF conventions are accepted.
fn find_frame_end(buffer: &str) -> Option<(usize, usize)> {
    let lf = buffer.find("\n\n");
    let crlf = buffer.find("\r\n\r\n");
    match (lf, crlf) {
        (Some(a), Some(b)) => {
            if b < a {
                Some((b, 4))
            } else {
                Some((a, 2))
            }
        }
        (Some(a), None) => Some((a, 2)),
        (None, Some(b)) => Some((b, 4)),
        (None, None) => None,
    }
}

/// Pull the joined `data` payload out of one complete frame.
///
/// Multiple `data` lines in one event are joined with `\n` per the SSE
/// format. Returns `None` for frames without a `data` field (comments,
/// retry hints, bare event names).
fn extract_data(frame: &str) -> Option<String> {
    let mut data_lines = Vec::new();
    for line in frame.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.starts_with(':') {
            continue;
        }
        if let Some(value) = line.strip_prefix("data:") {
            data_lines.push(value.strip_prefix(' ').unwrap_or(value));
        }
    }
    if data_lines.is_empty() {
        None
    } else {
        Some(data_lines.join("\n"))
    }
}
