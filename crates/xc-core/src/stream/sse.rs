//! SSE (Server-Sent Events) frame assembly
//!
//! Reassembles `data: ` payloads from a chunked byte stream. Network reads
//! split anywhere - mid-prefix, mid-escape, mid-character, exactly on a frame
//! boundary - so the unterminated tail of every chunk is carried into the
//! next one as raw bytes.

use tracing::debug;

/// Assembles complete event payloads from arbitrarily-split byte chunks.
///
/// A payload may span several lines (the wire format allows multi-line
/// `data:` events); it is complete once its trimmed text ends with a closing
/// brace. Protocol-level blank lines are not required to close a payload.
#[derive(Debug, Default)]
pub struct FrameAssembler {
    /// Bytes after the last newline, not yet a full line. Kept undecoded so a
    /// multi-byte UTF-8 character split across reads is never mangled.
    carry: Vec<u8>,
    /// Accumulated lines of a not-yet-closed event payload
    payload: Option<String>,
}

impl FrameAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next raw chunk; returns every payload it completed, in order.
    ///
    /// Bytes are never discarded: whatever does not yet form a complete line
    /// or payload stays buffered for the next call. Only completed lines are
    /// decoded - the newline byte cannot occur inside a multi-byte UTF-8
    /// sequence, so every completed line is self-contained.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<String> {
        self.carry.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some(end) = self.carry.iter().position(|&b| b == b'\n') {
            let rest = self.carry.split_off(end + 1);
            let line_bytes = std::mem::replace(&mut self.carry, rest);
            let line = String::from_utf8_lossy(&line_bytes[..end]);
            self.push_line(&line, &mut frames);
        }
        frames
    }

    fn push_line(&mut self, line: &str, frames: &mut Vec<String>) {
        if let Some(data) = line.strip_prefix("data: ") {
            if data.trim() == "[DONE]" {
                debug!("SSE [DONE] marker received");
                return;
            }
            // A new data line always starts a fresh payload buffer.
            self.payload = Some(data.to_string());
        } else if let Some(payload) = self.payload.as_mut() {
            if line.is_empty() {
                return;
            }
            // Any non-empty line continues an open multi-line payload; the
            // newline the split consumed is restored as the separator.
            payload.push('\n');
            payload.push_str(line);
        } else if line.starts_with(':') {
            // SSE comment (keep-alive); only meaningful between payloads.
            return;
        } else {
            // Blank or unrecognized line outside any payload.
            return;
        }

        if let Some(payload) = self.payload.take() {
            if payload.trim().ends_with('}') {
                frames.push(payload);
            } else {
                self.payload = Some(payload);
            }
        }
    }
}
