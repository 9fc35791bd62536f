//! Decode session state for one explain request
//!
//! Threads chunks through frame assembly, envelope extraction, and partial
//! field scanning, and owns the append-only accumulator for the lifetime of
//! one request.

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::envelope;
use super::partial::{self, ExplanationFields};
use super::sse::FrameAssembler;

/// Authoritative shape of the fully-streamed object.
#[derive(Debug, Deserialize)]
struct FinalObject {
    title: String,
    language: String,
    explanation: String,
}

/// Incremental decoder for one explain stream.
///
/// State is owned by the session and updated between awaited reads; nothing
/// here is shared. `accumulated` only ever grows, and every snapshot is
/// recomputed from it in full so successive partial parses cannot diverge.
#[derive(Debug)]
pub struct ExplainDecoder {
    assembler: FrameAssembler,
    accumulated: String,
    language_hint: String,
    snapshot: ExplanationFields,
    frames_seen: usize,
    bytes_received: usize,
}

impl ExplainDecoder {
    pub fn new(language_hint: impl Into<String>) -> Self {
        let language_hint = language_hint.into();
        let snapshot = ExplanationFields {
            language: language_hint.clone(),
            ..ExplanationFields::default()
        };
        Self {
            assembler: FrameAssembler::new(),
            accumulated: String::new(),
            language_hint,
            snapshot,
            frames_seen: 0,
            bytes_received: 0,
        }
    }

    /// Process one raw chunk; returns a fresh snapshot if it carried content.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Option<ExplanationFields> {
        self.bytes_received += chunk.len();
        debug!(
            "chunk received: {} bytes (total: {})",
            chunk.len(),
            self.bytes_received
        );

        let mut grew = false;
        for frame in self.assembler.push_chunk(chunk) {
            self.frames_seen += 1;
            if let Some(delta) = envelope::extract_content(&frame) {
                self.accumulated.push_str(&delta);
                grew = true;
            }
        }

        if grew {
            self.snapshot = partial::extract(&self.accumulated, &self.language_hint);
            Some(self.snapshot.clone())
        } else {
            None
        }
    }

    /// Text accumulated so far; append-only for the session lifetime.
    pub fn accumulated(&self) -> &str {
        &self.accumulated
    }

    /// Last emitted field snapshot.
    pub fn snapshot(&self) -> &ExplanationFields {
        &self.snapshot
    }

    /// Finish the session: one authoritative JSON parse of the complete text
    /// replaces the heuristic preview. The preview stands only when the final
    /// text is not well-formed.
    pub fn finish(self) -> ExplanationFields {
        info!(
            "stream complete: {} frames, {} bytes, {} chars accumulated",
            self.frames_seen,
            self.bytes_received,
            self.accumulated.len()
        );
        match serde_json::from_str::<FinalObject>(self.accumulated.trim()) {
            Ok(object) => ExplanationFields {
                title: object.title,
                language: object.language,
                explanation: object.explanation,
            },
            Err(err) => {
                warn!("final text is not well-formed JSON, keeping preview: {err}");
                self.snapshot
            }
        }
    }
}
