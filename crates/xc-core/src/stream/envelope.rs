//! Outer JSON envelope carried by each SSE frame

use serde::Deserialize;
use tracing::warn;

/// One chat-completion chunk: `{"choices":[{"delta":{"content"?}}]}`.
///
/// Decoded defensively - every field may be absent. A role-only or terminal
/// chunk simply carries no content increment.
#[derive(Debug, Deserialize)]
pub struct ChatEnvelope {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub delta: Delta,
}

#[derive(Debug, Default, Deserialize)]
pub struct Delta {
    #[serde(default)]
    pub content: Option<String>,
}

/// Extract the content increment from a completed frame.
///
/// Malformed frames are recoverable: log and return `None`, the stream
/// continues. An envelope without a content delta is equally `None` and is
/// not an error.
pub fn extract_content(frame: &str) -> Option<String> {
    match serde_json::from_str::<ChatEnvelope>(frame) {
        Ok(envelope) => envelope
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content),
        Err(err) => {
            warn!("skipping malformed SSE frame: {err}");
            None
        }
    }
}
