//! Incremental decoding of the explain stream
//!
//! The wire is an SSE stream of chat-completion chunks whose concatenated
//! content deltas form one JSON object `{title, language, explanation}`. The
//! object is not valid JSON until the last byte arrives, so the pipeline here
//! reassembles frames ([`sse`]), pulls deltas out of each envelope
//! ([`envelope`]), and scans the accumulated prefix for best-effort field
//! values on every update ([`partial`]). [`ExplainDecoder`] threads the state
//! of one session through that pipeline.

pub mod decoder;
pub mod envelope;
pub mod partial;
pub mod sse;

pub use decoder::ExplainDecoder;
pub use partial::ExplanationFields;
pub use sse::FrameAssembler;
