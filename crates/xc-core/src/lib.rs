//! xc-core - streaming code explanation client
//!
//! Talks to an explain server that streams back a JSON object
//! `{title, language, explanation}` over Server-Sent Events, one
//! chat-completion delta at a time. The [`stream`] module decodes that stream
//! incrementally so callers can show a live preview long before the object is
//! complete; [`session`] ties one decode session to one history entry.

pub mod api;
pub mod error;
pub mod history;
pub mod session;
pub mod stream;

pub use error::ExplainError;
