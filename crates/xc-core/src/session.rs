//! Session controller: one decode session per outstanding request
//!
//! Owns the lifecycle of the optimistic history entry. While streaming, every
//! refined snapshot is republished into the entry and to the caller; on
//! success the completion callback fires exactly once; on transport failure
//! the entry is removed so the store returns to its pre-session state.

use std::sync::Arc;

use bytes::Bytes;
use futures::{pin_mut, Stream, StreamExt};
use tracing::{debug, info};

use crate::api::{ExplainClient, ExplainRequest};
use crate::error::ExplainError;
use crate::history::{Explanation, ExplanationId, HistoryStore};
use crate::stream::{ExplainDecoder, ExplanationFields};

pub struct ExplainSession {
    client: ExplainClient,
    store: Arc<HistoryStore>,
}

impl ExplainSession {
    pub fn new(client: ExplainClient, store: Arc<HistoryStore>) -> Self {
        Self { client, store }
    }

    /// Run one explanation request to completion.
    ///
    /// `on_update` fires with every refined snapshot; `on_complete` fires
    /// exactly once, after the final values are in the store. Any error means
    /// no entry for this session survives.
    pub async fn run(
        &self,
        request: ExplainRequest,
        on_update: impl FnMut(&ExplanationFields),
        on_complete: impl FnOnce(&ExplanationId),
    ) -> Result<Explanation, ExplainError> {
        let stream = self.client.explain(&request).await?;
        self.run_with_stream(request, stream, on_update, on_complete)
            .await
    }

    /// Decode loop, separated from the HTTP exchange so the transport can be
    /// substituted (tests feed synthetic chunk streams).
    pub async fn run_with_stream(
        &self,
        request: ExplainRequest,
        stream: impl Stream<Item = Result<Bytes, ExplainError>>,
        mut on_update: impl FnMut(&ExplanationFields),
        on_complete: impl FnOnce(&ExplanationId),
    ) -> Result<Explanation, ExplainError> {
        let entry = Explanation::started(&request);
        let id = entry.id.clone();
        debug!("session {id} started ({} bytes of {})", request.code.len(), request.language);
        self.store.insert(entry);

        match self.decode(&request, stream, &id, &mut on_update).await {
            Ok(fields) => {
                let completed = self
                    .store
                    .complete(&id, &fields)
                    .unwrap_or_else(|| finalized(&id, &request, fields));
                info!("session {id} complete: \"{}\"", completed.title);
                on_complete(&id);
                Ok(completed)
            }
            Err(err) => {
                // No partial entry survives a failed session.
                self.store.remove(&id);
                info!("session {id} failed, entry rolled back: {err}");
                Err(err)
            }
        }
    }

    async fn decode(
        &self,
        request: &ExplainRequest,
        stream: impl Stream<Item = Result<Bytes, ExplainError>>,
        id: &ExplanationId,
        on_update: &mut impl FnMut(&ExplanationFields),
    ) -> Result<ExplanationFields, ExplainError> {
        let mut decoder = ExplainDecoder::new(&request.language);
        pin_mut!(stream);
        while let Some(chunk) = stream.next().await {
            if let Some(snapshot) = decoder.push_chunk(&chunk?) {
                self.store.update_fields(id, &snapshot);
                on_update(&snapshot);
            }
        }
        Ok(decoder.finish())
    }
}

/// Only reachable if the entry vanished mid-session, which the single-writer
/// rule rules out; still, completion must not fabricate an error.
fn finalized(id: &ExplanationId, request: &ExplainRequest, fields: ExplanationFields) -> Explanation {
    Explanation {
        id: id.clone(),
        code: request.code.clone(),
        language: fields.language,
        title: fields.title,
        explanation: fields.explanation,
        timestamp: chrono::Utc::now(),
        complete: true,
    }
}
