//! HTTP boundary to the explain service
//!
//! One POST per explanation; the response body is the SSE stream decoded by
//! [`crate::stream::ExplainDecoder`]. Nothing here parses frames - the client
//! only opens the stream and normalizes transport errors.

use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ExplainError;

/// Public instance of the explain service.
pub const DEFAULT_SERVER: &str = "https://xc.kaf.sh";

/// Request body for `POST /api/explain`.
#[derive(Debug, Clone, Serialize)]
pub struct ExplainRequest {
    pub code: String,
    pub language: String,
}

/// Error body returned on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
}

/// Client for the explain endpoint.
#[derive(Debug, Clone)]
pub struct ExplainClient {
    http: reqwest::Client,
    base_url: String,
}

impl ExplainClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// POST the code and open the SSE response stream.
    ///
    /// A non-2xx status is fatal to the session; the body's `{error}` message
    /// is surfaced when present.
    pub async fn explain(
        &self,
        request: &ExplainRequest,
    ) -> Result<impl Stream<Item = Result<Bytes, ExplainError>>, ExplainError> {
        let url = format!("{}/api/explain", self.base_url.trim_end_matches('/'));
        debug!(
            "POST {url}: {} bytes of {}",
            request.code.len(),
            request.language
        );

        let response = self.http.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| format!("server error: {status}"));
            return Err(ExplainError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.bytes_stream().map_err(ExplainError::from))
    }
}
