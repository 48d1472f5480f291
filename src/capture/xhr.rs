use std::sync::Arc;

use async_trait::async_trait;

use super::log_store::CaptureLog;
use super::state::guarded;
use crate::model::NetworkLogEntry;
use crate::net::{TransportError, XhrRequest, XhrResponse, XhrTransport};

/// XHR transport wrapper installed on a page's shared prototype.
///
/// Method and URL come from `open()`, the body from `send()`. An entry is
/// appended only when the exchange produces a response (the `load` path);
/// network errors leave no trace.
pub struct RecordingXhr {
    inner: Arc<dyn XhrTransport>,
    log: CaptureLog,
}

impl RecordingXhr {
    pub fn new(inner: Arc<dyn XhrTransport>, log: CaptureLog) -> Self {
        Self { inner, log }
    }
}

#[async_trait]
impl XhrTransport for RecordingXhr {
    async fn exchange(&self, request: XhrRequest) -> Result<XhrResponse, TransportError> {
        tracing::debug!(method = %request.method, url = %request.url, "xhr send");
        let captured = guarded("xhr", || {
            NetworkLogEntry::new(&request.method, request.url.clone())
                .with_request_body(request.body.clone())
        });

        let response = self.inner.exchange(request).await?;

        if let Some(entry) = captured {
            guarded("xhr", || {
                self.log.record(entry.with_response(
                    response.status,
                    response.response_text.clone(),
                ))
            });
        }
        Ok(response)
    }
}
