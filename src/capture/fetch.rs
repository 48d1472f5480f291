use std::sync::Arc;

use async_trait::async_trait;

use super::log_store::CaptureLog;
use super::state::{guarded, CaptureError};
use crate::model::NetworkLogEntry;
use crate::net::{Body, FetchTransport, Request, Response, TransportError};

/// Fetch wrapper that logs every call that receives a response.
pub struct RecordingFetch {
    inner: Arc<dyn FetchTransport>,
    log: CaptureLog,
}

impl RecordingFetch {
    pub fn new(inner: Arc<dyn FetchTransport>, log: CaptureLog) -> Self {
        Self { inner, log }
    }
}

#[async_trait]
impl FetchTransport for RecordingFetch {
    async fn fetch(&self, request: Request) -> Result<Response, TransportError> {
        let method = request.method.clone();
        let url = request.url.clone();
        let request_body = guarded("fetch", || request.body.clone().and_then(decode_request))
            .flatten();

        tracing::debug!(%method, %url, "fetch");
        let response = self.inner.fetch(request).await?;

        let body = response.body.clone();
        let status = response.status;
        guarded("fetch", || {
            let text = decode_response(body, &url);
            self.log.record(
                NetworkLogEntry::new(&method, url.clone())
                    .with_request_body(request_body)
                    .with_response(status, text),
            );
        });

        Ok(response)
    }
}

fn decode_request(body: Body) -> Option<String> {
    match body.into_text() {
        Ok(text) => Some(text),
        Err(err) => {
            tracing::debug!(error = %CaptureError::from(err), "request body not captured");
            None
        }
    }
}

fn decode_response(body: Body, url: &str) -> String {
    body.into_text().unwrap_or_else(|err| {
        tracing::debug!(url, error = %CaptureError::from(err), "logging empty response body");
        String::new()
    })
}
