use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use super::matcher::Matcher;
use crate::model::NetworkLogEntry;
use crate::net::{
    FetchTransport, Request, Response, TransportError, XhrRequest, XhrResponse, XhrTransport,
};

pub const MISS_STATUS: u16 = 404;
pub const MISS_BODY: &str = r#"{"error":"No recorded state for this request"}"#;
pub const MOCK_STATUS_TEXT: &str = "OK (Mocked)";

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Answers fetch and XHR calls from a snapshot. Nothing it handles reaches
/// the network: a request without a recorded counterpart gets a synthetic
/// 404.
#[derive(Debug, Clone)]
pub struct MockResponder {
    matcher: Arc<Matcher>,
    counters: Arc<Counters>,
}

impl MockResponder {
    pub fn new(matcher: Matcher) -> Self {
        Self {
            matcher: Arc::new(matcher),
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn hits(&self) -> u64 {
        self.counters.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.counters.misses.load(Ordering::Relaxed)
    }

    fn lookup(
        &self,
        primitive: &'static str,
        method: &str,
        url: &str,
        body: Option<&str>,
    ) -> Option<&NetworkLogEntry> {
        match self.matcher.find(method, url, body) {
            Some(entry) => {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(primitive, method, url, "serving recorded response");
                Some(entry)
            }
            None => {
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(primitive, method, url, "no recorded entry, blocking request");
                None
            }
        }
    }
}

#[async_trait]
impl FetchTransport for MockResponder {
    async fn fetch(&self, request: Request) -> Result<Response, TransportError> {
        let body = request.body.and_then(|b| b.into_text().ok());
        let response = match self.lookup("fetch", &request.method, &request.url, body.as_deref()) {
            Some(entry) => Response::new(
                entry.status.unwrap_or(200),
                entry.response_body.clone().unwrap_or_default(),
            )
            .with_status_text(MOCK_STATUS_TEXT)
            .with_header("Content-Type", "application/json"),
            None => Response::new(MISS_STATUS, MISS_BODY),
        };
        Ok(response)
    }
}

#[async_trait]
impl XhrTransport for MockResponder {
    async fn exchange(&self, request: XhrRequest) -> Result<XhrResponse, TransportError> {
        let response = match self.lookup("xhr", &request.method, &request.url, request.body.as_deref())
        {
            Some(entry) => XhrResponse {
                status: entry.status.unwrap_or(200),
                response_text: entry.response_body.clone().unwrap_or_default(),
            },
            None => XhrResponse {
                status: MISS_STATUS,
                response_text: MISS_BODY.to_string(),
            },
        };
        Ok(response)
    }
}
