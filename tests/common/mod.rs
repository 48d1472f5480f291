//! Shared test utilities for statesnap
//!
//! `ScriptedSite` stands in for a live origin: fetch and XHR answer from a
//! fixed route table and every call is counted, so tests can assert that a
//! replayed page never touches it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use statesnap::net::{
    BeaconTransport, Body, FetchTransport, Frame, NetworkPrimitives, Request, Response,
    TransportError, WebSocketConnector, WebSocketTransport, XhrRequest, XhrResponse, XhrTransport,
};

#[derive(Clone, Default)]
pub struct ScriptedSite {
    routes: Arc<HashMap<String, (u16, String)>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedSite {
    pub fn new(routes: &[(&str, u16, &str)]) -> Self {
        let routes = routes
            .iter()
            .map(|(url, status, body)| (url.to_string(), (*status, body.to_string())))
            .collect();
        Self {
            routes: Arc::new(routes),
            calls: Arc::default(),
        }
    }

    pub fn primitives(&self) -> NetworkPrimitives {
        let site = Arc::new(self.clone());
        NetworkPrimitives {
            fetch: site.clone(),
            xhr: site.clone(),
            websocket: site.clone(),
            beacon: site,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn answer(&self, url: &str) -> (u16, String) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.routes
            .get(url)
            .cloned()
            .unwrap_or((404, "not found".to_string()))
    }
}

#[async_trait]
impl FetchTransport for ScriptedSite {
    async fn fetch(&self, request: Request) -> Result<Response, TransportError> {
        let (status, body) = self.answer(&request.url);
        Ok(Response::new(status, body))
    }
}

#[async_trait]
impl XhrTransport for ScriptedSite {
    async fn exchange(&self, request: XhrRequest) -> Result<XhrResponse, TransportError> {
        let (status, response_text) = self.answer(&request.url);
        Ok(XhrResponse {
            status,
            response_text,
        })
    }
}

#[async_trait]
impl WebSocketConnector for ScriptedSite {
    async fn connect(&self, _url: &str) -> Result<Arc<dyn WebSocketTransport>, TransportError> {
        Ok(Arc::new(self.clone()))
    }
}

#[async_trait]
impl WebSocketTransport for ScriptedSite {
    async fn send(&self, _frame: Frame) -> Result<(), TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn recv(&self) -> Option<Result<Frame, TransportError>> {
        None
    }

    async fn close(&self) -> Result<(), TransportError> {
        Ok(())
    }
}

impl BeaconTransport for ScriptedSite {
    fn send_beacon(&self, _url: &str, _data: Option<Body>) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        true
    }
}
