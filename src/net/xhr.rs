//! `XMLHttpRequest`-style request objects.
//!
//! Every request object created in a page shares one [`XhrPrototype`], which
//! holds the transport that actually performs the exchange. Swapping the
//! prototype's transport changes the behaviour of all request objects in that
//! page, including ones created before the swap that have not sent yet.
//!
//! Completion is always delivered from a spawned task after a yield, so event
//! listeners never run inside [`XmlHttpRequest::send`].

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;

use super::error::TransportError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XhrRequest {
    pub method: String,
    pub url: String,
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XhrResponse {
    pub status: u16,
    pub response_text: String,
}

/// Performs the exchange behind a request object.
#[async_trait]
pub trait XhrTransport: Send + Sync {
    async fn exchange(&self, request: XhrRequest) -> Result<XhrResponse, TransportError>;
}

pub struct XhrPrototype {
    transport: RwLock<Arc<dyn XhrTransport>>,
}

impl XhrPrototype {
    pub fn new(transport: Arc<dyn XhrTransport>) -> Self {
        Self {
            transport: RwLock::new(transport),
        }
    }

    pub fn transport(&self) -> Arc<dyn XhrTransport> {
        self.transport.read().clone()
    }

    /// Install a new transport, returning the previous one.
    pub fn replace(&self, transport: Arc<dyn XhrTransport>) -> Arc<dyn XhrTransport> {
        std::mem::replace(&mut *self.transport.write(), transport)
    }
}

impl std::fmt::Debug for XhrPrototype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XhrPrototype").finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    Unsent = 0,
    Opened = 1,
    HeadersReceived = 2,
    Loading = 3,
    Done = 4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XhrEvent {
    ReadyStateChange,
    Load,
    Error,
    LoadEnd,
}

type Listener = Arc<dyn Fn(XhrEvent) + Send + Sync>;

struct XhrState {
    ready_state: ReadyState,
    method: String,
    url: String,
    sent: bool,
    status: u16,
    response_text: String,
    listeners: Vec<(XhrEvent, Listener)>,
}

/// A single request object. Clones share state, like references to the same
/// object in a page.
#[derive(Clone)]
pub struct XmlHttpRequest {
    prototype: Arc<XhrPrototype>,
    state: Arc<Mutex<XhrState>>,
    ready_tx: Arc<watch::Sender<ReadyState>>,
}

impl XmlHttpRequest {
    pub fn new(prototype: Arc<XhrPrototype>) -> Self {
        let (ready_tx, _) = watch::channel(ReadyState::Unsent);
        Self {
            prototype,
            state: Arc::new(Mutex::new(XhrState {
                ready_state: ReadyState::Unsent,
                method: String::new(),
                url: String::new(),
                sent: false,
                status: 0,
                response_text: String::new(),
                listeners: Vec::new(),
            })),
            ready_tx: Arc::new(ready_tx),
        }
    }

    pub fn open(&self, method: &str, url: &str) {
        {
            let mut state = self.state.lock();
            state.method = if method.is_empty() {
                "GET".to_string()
            } else {
                method.to_ascii_uppercase()
            };
            state.url = url.to_string();
            state.sent = false;
            state.status = 0;
            state.response_text.clear();
            state.ready_state = ReadyState::Opened;
        }
        self.ready_tx.send_replace(ReadyState::Opened);
        self.dispatch(XhrEvent::ReadyStateChange);
    }

    /// Start the exchange. Fails with [`TransportError::InvalidState`] when
    /// called outside a tokio runtime.
    pub fn send(&self, body: Option<String>) -> Result<(), TransportError> {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return Err(TransportError::InvalidState("send() requires a tokio runtime"));
        };
        let request = {
            let mut state = self.state.lock();
            if state.ready_state != ReadyState::Opened || state.sent {
                return Err(TransportError::InvalidState("send() requires a fresh open()"));
            }
            state.sent = true;
            XhrRequest {
                method: state.method.clone(),
                url: state.url.clone(),
                body,
            }
        };

        let transport = self.prototype.transport();
        let this = self.clone();
        handle.spawn(async move {
            tokio::task::yield_now().await;
            let outcome = transport.exchange(request).await;
            this.complete(outcome);
        });
        Ok(())
    }

    fn complete(&self, outcome: Result<XhrResponse, TransportError>) {
        let failed = {
            let mut state = self.state.lock();
            let failed = match outcome {
                Ok(response) => {
                    state.status = response.status;
                    state.response_text = response.response_text;
                    false
                }
                Err(err) => {
                    tracing::debug!(url = %state.url, error = %err, "xhr exchange failed");
                    state.status = 0;
                    state.response_text.clear();
                    true
                }
            };
            state.ready_state = ReadyState::Done;
            failed
        };
        self.ready_tx.send_replace(ReadyState::Done);

        self.dispatch(XhrEvent::ReadyStateChange);
        self.dispatch(if failed {
            XhrEvent::Error
        } else {
            XhrEvent::Load
        });
        self.dispatch(XhrEvent::LoadEnd);
    }

    fn dispatch(&self, event: XhrEvent) {
        // Listeners may read this object, so call them without the lock held.
        let listeners: Vec<Listener> = self
            .state
            .lock()
            .listeners
            .iter()
            .filter(|(kind, _)| *kind == event)
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(event);
        }
    }

    pub fn add_event_listener<F>(&self, event: XhrEvent, listener: F)
    where
        F: Fn(XhrEvent) + Send + Sync + 'static,
    {
        self.state.lock().listeners.push((event, Arc::new(listener)));
    }

    pub fn ready_state(&self) -> ReadyState {
        self.state.lock().ready_state
    }

    pub fn status(&self) -> u16 {
        self.state.lock().status
    }

    pub fn response_text(&self) -> String {
        self.state.lock().response_text.clone()
    }

    pub fn method(&self) -> String {
        self.state.lock().method.clone()
    }

    pub fn url(&self) -> String {
        self.state.lock().url.clone()
    }

    /// Wait until the request reaches [`ReadyState::Done`].
    pub async fn completion(&self) {
        let mut rx = self.ready_tx.subscribe();
        let _ = rx.wait_for(|state| *state == ReadyState::Done).await;
    }
}

impl std::fmt::Debug for XmlHttpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("XmlHttpRequest")
            .field("method", &state.method)
            .field("url", &state.url)
            .field("ready_state", &state.ready_state)
            .field("status", &state.status)
            .finish()
    }
}
