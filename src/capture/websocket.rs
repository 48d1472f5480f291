use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::log_store::CaptureLog;
use super::state::guarded;
use crate::model::{NetworkLogEntry, METHOD_WS_SEND};
use crate::net::{Frame, TransportError, WebSocketConnector, WebSocketTransport};

/// Wraps the page's WebSocket constructor so every socket it opens logs its
/// outbound frames. Inbound traffic is not captured.
pub struct RecordingConnector {
    inner: Arc<dyn WebSocketConnector>,
    log: CaptureLog,
}

impl RecordingConnector {
    pub fn new(inner: Arc<dyn WebSocketConnector>, log: CaptureLog) -> Self {
        Self { inner, log }
    }
}

#[async_trait]
impl WebSocketConnector for RecordingConnector {
    async fn connect(&self, url: &str) -> Result<Arc<dyn WebSocketTransport>, TransportError> {
        let socket = self.inner.connect(url).await?;
        Ok(Arc::new(RecordingSocket {
            url: url.to_string(),
            inner: socket,
            log: self.log.clone(),
        }))
    }
}

struct RecordingSocket {
    url: String,
    inner: Arc<dyn WebSocketTransport>,
    log: CaptureLog,
}

#[async_trait]
impl WebSocketTransport for RecordingSocket {
    async fn send(&self, frame: Frame) -> Result<(), TransportError> {
        guarded("websocket", || {
            self.log.record(
                NetworkLogEntry::new(METHOD_WS_SEND, self.url.clone())
                    .with_request_body(Some(frame_text(&frame))),
            )
        });
        self.inner.send(frame).await
    }

    async fn recv(&self) -> Option<Result<Frame, TransportError>> {
        self.inner.recv().await
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.inner.close().await
    }
}

/// Binary frames are stored base64-encoded.
fn frame_text(frame: &Frame) -> String {
    match frame {
        Frame::Text(text) => text.clone(),
        Frame::Binary(data) => STANDARD.encode(data),
    }
}
