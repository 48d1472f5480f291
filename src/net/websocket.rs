use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use super::error::TransportError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Vec<u8>),
}

/// An open socket.
#[async_trait]
pub trait WebSocketTransport: Send + Sync {
    async fn send(&self, frame: Frame) -> Result<(), TransportError>;

    /// Next inbound data frame, or `None` once the peer closed.
    async fn recv(&self) -> Option<Result<Frame, TransportError>>;

    async fn close(&self) -> Result<(), TransportError>;
}

/// The WebSocket constructor capability of a page.
#[async_trait]
pub trait WebSocketConnector: Send + Sync {
    async fn connect(&self, url: &str) -> Result<Arc<dyn WebSocketTransport>, TransportError>;
}

/// Page-facing socket handle.
#[derive(Clone)]
pub struct WebSocket {
    url: String,
    socket: Arc<dyn WebSocketTransport>,
}

impl WebSocket {
    pub fn new(url: impl Into<String>, socket: Arc<dyn WebSocketTransport>) -> Self {
        Self {
            url: url.into(),
            socket,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn send_text(&self, text: impl Into<String>) -> Result<(), TransportError> {
        self.socket.send(Frame::Text(text.into())).await
    }

    pub async fn send_binary(&self, data: Vec<u8>) -> Result<(), TransportError> {
        self.socket.send(Frame::Binary(data)).await
    }

    pub async fn recv(&self) -> Option<Result<Frame, TransportError>> {
        self.socket.recv().await
    }

    pub async fn close(&self) -> Result<(), TransportError> {
        self.socket.close().await
    }
}

impl std::fmt::Debug for WebSocket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSocket").field("url", &self.url).finish()
    }
}

/// Live connector backed by `tokio-tungstenite`.
#[derive(Debug, Clone, Default)]
pub struct TungsteniteConnector;

#[async_trait]
impl WebSocketConnector for TungsteniteConnector {
    async fn connect(&self, url: &str) -> Result<Arc<dyn WebSocketTransport>, TransportError> {
        let (stream, _) = tokio_tungstenite::connect_async(url).await?;
        let (sink, source) = stream.split();
        tracing::debug!(url, "websocket connected");
        Ok(Arc::new(TungsteniteSocket {
            sink: Mutex::new(sink),
            source: Mutex::new(source),
        }))
    }
}

struct TungsteniteSocket {
    sink: Mutex<SplitSink<WsStream, Message>>,
    source: Mutex<SplitStream<WsStream>>,
}

#[async_trait]
impl WebSocketTransport for TungsteniteSocket {
    async fn send(&self, frame: Frame) -> Result<(), TransportError> {
        let message = match frame {
            Frame::Text(text) => Message::Text(text.into()),
            Frame::Binary(data) => Message::Binary(data.into()),
        };
        self.sink.lock().await.send(message).await?;
        Ok(())
    }

    async fn recv(&self) -> Option<Result<Frame, TransportError>> {
        let mut source = self.source.lock().await;
        while let Some(message) = source.next().await {
            match message {
                Ok(Message::Text(text)) => return Some(Ok(Frame::Text(text.as_str().to_string()))),
                Ok(Message::Binary(data)) => return Some(Ok(Frame::Binary(data.to_vec()))),
                Ok(Message::Close(_)) => return None,
                Ok(_) => continue,
                Err(err) => return Some(Err(err.into())),
            }
        }
        None
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.sink.lock().await.close().await?;
        Ok(())
    }
}
