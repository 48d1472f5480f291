use async_trait::async_trait;

use super::body::Body;
use super::error::TransportError;

pub type Headers = Vec<(String, String)>;

/// A fully resolved outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub url: String,
    pub headers: Headers,
    pub body: Option<Body>,
}

impl Request {
    pub fn new(method: impl AsRef<str>, url: impl Into<String>) -> Self {
        Self {
            method: method.as_ref().to_ascii_uppercase(),
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Options passed alongside a fetch call.
#[derive(Debug, Clone, Default)]
pub struct FetchInit {
    pub method: Option<String>,
    pub headers: Headers,
    pub body: Option<Body>,
}

impl FetchInit {
    pub fn method(method: impl Into<String>) -> Self {
        Self {
            method: Some(method.into()),
            ..Self::default()
        }
    }

    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// First argument of a fetch call: a bare URL or a request object.
#[derive(Debug, Clone)]
pub enum FetchInput {
    Url(String),
    Request(Request),
}

impl FetchInput {
    /// Resolve the effective request.
    ///
    /// A request object carries its own method and body; a bare URL takes
    /// them from `init`, defaulting to GET.
    pub fn resolve(self, init: FetchInit) -> Request {
        match self {
            FetchInput::Request(mut request) => {
                request.method = request.method.to_ascii_uppercase();
                request.headers.extend(init.headers);
                if request.body.is_none() {
                    request.body = init.body;
                }
                request
            }
            FetchInput::Url(url) => Request {
                method: init
                    .method
                    .as_deref()
                    .filter(|m| !m.is_empty())
                    .unwrap_or("GET")
                    .to_ascii_uppercase(),
                url,
                headers: init.headers,
                body: init.body,
            },
        }
    }
}

impl From<&str> for FetchInput {
    fn from(url: &str) -> Self {
        FetchInput::Url(url.to_string())
    }
}

impl From<String> for FetchInput {
    fn from(url: String) -> Self {
        FetchInput::Url(url)
    }
}

impl From<Request> for FetchInput {
    fn from(request: Request) -> Self {
        FetchInput::Request(request)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub status_text: String,
    pub headers: Headers,
    pub body: Body,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Body>) -> Self {
        Self {
            status,
            status_text: String::new(),
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_status_text(mut self, text: impl Into<String>) -> Self {
        self.status_text = text.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn text(&self) -> String {
        self.body.to_text_lossy()
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(self.body.as_bytes())
    }
}

/// The `fetch` capability of a page.
#[async_trait]
pub trait FetchTransport: Send + Sync {
    async fn fetch(&self, request: Request) -> Result<Response, TransportError>;
}
