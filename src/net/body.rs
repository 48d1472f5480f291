use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("body is not valid UTF-8 text: {0}")]
pub struct DecodeError(#[from] std::str::Utf8Error);

/// Request or response payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Text(String),
    Bytes(Vec<u8>),
}

impl Body {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Body::Text(s) => s.as_bytes(),
            Body::Bytes(b) => b,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consume the body as text. Callers that still need the body read a
    /// clone.
    pub fn into_text(self) -> Result<String, DecodeError> {
        match self {
            Body::Text(s) => Ok(s),
            Body::Bytes(b) => String::from_utf8(b).map_err(|e| DecodeError(e.utf8_error())),
        }
    }

    /// Text view that never fails; invalid sequences become U+FFFD.
    pub fn to_text_lossy(&self) -> String {
        String::from_utf8_lossy(self.as_bytes()).into_owned()
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        Body::Text(s)
    }
}

impl From<&str> for Body {
    fn from(s: &str) -> Self {
        Body::Text(s.to_string())
    }
}

impl From<Vec<u8>> for Body {
    fn from(b: Vec<u8>) -> Self {
        Body::Bytes(b)
    }
}

impl From<Body> for reqwest::Body {
    fn from(body: Body) -> Self {
        match body {
            Body::Text(s) => reqwest::Body::from(s),
            Body::Bytes(b) => reqwest::Body::from(b),
        }
    }
}
