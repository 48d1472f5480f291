use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Ceiling applied to captured response bodies (200 KiB).
pub const RESPONSE_BODY_LIMIT: usize = 200 * 1024;

/// Method marker for outbound WebSocket frames.
pub const METHOD_WS_SEND: &str = "WS-SEND";

/// Method marker for `sendBeacon` calls.
pub const METHOD_BEACON: &str = "BEACON";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntryError {
    #[error("log entry is not a JSON object")]
    NotAnObject,
    #[error("log entry is missing `{0}`")]
    MissingField(&'static str),
    #[error("log entry field `{field}` is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// One recorded outbound network interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkLogEntry {
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub request_body: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub response_body: Option<String>,
    /// Capture instant in epoch milliseconds. Only used to break ties when
    /// frames are merged.
    #[serde(default, alias = "ts", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl NetworkLogEntry {
    pub fn new(method: impl AsRef<str>, url: impl Into<String>) -> Self {
        Self {
            method: method.as_ref().to_ascii_uppercase(),
            url: url.into(),
            request_body: None,
            status: None,
            response_body: None,
            timestamp: None,
        }
    }

    pub fn with_request_body(mut self, body: Option<String>) -> Self {
        self.request_body = body;
        self
    }

    pub fn with_response(mut self, status: u16, body: impl Into<String>) -> Self {
        self.status = Some(status);
        self.response_body = Some(truncate_response_body(body.into()));
        self
    }

    pub fn with_timestamp(mut self, ts: i64) -> Self {
        self.timestamp = Some(ts);
        self
    }

    /// Validate a loosely typed per-frame payload into a strict entry.
    pub fn from_value(value: &Value) -> Result<Self, EntryError> {
        let obj = value.as_object().ok_or(EntryError::NotAnObject)?;

        let method = required_str(obj.get("method"), "method")?;
        let url = required_str(obj.get("url"), "url")?;

        let status = match obj.get("status") {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => {
                let raw = n.as_u64().ok_or_else(|| EntryError::InvalidField {
                    field: "status",
                    reason: format!("expected a non-negative integer, got {n}"),
                })?;
                let status = u16::try_from(raw).map_err(|_| EntryError::InvalidField {
                    field: "status",
                    reason: format!("{raw} is out of range"),
                })?;
                Some(status)
            }
            Some(other) => {
                return Err(EntryError::InvalidField {
                    field: "status",
                    reason: format!("expected a number, got {other}"),
                })
            }
        };

        let timestamp = obj
            .get("ts")
            .or_else(|| obj.get("timestamp"))
            .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)));

        Ok(Self {
            method: method.to_ascii_uppercase(),
            url: url.to_string(),
            request_body: loose_text(obj.get("requestBody")),
            status,
            response_body: loose_text(obj.get("responseBody")).map(truncate_response_body),
            timestamp,
        })
    }

    pub fn is_websocket_send(&self) -> bool {
        self.method == METHOD_WS_SEND
    }

    pub fn is_beacon(&self) -> bool {
        self.method == METHOD_BEACON
    }
}

fn required_str<'a>(value: Option<&'a Value>, field: &'static str) -> Result<&'a str, EntryError> {
    match value {
        None | Some(Value::Null) => Err(EntryError::MissingField(field)),
        Some(Value::String(s)) if s.is_empty() => Err(EntryError::MissingField(field)),
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(EntryError::InvalidField {
            field,
            reason: format!("expected a string, got {other}"),
        }),
    }
}

fn loose_text(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

/// Cut a response body down to [`RESPONSE_BODY_LIMIT`] bytes.
///
/// The cut backs off to the previous character boundary when the limit falls
/// inside a multi-byte character, so the result is always valid UTF-8.
pub fn truncate_response_body(mut body: String) -> String {
    if body.len() <= RESPONSE_BODY_LIMIT {
        return body;
    }
    let mut end = RESPONSE_BODY_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body.truncate(end);
    body
}
