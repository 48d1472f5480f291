use std::panic::{catch_unwind, AssertUnwindSafe};

use thiserror::Error;

use super::log_store::CaptureLog;
use crate::net::DecodeError;

/// Failures inside capture code. None of them reach the page; they are logged
/// and the wrapped call carries on.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("instrumentation failed in {primitive}: {message}")]
    Instrumentation {
        primitive: &'static str,
        message: String,
    },

    #[error("captured body is not text: {0}")]
    Decode(#[from] DecodeError),
}

/// Interception state owned by one page context for its lifetime.
#[derive(Debug, Default)]
pub struct InterceptionState {
    installed: bool,
    log: CaptureLog,
}

impl InterceptionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }

    pub(crate) fn mark_installed(&mut self) {
        self.installed = true;
    }

    pub fn log(&self) -> &CaptureLog {
        &self.log
    }
}

/// Run capture logic, turning a panic into a logged
/// [`CaptureError::Instrumentation`].
pub(crate) fn guarded<T>(primitive: &'static str, f: impl FnOnce() -> T) -> Option<T> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Some(value),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            let err = CaptureError::Instrumentation { primitive, message };
            tracing::warn!(error = %err, "call proceeds unrecorded");
            None
        }
    }
}
