//! Replay side: serve a page's fetch and XHR traffic from a recorded
//! [`Snapshot`].

pub mod matcher;
pub mod mock;

use std::sync::Arc;

use thiserror::Error;
use url::Url;

use crate::model::Snapshot;
use crate::page::{PageContext, PageMode};

pub use matcher::{normalize_url, Matcher};
pub use mock::{MockResponder, MISS_BODY, MISS_STATUS, MOCK_STATUS_TEXT};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("invalid replay origin: {0}")]
    InvalidOrigin(#[from] url::ParseError),

    #[error("replay origin {0} has no usable origin")]
    OpaqueOrigin(String),
}

/// Handle to an installed replay. Counters are shared with the responder
/// serving the page.
#[derive(Debug, Clone)]
pub struct ReplaySession {
    responder: MockResponder,
}

impl ReplaySession {
    pub fn hits(&self) -> u64 {
        self.responder.hits()
    }

    pub fn misses(&self) -> u64 {
        self.responder.misses()
    }

    pub fn origin(&self) -> Option<&Url> {
        self.responder.matcher().origin()
    }

    pub fn matcher(&self) -> &Matcher {
        self.responder.matcher()
    }
}

/// Scheme, host and port of `raw`, the base relative URLs resolve against.
pub fn resolve_origin(raw: &str) -> Result<Url, ReplayError> {
    let parsed = Url::parse(raw)?;
    let origin = parsed.origin();
    if !origin.is_tuple() {
        return Err(ReplayError::OpaqueOrigin(raw.to_string()));
    }
    Ok(Url::parse(&origin.ascii_serialization())?)
}

/// Put `page` into replay mode for `snapshot`.
///
/// Both storage areas are cleared and refilled from the snapshot, then fetch
/// and the shared XHR prototype are pointed at a [`MockResponder`]. WebSocket
/// and beacon stay live. `origin` defaults to the snapshot URL's origin.
///
/// Replay lasts until the page navigates. Session storage is restored as
/// recorded, so a snapshot taken while recording re-arms the recorder over
/// live primitives on the next [`PageContext::navigate`].
pub fn install(
    page: &mut PageContext,
    snapshot: Arc<Snapshot>,
    origin: Option<&str>,
) -> Result<ReplaySession, ReplayError> {
    let origin = resolve_origin(origin.unwrap_or(&snapshot.url))?;

    *page.local_storage_mut() = snapshot.local_storage.clone();
    *page.session_storage_mut() = snapshot.session_storage.clone();

    let entries = snapshot.network_logs.len();
    let responder = MockResponder::new(Matcher::new(snapshot, Some(origin.clone())));

    page.fetch = Arc::new(responder.clone());
    page.xhr_prototype.replace(Arc::new(responder.clone()));
    page.mode = PageMode::Replay;

    tracing::info!(
        frame = %page.frame_id,
        origin = %origin,
        entries,
        "replay installed, network is mocked"
    );

    Ok(ReplaySession { responder })
}
