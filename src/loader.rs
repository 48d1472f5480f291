//! Installs the recorder when a page's session storage says recording is on.
//!
//! The flag is owned by whatever starts a recording session; this side only
//! reads it, except for [`arm`] which tooling uses to start one.

use crate::capture::Interceptor;
use crate::page::PageContext;

pub const RECORDING_FLAG_KEY: &str = "__STATESNAP_RECORDING";

pub fn recording_requested(page: &PageContext) -> bool {
    page.session_storage()
        .get(RECORDING_FLAG_KEY)
        .is_some_and(|v| v == "true")
}

/// Install the interceptor if the recording flag is set. Returns `true` when
/// this call installed it.
pub fn activate(page: &mut PageContext) -> bool {
    if !recording_requested(page) {
        return false;
    }
    Interceptor::install(page)
}

/// Set the recording flag. Takes effect on the next [`activate`], including
/// the one every navigation runs.
pub fn arm(page: &mut PageContext) {
    page.session_storage_mut()
        .insert(RECORDING_FLAG_KEY.to_string(), "true".to_string());
    tracing::info!(frame = %page.frame_id(), "recording armed");
}
