//! Captured data shapes shared by recording, assembly and replay.

pub mod entry;
pub mod snapshot;

pub use entry::{
    truncate_response_body, EntryError, NetworkLogEntry, METHOD_BEACON, METHOD_WS_SEND,
    RESPONSE_BODY_LIMIT,
};
pub use snapshot::{CookieModel, Snapshot, StorageMap};
