pub mod assemble;
pub mod capture;
pub mod config;
pub mod loader;
pub mod model;
pub mod net;
pub mod page;
pub mod replay;
pub mod util;

#[cfg(test)]
mod testing;

pub use assemble::{dedupe, CaptureOptions, FrameCapture, SnapshotAssembler};
pub use capture::{CaptureLog, Interceptor, LogStore};
pub use config::Config;
pub use model::{CookieModel, NetworkLogEntry, Snapshot, StorageMap};
pub use net::NetworkPrimitives;
pub use page::{PageContext, PageMode};
pub use replay::{Matcher, MockResponder, ReplayError, ReplaySession};
