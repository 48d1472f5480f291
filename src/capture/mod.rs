//! Recording side: capture wrappers over a page's network primitives and the
//! per-frame log they append to.

pub mod beacon;
pub mod fetch;
pub mod interceptor;
pub mod log_store;
pub mod state;
pub mod websocket;
pub mod xhr;

pub use interceptor::Interceptor;
pub use log_store::{CaptureLog, LogStore};
pub use state::{CaptureError, InterceptionState};
