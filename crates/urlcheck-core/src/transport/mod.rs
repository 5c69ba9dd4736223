//! Request transport: submits an admitted URL to the backend.
//!
//! One capability, several implementations; the session does not care which
//! one it talks to. `check` is blocking; async callers go through
//! `spawn_blocking`.

mod error;
mod http;
mod mock;

use std::sync::Arc;

use crate::config::{TransportKind, UrlCheckConfig};
use crate::result::CheckResult;

pub use error::TransportError;
pub use http::HttpTransport;
pub use mock::MockTransport;

pub trait RequestTransport: Send + Sync {
    fn check(&self, url: &str) -> Result<CheckResult, TransportError>;
}

/// Build the transport selected in config.
pub fn from_config(cfg: &UrlCheckConfig) -> Arc<dyn RequestTransport> {
    match cfg.transport {
        TransportKind::Http => Arc::new(HttpTransport::new(&cfg.api_url, cfg.request_timeout())),
        TransportKind::Mock => Arc::new(MockTransport),
    }
}
