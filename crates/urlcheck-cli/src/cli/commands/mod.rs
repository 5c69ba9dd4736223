//! CLI command handlers. Each command is in its own file.

mod check;
mod run;
mod status;

use std::sync::Arc;

use urlcheck_core::clock::SystemClock;
use urlcheck_core::config::{TransportKind, UrlCheckConfig};
use urlcheck_core::storage::{FileStore, ThrottleStore};
use urlcheck_core::throttle::ThrottleController;
use urlcheck_core::transport::{self, RequestTransport};

pub use check::run_check;
pub use run::run_session;
pub use status::run_status;

fn controller(cfg: &UrlCheckConfig, store: FileStore) -> ThrottleController {
    ThrottleController::new(cfg.throttle(), SystemClock, ThrottleStore::new(store))
}

fn transport_for(cfg: &UrlCheckConfig, mock: bool) -> Arc<dyn RequestTransport> {
    if mock {
        let mocked = UrlCheckConfig {
            transport: TransportKind::Mock,
            ..cfg.clone()
        };
        return transport::from_config(&mocked);
    }
    transport::from_config(cfg)
}
