//! `urlcheck status` – show quota and throttle state.
//!
//! Read-only: a stale expiration is reported as not throttled but left on
//! disk; the next `run` or `check` clears it.

use anyhow::Result;
use urlcheck_core::clock::{Clock, SystemClock};
use urlcheck_core::config::UrlCheckConfig;
use urlcheck_core::storage::{FileStore, ThrottleStore};
use urlcheck_core::throttle::{inspect, wait_message, ThrottleState};

pub fn run_status(cfg: &UrlCheckConfig, store: FileStore) -> Result<()> {
    let path = store.path().to_path_buf();
    let status = inspect(&cfg.throttle(), &ThrottleStore::new(store), SystemClock.now());

    println!("{}", cfg.throttle().describe());
    println!("state file: {}", path.display());
    match (status.state, status.expiration) {
        (ThrottleState::Throttled, Some(expiration)) => {
            let remaining = status.remaining.map(|d| d.as_secs()).unwrap_or(0);
            println!("throttled: {}", wait_message(expiration));
            println!("remaining: {}m {:02}s", remaining / 60, remaining % 60);
        }
        _ => println!("not throttled"),
    }
    Ok(())
}
