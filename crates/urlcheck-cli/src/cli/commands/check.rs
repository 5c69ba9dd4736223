//! `urlcheck check <url>` – submit one URL through the throttle.

use anyhow::Result;
use urlcheck_core::config::UrlCheckConfig;
use urlcheck_core::result::WriterSink;
use urlcheck_core::session::Session;
use urlcheck_core::storage::FileStore;
use urlcheck_core::throttle::ThrottleState;

use super::{controller, transport_for};

pub async fn run_check(cfg: &UrlCheckConfig, store: FileStore, url: &str, mock: bool) -> Result<()> {
    let mut session = Session::new(
        controller(cfg, store),
        transport_for(cfg, mock),
        WriterSink::new(std::io::stdout()),
        cfg.max_url_length,
    );

    let Some(result) = session.handle_input(url.trim()).await else {
        anyhow::bail!("URL rejected");
    };
    if session.controller().state() == ThrottleState::Throttled {
        anyhow::bail!("request limit reached");
    }
    if result.is_error() {
        anyhow::bail!("check failed for {}", result.url);
    }
    Ok(())
}
