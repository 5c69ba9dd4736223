//! `urlcheck run` – interactive prompt reading URLs from stdin.

use anyhow::Result;
use tokio::io::BufReader;
use urlcheck_core::config::UrlCheckConfig;
use urlcheck_core::result::WriterSink;
use urlcheck_core::session::Session;
use urlcheck_core::storage::FileStore;

use super::{controller, transport_for};

pub async fn run_session(cfg: &UrlCheckConfig, store: FileStore, mock: bool) -> Result<()> {
    println!("{}", cfg.throttle().describe());
    let mut session = Session::new(
        controller(cfg, store),
        transport_for(cfg, mock),
        WriterSink::new(std::io::stdout()),
        cfg.max_url_length,
    );
    session.run(BufReader::new(tokio::io::stdin())).await?;
    println!();
    Ok(())
}
