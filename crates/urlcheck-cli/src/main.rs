use urlcheck_core::logging;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Before anything else logs; falls back to stderr on its own.
    let destination = logging::init();
    tracing::debug!(%destination, "urlcheck starting");

    if let Err(err) = CliCommand::run_from_args().await {
        eprintln!("urlcheck error: {:#}", err);
        std::process::exit(1);
    }
}
