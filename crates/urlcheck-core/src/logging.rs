//! Tracing setup. The interactive prompt owns the terminal, so events go to
//! an append-only file under the XDG state dir; stderr is the fallback when
//! that file cannot be opened.

use anyhow::{Context, Result};
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info,urlcheck=debug,urlcheck_core=debug";

/// Where log events ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    File(PathBuf),
    Stderr,
}

impl fmt::Display for LogDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogDestination::File(path) => write!(f, "{}", path.display()),
            LogDestination::Stderr => f.write_str("stderr"),
        }
    }
}

/// `~/.local/state/urlcheck/urlcheck.log`.
pub fn log_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("urlcheck")?;
    Ok(xdg_dirs.place_state_file("urlcheck.log")?)
}

/// Open `path` for appending, creating it and its parent dirs.
pub fn open_log_file_at(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create log dir: {}", dir.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file: {}", path.display()))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Returns false if one is already set.
fn install<W>(writer: W) -> bool
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .is_ok()
}

/// Initialize logging once per process. Never fails: an unusable log file
/// degrades to stderr and the reason is logged there.
pub fn init() -> LogDestination {
    let opened = log_path().and_then(|path| Ok((open_log_file_at(&path)?, path)));
    match opened {
        Ok((file, path)) => {
            install(Mutex::new(file));
            tracing::info!(path = %path.display(), "logging to file");
            LogDestination::File(path)
        }
        Err(err) => {
            install(std::io::stderr);
            tracing::warn!("file logging unavailable, using stderr: {:#}", err);
            LogDestination::Stderr
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn log_file_is_appended_not_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("urlcheck.log");

        writeln!(open_log_file_at(&path).unwrap(), "first").unwrap();
        writeln!(open_log_file_at(&path).unwrap(), "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn unopenable_log_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_log_file_at(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("open log file"));
    }

    #[test]
    fn destination_display() {
        assert_eq!(LogDestination::Stderr.to_string(), "stderr");
        assert_eq!(
            LogDestination::File(PathBuf::from("/tmp/urlcheck.log")).to_string(),
            "/tmp/urlcheck.log"
        );
    }
}
