//! JSON file store under the XDG state dir, so throttle state survives restarts.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::KeyValueStore;

type Entries = BTreeMap<String, String>;

/// Key-value store backed by a single JSON object on disk.
///
/// Every operation re-reads the file; nothing is cached in memory. Writes go
/// to a temp file in the same directory that is renamed over the store, so a
/// concurrent reader sees either the old or the new map, never a partial one.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default path for the store: `~/.local/state/urlcheck/storage.json`.
    pub fn default_path() -> Result<PathBuf> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("urlcheck")?;
        Ok(xdg_dirs.place_state_file("storage.json")?)
    }

    pub fn open_default() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Entries> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("read store: {}", self.path.display()))
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Entries::new());
        }
        serde_json::from_slice(&bytes)
            .with_context(|| format!("parse store: {}", self.path.display()))
    }

    /// Load for a read-modify-write. A corrupt file is replaced rather than
    /// blocking writes forever.
    fn load_for_update(&self) -> Result<Entries> {
        match self.load() {
            Ok(entries) => Ok(entries),
            Err(e) if self.path.is_file() => {
                tracing::warn!("discarding unreadable store {}: {:#}", self.path.display(), e);
                Ok(Entries::new())
            }
            Err(e) => Err(e),
        }
    }

    fn save(&self, entries: &Entries) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).with_context(|| format!("create dir: {}", dir.display()))?;

        let json = serde_json::to_vec_pretty(entries).context("serialize store")?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("create temp store in {}", dir.display()))?;
        tmp.write_all(&json)
            .with_context(|| format!("write temp store: {}", tmp.path().display()))?;
        tmp.as_file().sync_all().context("sync temp store")?;
        tmp.persist(&self.path)
            .map_err(|e| e.error)
            .with_context(|| format!("replace store: {}", self.path.display()))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.load_for_update()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.load_for_update()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}
