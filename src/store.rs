use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Persisted key holding the serialized completion mapping.
pub const PROGRESS_KEY: &str = "roadmap-progress";
/// Persisted key holding the theme preference (`light`/`dark`).
pub const THEME_KEY: &str = "roadmap-theme";
/// Scratch slot for a staged roadmap definition (`--local` runs).
pub const STAGED_DOC_KEY: &str = "temp-roadmap";

/// Key-value contract for persisted state. The store's consumers never see
/// anything beyond string entries, so the backing can be swapped in tests.
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// One file per key under a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default data directory: `$XDG_DATA_HOME/rmdr`, falling back to
    /// `$HOME/.local/share/rmdr`.
    pub fn default_dir() -> Option<PathBuf> {
        let base = std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".local/share"))
            })?;
        Some(base.join("rmdr"))
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.key_path(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating data directory {}", self.dir.display()))?;
        let path = self.key_path(key);
        fs::write(&path, value).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory store for tests and ephemeral runs.
#[derive(Debug, Default, Clone)]
pub struct MemStore {
    entries: BTreeMap<String, String>,
}

impl KvStore for MemStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

type ProgressMap = BTreeMap<String, BTreeMap<String, bool>>;

/// Per-roadmap, per-node completion state. Every mutation rewrites the whole
/// serialized mapping synchronously; the data volume is bounded by what one
/// person tracks, so there is no partial persistence.
pub struct ProgressStore {
    kv: Box<dyn KvStore>,
    map: ProgressMap,
}

impl ProgressStore {
    /// Loads the persisted mapping. Absent or unparsable content starts as an
    /// empty store; the tracker must always be able to come up with no
    /// progress recorded.
    pub fn open(kv: Box<dyn KvStore>) -> Self {
        let map = kv
            .get(PROGRESS_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self { kv, map }
    }

    pub fn is_done(&self, roadmap: &str, node: &str) -> bool {
        // Legacy data may hold explicit `false` entries; both absence and
        // `false` read as not-done.
        self.map
            .get(roadmap)
            .and_then(|nodes| nodes.get(node))
            .copied()
            .unwrap_or(false)
    }

    /// Flips completion and persists. Un-completing removes the key entirely
    /// rather than storing `false`.
    pub fn toggle(&mut self, roadmap: &str, node: &str) -> Result<bool> {
        let nodes = self.map.entry(roadmap.to_string()).or_default();
        let was_done = nodes.remove(node).unwrap_or(false);
        let now_done = !was_done;
        if now_done {
            nodes.insert(node.to_string(), true);
        }
        self.persist()?;
        Ok(now_done)
    }

    /// Drops the whole sub-mapping for one roadmap.
    pub fn clear(&mut self, roadmap: &str) -> Result<()> {
        self.map.remove(roadmap);
        self.persist()
    }

    pub fn kv(&self) -> &dyn KvStore {
        self.kv.as_ref()
    }

    pub fn kv_mut(&mut self) -> &mut dyn KvStore {
        self.kv.as_mut()
    }

    fn persist(&mut self) -> Result<()> {
        let raw = serde_json::to_string(&self.map).context("serializing progress state")?;
        self.kv.set(PROGRESS_KEY, &raw)
    }
}
