// JSON file key/value store
// Decision: Read the file once at open and serve reads from memory
// Decision: Replace the file through a temp sibling + rename so a crash never leaves half a file
//
// The file holds one JSON object mapping each key to its string value:
//   {"currentStudent": "{...}", "students": "[...]"}

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use studentportal_core::{KeyValueStore, Result};

/// Key/value store persisted to a single JSON file
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    path: PathBuf,
    entries: Arc<RwLock<BTreeMap<String, String>>>,
}

impl FileKeyValueStore {
    /// Open the store at `path`
    ///
    /// A missing file is an empty store. A file that is not a JSON object
    /// of strings is also treated as empty (logged at warn); it is replaced
    /// on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => parse_entries(&path, &contents),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Store file not found, starting empty");
                BTreeMap::new()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            entries: Arc::new(RwLock::new(entries)),
        })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Write the full map to disk, replacing the previous file
    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = serde_json::to_string_pretty(entries)?;
        let temp = self.temp_path();
        fs::write(&temp, contents)?;
        fs::rename(&temp, &self.path)?;

        tracing::trace!(path = %self.path.display(), keys = entries.len(), "Store file written");
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let mut entries = self.entries.write();
        let mut next = entries.clone();
        apply(&mut next);
        self.persist(&next).inspect_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to write store file");
        })?;
        *entries = next;
        Ok(())
    }
}

fn parse_entries(path: &Path, contents: &str) -> BTreeMap<String, String> {
    if contents.trim().is_empty() {
        return BTreeMap::new();
    }
    match serde_json::from_str(contents) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Store file is not a JSON object of strings, starting empty"
            );
            BTreeMap::new()
        }
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        if !self.entries.read().contains_key(key) {
            return Ok(());
        }
        self.update(|entries| {
            entries.remove(key);
        })
    }
}
