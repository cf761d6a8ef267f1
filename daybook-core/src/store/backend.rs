//! Key-value backends for persisting the event collection.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{DaybookError, DaybookResult};

/// Synchronous key-value storage. The store writes the whole serialized
/// collection under a single key on every mutation.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> DaybookResult<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> DaybookResult<()>;
}

/// In-memory backend, for tests and throwaway sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryBackend {
    fn get(&self, key: &str) -> DaybookResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> DaybookResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileBackend { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileBackend {
    fn get(&self, key: &str) -> DaybookResult<Option<String>> {
        let path = self.path_for(key);

        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DaybookError::Persistence(format!(
                "Could not read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> DaybookResult<()> {
        let path = self.path_for(key);
        let temp = self.dir.join(format!("{}.json.tmp", key));

        // Write to a temp file then rename, so readers never see a partial file
        let written = std::fs::create_dir_all(&self.dir)
            .and_then(|_| std::fs::write(&temp, value))
            .and_then(|_| std::fs::rename(&temp, &path));

        written.map_err(|e| {
            let _ = std::fs::remove_file(&temp);
            DaybookError::Persistence(format!("Could not write {}: {}", path.display(), e))
        })
    }
}
