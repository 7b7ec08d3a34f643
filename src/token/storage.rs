use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::errors::Error;

/// Durable key/value storage scoped to one API origin.
///
/// Batch operations apply all keys in one step so related values (the credential pair)
/// never land half-written.
pub trait Storage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, Error>;
    fn set_items(&self, items: &[(&str, &str)]) -> Result<(), Error>;
    fn remove_items(&self, keys: &[&str]) -> Result<(), Error>;
}

#[derive(Default)]
pub struct MemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, Error> {
        self.items
            .lock()
            .map_err(|_| Error::Storage("memory storage lock poisoned".into()))
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_items(&self, items: &[(&str, &str)]) -> Result<(), Error> {
        let mut map = self.lock()?;
        for (key, value) in items {
            map.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    fn remove_items(&self, keys: &[&str]) -> Result<(), Error> {
        let mut map = self.lock()?;
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}

/// JSON file storage, one file per API origin.
///
/// The file is re-read on every access so another process sharing it sees rotated values.
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Storage file for `origin` inside `dir`, e.g. `http_localhost_9090.json`.
    pub fn for_origin(dir: impl AsRef<Path>, origin: &reqwest::Url) -> Result<Self, Error> {
        let host = origin
            .host_str()
            .ok_or_else(|| Error::Config(format!("URL '{origin}' has no host")))?;
        let port = origin
            .port_or_known_default()
            .map(|p| p.to_string())
            .unwrap_or_default();
        let name: String = format!("{}_{}_{}", origin.scheme(), host, port)
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '-' })
            .collect();
        std::fs::create_dir_all(dir.as_ref())?;
        Ok(Self::new(dir.as_ref().join(format!("{name}.json"))))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, Error> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn write_all(&self, map: &BTreeMap<String, String>) -> Result<(), Error> {
        // write-then-rename keeps readers from seeing a truncated file
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(map)?)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), keys = map.len(), "storage.write");
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<(), Error> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| Error::Storage("file storage lock poisoned".into()))?;
        let mut map = self.read_all()?;
        f(&mut map);
        self.write_all(&map)
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_items(&self, items: &[(&str, &str)]) -> Result<(), Error> {
        self.update(|map| {
            for (key, value) in items {
                map.insert((*key).to_string(), (*value).to_string());
            }
        })
    }

    fn remove_items(&self, keys: &[&str]) -> Result<(), Error> {
        self.update(|map| {
            for key in keys {
                map.remove(*key);
            }
        })
    }
}
