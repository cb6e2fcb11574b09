//! Durable key-value storage for client preferences.

use std::collections::BTreeMap;
use std::path::PathBuf;

use directories::ProjectDirs;
use tracing::warn;

/// String key-value store. Reads never fail: anything unreadable is absent.
pub trait Storage: Send {
  fn get(&self, key: &str) -> Option<String>;
  fn set(&mut self, key: &str, value: &str);
}

/// TOML-backed store living in the platform data directory.
pub struct FileStorage {
  path: Option<PathBuf>,
  entries: BTreeMap<String, String>,
}

impl FileStorage {
  pub fn open() -> Self {
    let path = ProjectDirs::from("", "", "studio").map(|dirs| dirs.data_dir().join("storage.toml"));
    Self::at(path)
  }

  pub fn at(path: Option<PathBuf>) -> Self {
    let entries = path
      .as_ref()
      .and_then(|p| std::fs::read_to_string(p).ok())
      .and_then(|content| toml::from_str(&content).ok())
      .unwrap_or_default();
    Self { path, entries }
  }

  fn flush(&self) {
    let Some(ref path) = self.path else { return };
    if let Some(dir) = path.parent()
      && let Err(e) = std::fs::create_dir_all(dir)
    {
      warn!(err = %e, dir = %dir.display(), "storage: failed to create directory");
      return;
    }
    match toml::to_string(&self.entries) {
      Ok(content) => {
        if let Err(e) = std::fs::write(path, content) {
          warn!(err = %e, path = %path.display(), "storage: write failed");
        }
      }
      Err(e) => warn!(err = %e, "storage: serialize failed"),
    }
  }
}

impl Storage for FileStorage {
  fn get(&self, key: &str) -> Option<String> {
    self.entries.get(key).cloned()
  }

  fn set(&mut self, key: &str, value: &str) {
    self.entries.insert(key.to_string(), value.to_string());
    self.flush();
  }
}

/// In-process store for tests.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStorage {
  entries: BTreeMap<String, String>,
}

#[cfg(test)]
impl MemoryStorage {
  pub fn with(key: &str, value: &str) -> Self {
    let mut storage = Self::default();
    storage.set(key, value);
    storage
  }
}

#[cfg(test)]
impl Storage for MemoryStorage {
  fn get(&self, key: &str) -> Option<String> {
    self.entries.get(key).cloned()
  }

  fn set(&mut self, key: &str, value: &str) {
    self.entries.insert(key.to_string(), value.to_string());
  }
}
