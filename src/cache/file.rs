use super::KeyValueStore;
use crate::error::{PromptcastError, Result};
use anyhow::Context;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

const EXTENSION: &str = "session";

/// One file per key under a directory
///
/// The file holds the value and nothing else. Keys are escaped into file
/// names so `host:port` keys are valid on every platform. The directory is
/// created on the first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", encode_key(key), EXTENSION))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => {
                let value = contents.trim();
                Ok((!value.is_empty()).then(|| value.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PromptcastError::Storage(format!(
                "Failed to read cache record for {}: {}",
                key, e
            ))
            .into()),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .map_err(PromptcastError::from)
            .with_context(|| format!("Failed to create cache directory {}", self.dir.display()))?;
        fs::write(self.path_for(key), value)
            .map_err(PromptcastError::from)
            .with_context(|| format!("Failed to write cache record for {}", key))?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(PromptcastError::Storage(format!(
                "Failed to delete cache record for {}: {}",
                key, e
            ))
            .into()),
        }
    }

    fn list_keys(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(PromptcastError::Storage(format!(
                    "Failed to read cache directory {}: {}",
                    self.dir.display(),
                    e
                ))
                .into())
            }
        };

        let mut keys = Vec::new();
        for entry in entries {
            let path = entry.map_err(PromptcastError::from)?.path();
            if path.extension().and_then(|s| s.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                match decode_key(stem) {
                    Some(key) => keys.push(key),
                    None => tracing::warn!(file = %path.display(), "Ignoring badly named cache file"),
                }
            }
        }
        Ok(keys)
    }
}

/// Percent-encodes a key into a file stem
///
/// Everything but ASCII alphanumerics and `-_.~` is escaped, so `host:port`
/// keys and IPv6 hosts are valid file names on every platform.
fn encode_key(key: &str) -> String {
    urlencoding::encode(key).into_owned()
}

fn decode_key(name: &str) -> Option<String> {
    urlencoding::decode(name).ok().map(|key| key.into_owned())
}
