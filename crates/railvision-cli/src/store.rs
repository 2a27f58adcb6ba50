//! Session persistence: the local-storage analogue for the auth blob.
//!
//! An injected key-value interface with no transactional guarantees; the
//! default implementation is a single JSON file under the home dir.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::paths;

/// Storage seam for the opaque token/user blob.
pub trait SessionStore {
    fn get(&self) -> Result<Option<Value>>;
    fn set(&self, blob: &Value) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_location() -> Self {
        Self::new(paths::session_path())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Result<Option<Value>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("read session at {}", self.path.display()))?;
        let value = serde_json::from_str(&raw)
            .with_context(|| format!("parse session at {}", self.path.display()))?;
        Ok(Some(value))
    }

    fn set(&self, blob: &Value) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(blob).context("serialize session")?;
        fs::write(&self.path, raw)
            .with_context(|| format!("write session at {}", self.path.display()))
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("clear session at {}", self.path.display()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn set_get_clear_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileSessionStore::new(dir.path().join("session.json"));

        assert_eq!(store.get().expect("empty read"), None);

        let blob = json!({"token": "abc", "user": {"name": "ops"}});
        store.set(&blob).expect("write");
        assert_eq!(store.get().expect("read back"), Some(blob));

        store.clear().expect("clear");
        assert_eq!(store.get().expect("read after clear"), None);
        // Clearing twice is fine.
        store.clear().expect("idempotent clear");
    }

    #[test]
    fn set_creates_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileSessionStore::new(dir.path().join("nested/state/session.json"));
        store.set(&json!({"token": "t"})).expect("write nested");
        assert!(store.get().expect("read").is_some());
    }
}
