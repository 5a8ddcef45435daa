//! Session Persistence
//!
//! Minimal string key-value storage for values that should survive a
//! restart of the app within the same login session - today just the
//! current page. The file-backed store lives under `$XDG_RUNTIME_DIR`
//! (cleared at logout), with a per-uid `/tmp` fallback, which gives the
//! same lifetime a browser sessionStorage has: reloads keep it, a fresh
//! session starts clean.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Key under which the current page is persisted (decimal string)
pub const CURRENT_PAGE_KEY: &str = "currentPage";

/// Minimal string key-value store
pub trait KvStore: Send {
    /// Read a value
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory store for tests and headless runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// File-backed store scoped to the login session
///
/// Every write persists immediately; persistence failures are logged and
/// swallowed, since losing the remembered page is harmless.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl SessionStore {
    /// Open the store at the default session path
    pub fn open_default() -> Self {
        Self::open(default_session_path())
    }

    /// Open a store at a specific path, loading any existing contents
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = std::fs::read_to_string(&path)
            .ok()
            .and_then(|body| serde_json::from_str(&body).ok())
            .unwrap_or_default();
        Self { path, values }
    }

    /// The backing path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!(path = %parent.display(), "Failed to create session dir: {e}");
                return;
            }
        }
        match serde_json::to_string(&self.values) {
            Ok(body) => {
                if let Err(e) = std::fs::write(&self.path, body) {
                    tracing::warn!(path = %self.path.display(), "Failed to persist session store: {e}");
                }
            }
            Err(e) => tracing::warn!("Failed to encode session store: {e}"),
        }
    }
}

impl KvStore for SessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        self.persist();
    }
}

/// Default session-store path
///
/// `$XDG_RUNTIME_DIR/cardwall/session.json`, else
/// `/tmp/cardwall-$UID/session.json`.
#[must_use]
pub fn default_session_path() -> PathBuf {
    if let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
        PathBuf::from(runtime_dir)
            .join("cardwall")
            .join("session.json")
    } else {
        let uid = unsafe { libc::getuid() };
        PathBuf::from(format!("/tmp/cardwall-{uid}")).join("session.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get(CURRENT_PAGE_KEY), None);
        store.set(CURRENT_PAGE_KEY, "3");
        assert_eq!(store.get(CURRENT_PAGE_KEY), Some("3".to_string()));
        store.set(CURRENT_PAGE_KEY, "4");
        assert_eq!(store.get(CURRENT_PAGE_KEY), Some("4".to_string()));
    }

    #[test]
    fn test_session_store_persists_across_opens() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");

        {
            let mut store = SessionStore::open(&path);
            store.set(CURRENT_PAGE_KEY, "2");
        }

        let reopened = SessionStore::open(&path);
        assert_eq!(reopened.get(CURRENT_PAGE_KEY), Some("2".to_string()));
    }

    #[test]
    fn test_session_store_tolerates_corrupt_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        std::fs::write(&path, "###").expect("write");

        let store = SessionStore::open(&path);
        assert_eq!(store.get(CURRENT_PAGE_KEY), None);
    }

    #[test]
    fn test_session_store_creates_parent_dirs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("session.json");

        let mut store = SessionStore::open(&path);
        store.set("k", "v");
        assert!(path.exists());
    }

    #[test]
    fn test_default_session_path_shape() {
        let path = default_session_path();
        assert!(path.to_string_lossy().contains("cardwall"));
        assert!(path.ends_with("session.json"));
    }
}
