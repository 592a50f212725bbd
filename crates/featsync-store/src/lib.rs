//! Feature document stores.
//!
//! The pipeline persists at whole-document granularity: last write wins, no
//! merge or partial update. `DirectoryStore` is the real backend;
//! `InMemoryStore` exists for tests of anything that talks to a store.

use anyhow::{Context, Result};
use featsync_ports::FeatureStore;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

/// Directory-backed store: one file per suite document.
///
/// The directory is created on the first write, not at construction, so a
/// run that produces no documents leaves no empty folder behind.
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl FeatureStore for DirectoryStore {
    fn read_if_exists(&self, name: &str) -> Result<Option<String>> {
        let path = self.path_for(name);
        if !path.exists() {
            return Ok(None);
        }
        let content =
            std::fs::read_to_string(&path).with_context(|| format!("read {path:?}"))?;
        Ok(Some(content))
    }

    fn write_full(&self, name: &str, content: &str) -> Result<()> {
        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("create {:?}", self.root))?;
        let path = self.path_for(name);
        std::fs::write(&path, content).with_context(|| format!("write {path:?}"))?;
        Ok(())
    }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct InMemoryStore {
    docs: RefCell<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self, name: &str) -> Option<String> {
        self.docs.borrow().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.docs.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.borrow().is_empty()
    }
}

impl FeatureStore for InMemoryStore {
    fn read_if_exists(&self, name: &str) -> Result<Option<String>> {
        Ok(self.docs.borrow().get(name).cloned())
    }

    fn write_full(&self, name: &str, content: &str) -> Result<()> {
        self.docs
            .borrow_mut()
            .insert(name.to_string(), content.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::new(dir.path());
        assert!(store.read_if_exists("1.feature").unwrap().is_none());
    }

    #[test]
    fn write_then_read_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::new(dir.path());
        store.write_full("1.feature", "Funcionalidade: A\n").unwrap();
        assert_eq!(
            store.read_if_exists("1.feature").unwrap().as_deref(),
            Some("Funcionalidade: A\n")
        );
    }

    #[test]
    fn write_replaces_the_whole_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::new(dir.path());
        store.write_full("1.feature", "old content, much longer").unwrap();
        store.write_full("1.feature", "new").unwrap();
        assert_eq!(store.read_if_exists("1.feature").unwrap().as_deref(), Some("new"));
    }

    #[test]
    fn creates_missing_output_directory_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::new(dir.path().join("features/generated"));
        store.write_full("9.feature", "x").unwrap();
        assert!(dir.path().join("features/generated/9.feature").exists());
    }

    #[test]
    fn in_memory_store_roundtrips() {
        let store = InMemoryStore::new();
        assert!(store.is_empty());
        store.write_full("a.feature", "one").unwrap();
        store.write_full("a.feature", "two").unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.read_if_exists("a.feature").unwrap().as_deref(), Some("two"));
    }
}
