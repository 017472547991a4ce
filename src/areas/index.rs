//! Staging index
//!
//! The index maps root-relative paths to the blob staged for them. It is
//! persisted as a single JSON document and always rewritten as a whole:
//! every mutation is a read-modify-write of the entire mapping.

use crate::artifacts::index::index_entry::IndexEntry;
use anyhow::Context;
use file_guard::Lock;
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::ops::DerefMut;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.gith/index`)
    path: Box<Path>,
    /// Staged files keyed by `/`-separated root-relative path
    entries: BTreeMap<String, IndexEntry>,
    /// Whether the in-memory mapping differs from what was loaded
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the index from disk
    ///
    /// A missing or empty index file yields an empty index.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.entries.clear();
        self.changed = false;

        if !self.path.exists() {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new()
            .read(true)
            .open(self.path())
            .with_context(|| format!("failed to open index file at {:?}", self.path))?;
        let mut lock = file_guard::lock(&mut index_file, Lock::Shared, 0, 1)?;

        let mut content = String::new();
        lock.deref_mut().read_to_string(&mut content)?;

        if content.trim().is_empty() {
            return Ok(());
        }

        self.entries = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse index file at {:?}", self.path))?;

        Ok(())
    }

    pub fn entry_by_path(&self, path: &str) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    pub fn add(&mut self, path: String, entry: IndexEntry) {
        self.entries.insert(path, entry);
        self.changed = true;
    }

    /// Replace the staged mapping with an empty one
    pub fn clear(&mut self) {
        self.entries.clear();
        self.changed = true;
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn entries(&self) -> &BTreeMap<String, IndexEntry> {
        &self.entries
    }

    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(&self.entries)?;

        let mut index_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.path())
            .with_context(|| format!("failed to open index file at {:?}", self.path))?;
        let mut lock = file_guard::lock(&mut index_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(content.as_bytes())?;

        self.changed = false;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::REGULAR_FILE_MODE;
    use crate::artifacts::objects::object::hash_raw;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;

    fn entry(content: &[u8]) -> IndexEntry {
        IndexEntry::new(
            hash_raw(content),
            REGULAR_FILE_MODE.to_string(),
            content.len() as u64,
            1_700_000_000_000,
        )
    }

    #[test]
    fn missing_index_file_loads_as_empty() {
        let dir = TempDir::new().unwrap();
        let mut index = Index::new(dir.path().join("index").into_boxed_path());

        index.rehydrate().unwrap();

        assert!(index.is_empty());
    }

    #[test]
    fn written_entries_survive_a_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index").into_boxed_path();

        let mut index = Index::new(path.clone());
        index.add("a.txt".to_string(), entry(b"hello"));
        index.add("dir/b.txt".to_string(), entry(b"world"));
        index.write_updates().unwrap();

        let mut reloaded = Index::new(path);
        reloaded.rehydrate().unwrap();

        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.entry_by_path("a.txt"), Some(&entry(b"hello")));
        assert!(!reloaded.is_changed());
    }

    #[test]
    fn re_adding_a_path_replaces_its_entry() {
        let dir = TempDir::new().unwrap();
        let mut index = Index::new(dir.path().join("index").into_boxed_path());

        index.add("a.txt".to_string(), entry(b"one"));
        index.add("a.txt".to_string(), entry(b"two"));

        assert_eq!(index.len(), 1);
        assert_eq!(index.entry_by_path("a.txt"), Some(&entry(b"two")));
    }

    #[test]
    fn cleared_index_is_persisted_as_empty_mapping() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index").into_boxed_path();

        let mut index = Index::new(path.clone());
        index.add("a.txt".to_string(), entry(b"hello"));
        index.write_updates().unwrap();
        index.clear();
        index.write_updates().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }
}
