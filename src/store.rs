//! Archive entry access — the container collaborator boundary.
//!
//! The engine never parses archive containers itself.  Whatever holds the
//! bundle (an unpacked directory, a zip reader in the surrounding pipeline,
//! an in-memory map in tests) implements [`EntryStore`], and the
//! orchestrator works purely in terms of entry names and byte buffers.

use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("entry not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read/replace access to the entries of one bundle.
pub trait EntryStore {
    /// All entry names, in stable order.
    fn entry_names(&self) -> Vec<String>;

    /// Raw bytes of one entry.
    fn read_entry(&self, name: &str) -> Result<Vec<u8>, StoreError>;

    /// Replace an entry's bytes, creating the entry if absent.
    fn write_entry(&mut self, name: &str, data: Vec<u8>) -> Result<(), StoreError>;

    fn has_entry(&self, name: &str) -> bool {
        self.entry_names().iter().any(|n| n == name)
    }
}

/// In-memory store backed by a sorted map.  The tests' store of record, and
/// what the CLI loads a directory of shapefile components into.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, data: Vec<u8>) {
        self.entries.insert(name.into(), data);
    }

    pub fn into_entries(self) -> BTreeMap<String, Vec<u8>> {
        self.entries
    }
}

impl EntryStore for MemoryStore {
    fn entry_names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn read_entry(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_owned()))
    }

    fn write_entry(&mut self, name: &str, data: Vec<u8>) -> Result<(), StoreError> {
        self.entries.insert(name.to_owned(), data);
        Ok(())
    }

    fn has_entry(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}
