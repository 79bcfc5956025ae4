//! Immutable in-memory content store

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info};

use crate::catalog;
use crate::domain::{ContentRecord, Entry};
use crate::error::LoadError;

/// Where an entry was authored
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum Source {
    /// Catalog embedded in the binary
    Builtin(String),
    /// YAML file on disk
    File(PathBuf),
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Builtin(name) => write!(f, "builtin:{}", name),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl From<Source> for String {
    fn from(source: Source) -> Self {
        source.to_string()
    }
}

/// An entry paired with the source it was read from
#[derive(Debug, Clone)]
pub struct AuthoredEntry {
    pub entry: Entry,
    pub source: Source,
}

impl AuthoredEntry {
    pub fn new(entry: impl Into<Entry>, source: Source) -> Self {
        Self {
            entry: entry.into(),
            source,
        }
    }
}

/// Read-only collection of entries keyed by id
///
/// Entries keep the order they were authored in. Ids are unique; the store
/// cannot be built from input that repeats one.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    entries: Vec<Entry>,
    sources: Vec<Source>,
    index: HashMap<String, usize>,
}

impl ContentStore {
    /// Build a store from authored entries, failing on the first repeated id
    pub fn new(authored: Vec<AuthoredEntry>) -> Result<Self, LoadError> {
        debug!(count = authored.len(), "ContentStore::new: called");
        let mut store = Self {
            entries: Vec::with_capacity(authored.len()),
            sources: Vec::with_capacity(authored.len()),
            index: HashMap::with_capacity(authored.len()),
        };

        for AuthoredEntry { entry, source } in authored {
            let id = entry.id().to_string();
            if let Some(&existing) = store.index.get(&id) {
                debug!(%id, first = %store.sources[existing], second = %source, "new: duplicate id");
                return Err(LoadError::DuplicateId {
                    id,
                    first: store.sources[existing].clone(),
                    second: source,
                });
            }
            store.index.insert(id, store.entries.len());
            store.entries.push(entry);
            store.sources.push(source);
        }

        debug!(count = store.entries.len(), "ContentStore::new: complete");
        Ok(store)
    }

    /// Store built from every builtin catalog
    pub fn builtin() -> Result<Self, LoadError> {
        debug!("ContentStore::builtin: called");
        let mut authored = Vec::new();
        for name in catalog::names() {
            authored.extend(catalog::load(name)?);
        }
        let store = Self::new(authored)?;
        info!(count = store.len(), "Loaded builtin content");
        Ok(store)
    }

    /// Exact, case-sensitive lookup
    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Where the entry with this id was authored
    pub fn source_of(&self, id: &str) -> Option<&Source> {
        self.index.get(id).map(|&i| &self.sources[i])
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Entries with their sources, in insertion order
    pub fn iter_with_sources(&self) -> impl Iterator<Item = (&Entry, &Source)> {
        self.entries.iter().zip(self.sources.iter())
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.id())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
