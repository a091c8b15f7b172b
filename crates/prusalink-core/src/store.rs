// ── Entry persistence seam ──
//
// The core rewrites config entries (migration) but never owns the
// bytes: persistence goes through this trait. prusalink-config provides
// the TOML-file implementation; the in-memory store is for hosts that
// persist elsewhere, and for tests.

use dashmap::DashMap;

use crate::entry::ConfigEntry;
use crate::error::CoreError;

/// Persists rewritten config entries.
pub trait EntryStore: Send + Sync {
    /// Persist `entry`, replacing any stored entry with the same title.
    fn update(&self, entry: &ConfigEntry) -> Result<(), CoreError>;
}

/// In-memory entry store keyed by entry title.
#[derive(Debug, Default)]
pub struct MemoryEntryStore {
    entries: DashMap<String, ConfigEntry>,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a stored entry by title.
    pub fn get(&self, title: &str) -> Option<ConfigEntry> {
        self.entries.get(title).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl EntryStore for MemoryEntryStore {
    fn update(&self, entry: &ConfigEntry) -> Result<(), CoreError> {
        self.entries.insert(entry.title.clone(), entry.clone());
        Ok(())
    }
}
