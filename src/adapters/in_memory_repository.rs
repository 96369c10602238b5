//! In-memory table repository for testing.
//!
//! Tables are still encoded with rmp_serde, so tests exercise the same
//! serialization path as the file-backed repository without touching disk.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{Result, error::Error, persistence::SavedValueTable, ports::TableRepository};

/// In-memory repository for testing.
///
/// # Examples
///
/// ```
/// use ttt_mc::adapters::InMemoryRepository;
/// use ttt_mc::persistence::{SavedValueTable, TrainingMetadata};
/// use ttt_mc::ports::TableRepository;
/// use ttt_mc::value_table::ValueTable;
/// use std::path::Path;
///
/// let repo = InMemoryRepository::new();
/// let saved = SavedValueTable::new(ValueTable::new(), TrainingMetadata::default());
///
/// repo.save(&saved, Path::new("table"))?;
/// let loaded = repo.load(Path::new("table"))?;
/// assert_eq!(loaded, saved);
/// # Ok::<(), ttt_mc::Error>(())
/// ```
///
/// # Thread Safety
///
/// All clones share the same underlying storage.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tables currently stored.
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    /// Check if a table exists at the given path.
    pub fn contains(&self, path: &Path) -> bool {
        self.storage().contains_key(&Self::key(path))
    }

    fn key(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.storage
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TableRepository for InMemoryRepository {
    fn save(&self, saved: &SavedValueTable, path: &Path) -> Result<()> {
        let bytes = rmp_serde::to_vec(saved).map_err(|e| Error::SerializationContext {
            operation: "serialize value table for in-memory storage".to_string(),
            message: e.to_string(),
        })?;

        self.storage().insert(Self::key(path), bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedValueTable> {
        let storage = self.storage();
        let bytes = storage.get(&Self::key(path)).ok_or_else(|| Error::Io {
            operation: format!("load value table from in-memory storage at {path:?}"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "key not found in memory"),
        })?;

        let saved: SavedValueTable =
            rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
                operation: "deserialize value table from in-memory storage".to_string(),
                message: e.to_string(),
            })?;
        saved.check_version()?;
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{persistence::TrainingMetadata, value_table::ValueTable};

    fn saved() -> SavedValueTable {
        SavedValueTable::new(ValueTable::with_default(0.5), TrainingMetadata::default())
    }

    #[test]
    fn test_in_memory_save_and_load() {
        let repo = InMemoryRepository::new();
        let path = Path::new("table");

        assert_eq!(repo.count(), 0);
        assert!(!repo.contains(path));

        repo.save(&saved(), path).unwrap();
        assert_eq!(repo.count(), 1);
        assert!(repo.contains(path));

        let loaded = repo.load(path).unwrap();
        assert_eq!(loaded.table.default_value(), 0.5);
    }

    #[test]
    fn test_load_nonexistent_returns_error() {
        let repo = InMemoryRepository::new();
        assert!(repo.load(Path::new("nonexistent")).is_err());
    }

    #[test]
    fn test_clone_shares_storage() {
        let repo1 = InMemoryRepository::new();
        let repo2 = repo1.clone();
        let path = Path::new("shared");

        repo1.save(&saved(), path).unwrap();

        assert_eq!(repo2.load(path).unwrap(), saved());
        assert_eq!(repo2.count(), 1);
    }
}
