//! Repository port for value table persistence.

use std::path::Path;

use crate::{Result, persistence::SavedValueTable};

/// Port for persisting and loading trained value tables.
///
/// The table crosses the boundary as an opaque blob; implementations only have
/// to preserve every key and value exactly.
///
/// # Examples
///
/// ```no_run
/// use ttt_mc::ports::TableRepository;
/// use ttt_mc::persistence::SavedValueTable;
/// use std::path::Path;
///
/// fn store<R: TableRepository>(
///     repo: &R,
///     saved: &SavedValueTable,
///     path: &Path,
/// ) -> ttt_mc::Result<()> {
///     repo.save(saved, path)
/// }
/// ```
pub trait TableRepository {
    /// Save a table to persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be written or serialization fails.
    fn save(&self, saved: &SavedValueTable, path: &Path) -> Result<()>;

    /// Load a table from persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be read, the data is corrupted,
    /// or the format version is not supported.
    fn load(&self, path: &Path) -> Result<SavedValueTable>;
}
