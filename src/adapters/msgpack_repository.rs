//! MessagePack implementation of the table repository.
//!
//! Tables are written with rmp_serde; `f64` values are stored bit-exact.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use tracing::info;

use crate::{Result, error::Error, persistence::SavedValueTable, ports::TableRepository};

/// MessagePack-based table repository.
///
/// Parent directories are created on save. Loading rejects files whose format
/// version this build does not understand.
///
/// # Examples
///
/// ```no_run
/// use ttt_mc::adapters::MsgPackRepository;
/// use ttt_mc::persistence::{SavedValueTable, TrainingMetadata};
/// use ttt_mc::ports::TableRepository;
/// use ttt_mc::value_table::ValueTable;
/// use std::path::Path;
///
/// let repo = MsgPackRepository;
/// let saved = SavedValueTable::new(ValueTable::new(), TrainingMetadata::default());
///
/// repo.save(&saved, Path::new("train_result/mc_tictactoe.msgpack"))?;
/// let loaded = repo.load(Path::new("train_result/mc_tictactoe.msgpack"))?;
/// # Ok::<(), ttt_mc::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    /// Create a new MessagePack repository.
    pub fn new() -> Self {
        Self
    }
}

impl TableRepository for MsgPackRepository {
    fn save(&self, saved: &SavedValueTable, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| Error::Io {
                operation: format!("create directory {parent:?}"),
                source,
            })?;
        }

        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;

        let mut writer = BufWriter::new(file);
        rmp_serde::encode::write(&mut writer, saved).map_err(|e| {
            Error::SerializationContext {
                operation: "serialize value table to MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;
        writer.flush().map_err(|source| Error::Io {
            operation: format!("flush file {path:?}"),
            source,
        })?;

        info!(path = %path.display(), states = saved.table.len(), "saved value table");
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedValueTable> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;

        let saved: SavedValueTable = rmp_serde::decode::from_read(BufReader::new(file))
            .map_err(|e| Error::SerializationContext {
                operation: "deserialize value table from MessagePack".to_string(),
                message: e.to_string(),
            })?;
        saved.check_version()?;

        info!(path = %path.display(), states = saved.table.len(), "loaded value table");
        Ok(saved)
    }
}
