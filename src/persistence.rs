//! Saved value tables
//!
//! A trained table is stored together with the configuration that produced it
//! so a later `inspect` can tell how it was trained.

use std::{
    fs::File,
    io::BufWriter,
    path::Path,
};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    Error, Result,
    monte_carlo::{TrainerConfig, TrainingResult},
    value_table::ValueTable,
};

/// Metadata about the training process
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    /// Configuration the table was trained with
    pub config: Option<TrainerConfig>,
    /// Outcome counts of the training games
    pub result: Option<TrainingResult>,
    /// Crate version that wrote the file
    pub written_by: Option<String>,
}

impl TrainingMetadata {
    pub fn from_run(config: &TrainerConfig, result: &TrainingResult) -> Self {
        Self {
            config: Some(config.clone()),
            result: Some(result.clone()),
            written_by: Some(env!("CARGO_PKG_VERSION").to_string()),
        }
    }
}

/// Serializable representation of a trained value table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedValueTable {
    /// Version of the save format (for future compatibility)
    pub version: u32,
    /// The learned state values
    pub table: ValueTable,
    /// Training metadata
    pub metadata: TrainingMetadata,
}

impl SavedValueTable {
    /// Current save format version
    pub const VERSION: u32 = 1;

    pub fn new(table: ValueTable, metadata: TrainingMetadata) -> Self {
        Self {
            version: Self::VERSION,
            table,
            metadata,
        }
    }

    /// Reject files written in a format this build cannot read.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedVersion`] for any other version.
    pub fn check_version(&self) -> Result<()> {
        if self.version == Self::VERSION {
            Ok(())
        } else {
            Err(Error::UnsupportedVersion {
                found: self.version,
                expected: Self::VERSION,
            })
        }
    }

    pub fn into_table(self) -> ValueTable {
        self.table
    }

    /// Write the table as pretty JSON with 9-character board keys.
    ///
    /// The export is for reading and diffing; it cannot be loaded back.
    pub fn export_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let export = serde_json::json!({
            "version": self.version,
            "default_value": self.table.default_value(),
            "metadata": self.metadata,
            "values": self.table.to_labeled(),
        });
        serde_json::to_writer_pretty(BufWriter::new(file), &export)?;
        info!(path = %path.display(), states = self.table.len(), "exported value table");
        Ok(())
    }
}
