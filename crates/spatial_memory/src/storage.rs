//! JSON snapshot storage for the spatial memory tree

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, error, info, instrument};

use crate::config::SnapshotSettings;
use crate::error::{StorageError, StorageResult};
use crate::types::WorldMap;

/// Snapshot storage trait
pub trait SnapshotStorage: std::fmt::Debug {
    /// Load the stored tree, or `None` if nothing has been saved yet
    fn load(&self) -> StorageResult<Option<WorldMap>>;

    /// Replace the stored tree
    fn save(&self, tree: &WorldMap) -> StorageResult<()>;

    /// Where the snapshot lives
    fn location(&self) -> &Path;
}

/// Snapshot kept as a single JSON document on disk
#[derive(Debug, Clone)]
pub struct JsonSnapshotStorage {
    path: PathBuf,
    settings: SnapshotSettings,
}

impl JsonSnapshotStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_settings(path, SnapshotSettings::default())
    }

    pub fn with_settings(path: impl Into<PathBuf>, settings: SnapshotSettings) -> Self {
        Self {
            path: path.into(),
            settings,
        }
    }

    fn encode(&self, tree: &WorldMap) -> StorageResult<String> {
        let encoded = if self.settings.pretty {
            serde_json::to_string_pretty(tree)
        } else {
            serde_json::to_string(tree)
        };
        encoded.map_err(|e| StorageError::Serialization(self.path.clone(), e))
    }

    fn write_file(path: &Path, contents: &str) -> StorageResult<()> {
        let mut file =
            fs::File::create(path).map_err(|e| StorageError::FileCreate(path.to_path_buf(), e))?;

        file.write_all(contents.as_bytes())
            .map_err(|e| StorageError::FileWrite(path.to_path_buf(), e))?;

        file.sync_all()
            .map_err(|e| StorageError::FileSync(path.to_path_buf(), e))
    }
}

impl SnapshotStorage for JsonSnapshotStorage {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> StorageResult<Option<WorldMap>> {
        if !self.path.is_file() {
            debug!("No snapshot found, starting with an empty tree");
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .map_err(|e| StorageError::FileRead(self.path.clone(), e))?;

        let tree: WorldMap = serde_json::from_str(&contents)
            .map_err(|e| StorageError::Deserialization(self.path.clone(), e))?;

        info!("Loaded snapshot with {} worlds", tree.len());
        Ok(Some(tree))
    }

    #[instrument(skip(self, tree), fields(path = %self.path.display()))]
    fn save(&self, tree: &WorldMap) -> StorageResult<()> {
        let json = self.encode(tree)?;

        if !self.settings.atomic_writes {
            Self::write_file(&self.path, &json)?;
            info!("Saved snapshot with {} worlds", tree.len());
            return Ok(());
        }

        let temp_path = self.path.with_extension("tmp");
        let written = Self::write_file(&temp_path, &json).and_then(|()| {
            fs::rename(&temp_path, &self.path)
                .map_err(|e| StorageError::FileRename(temp_path.clone(), self.path.clone(), e))
        });

        if let Err(e) = written {
            error!("Failed to save snapshot: {}", e);
            // The temp file may not exist if creating it was what failed.
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        info!("Saved snapshot with {} worlds", tree.len());
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.path
    }
}
