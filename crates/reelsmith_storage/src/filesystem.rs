//! Directory-backed snapshot store.

use crate::{SnapshotStore, check_quota};
use reelsmith_error::{PersistenceError, PersistenceErrorKind, ReelsmithResult};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Snapshot store that keeps one file per key.
///
/// Keys are hashed into file names, so any key string is safe:
/// `{dir}/{sha256(key)}.json`.
///
/// Writes go to a uniquely named temp file first and are renamed into place, so
/// a reader never sees a half-written value.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl FileSnapshotStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    #[tracing::instrument(skip(dir))]
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> ReelsmithResult<Self> {
        let dir = dir.into();

        std::fs::create_dir_all(&dir).map_err(|e| {
            PersistenceError::new(PersistenceErrorKind::DirectoryCreation(format!(
                "{}: {}",
                dir.display(),
                e
            )))
        })?;

        tracing::debug!(path = %dir.display(), "Initialized snapshot store");
        Ok(Self { dir, max_bytes })
    }

    /// Directory holding the snapshot files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that holds the value for `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        self.dir.join(format!("{:x}.json", hasher.finalize()))
    }
}

impl SnapshotStore for FileSnapshotStore {
    #[tracing::instrument(skip(self))]
    fn get(&self, key: &str) -> ReelsmithResult<Option<String>> {
        let path = self.path_for(key);

        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::debug!(path = %path.display(), bytes = contents.len(), "Read snapshot");
                Ok(Some(contents))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistenceError::new(PersistenceErrorKind::Read(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into()),
        }
    }

    #[tracing::instrument(skip(self, value), fields(bytes = value.len()))]
    fn set(&self, key: &str, value: &str) -> ReelsmithResult<()> {
        check_quota(value, self.max_bytes)?;

        let path = self.path_for(key);
        let temp_path = path.with_extension(format!("{}.tmp", Uuid::new_v4()));

        std::fs::write(&temp_path, value).map_err(|e| {
            PersistenceError::new(PersistenceErrorKind::Write(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        if let Err(e) = std::fs::rename(&temp_path, &path) {
            if let Err(cleanup) = std::fs::remove_file(&temp_path) {
                tracing::warn!(
                    path = %temp_path.display(),
                    error = %cleanup,
                    "Failed to remove temporary snapshot file"
                );
            }
            return Err(PersistenceError::new(PersistenceErrorKind::Write(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
            .into());
        }

        tracing::debug!(path = %path.display(), "Wrote snapshot");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    fn remove(&self, key: &str) -> ReelsmithResult<()> {
        let path = self.path_for(key);

        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Deleted snapshot");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PersistenceError::new(PersistenceErrorKind::Write(format!(
                "delete {}: {}",
                path.display(),
                e
            )))
            .into()),
        }
    }

    fn max_bytes(&self) -> usize {
        self.max_bytes
    }
}
