//! Directory-backed storage: one `<key>.json` file per key.
//!
//! Writes go to a sibling temporary file first and are renamed into place,
//! so a crash mid-write leaves the previous blob intact.

use super::{PersistenceError, PersistenceResult, SnapshotStorage};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, instrument};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }
}

/// Keep keys usable as file names.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[async_trait]
impl SnapshotStorage for FileStorage {
    fn name(&self) -> &'static str {
        "file"
    }

    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    async fn read(&self, key: &str) -> PersistenceResult<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path).await {
            Ok(blob) => {
                debug!(bytes = blob.len(), "snapshot blob read");
                Ok(Some(blob))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PersistenceError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    #[instrument(skip(self, blob), fields(dir = %self.dir.display(), bytes = blob.len()))]
    async fn write(&self, key: &str, blob: &str) -> PersistenceResult<()> {
        let io_err = |source| PersistenceError::Io {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).await.map_err(io_err)?;

        let target = self.path_for(key);
        let staging = self
            .dir
            .join(format!(".{}.{}.tmp", sanitize_key(key), Uuid::new_v4().simple()));

        fs::write(&staging, blob.as_bytes()).await.map_err(io_err)?;
        if let Err(e) = fs::rename(&staging, &target).await {
            let _ = fs::remove_file(&staging).await;
            return Err(io_err(e));
        }

        debug!(path = %target.display(), "snapshot blob written");
        Ok(())
    }
}
