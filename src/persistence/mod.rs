//! Durable storage for the site snapshot.
//!
//! A backend stores opaque text blobs under string keys. The content store
//! keeps exactly one blob, under the configured storage key.

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage I/O failed for key `{key}`: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

#[async_trait]
pub trait SnapshotStorage: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &'static str;

    /// Read the blob stored under `key`, `None` if nothing was ever written.
    async fn read(&self, key: &str) -> PersistenceResult<Option<String>>;

    /// Replace the blob stored under `key`.
    async fn write(&self, key: &str, blob: &str) -> PersistenceResult<()>;
}
