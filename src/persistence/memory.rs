//! In-process backend. Used for ephemeral sessions and tests.

use super::{PersistenceResult, SnapshotStorage};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStorage {
    blobs: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a blob already present under `key`.
    pub fn with_blob(key: impl Into<String>, blob: impl Into<String>) -> Self {
        let mut blobs = HashMap::new();
        blobs.insert(key.into(), blob.into());
        Self {
            blobs: RwLock::new(blobs),
        }
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.blobs.read().await.get(key).cloned()
    }
}

#[async_trait]
impl SnapshotStorage for MemoryStorage {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn read(&self, key: &str) -> PersistenceResult<Option<String>> {
        Ok(self.get(key).await)
    }

    async fn write(&self, key: &str, blob: &str) -> PersistenceResult<()> {
        self.blobs
            .write()
            .await
            .insert(key.to_string(), blob.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::block_on;

    #[test]
    fn seeded_blob_is_readable_and_replaceable() {
        let storage = MemoryStorage::with_blob("site", "old");
        assert_eq!(block_on(storage.read("site")).unwrap().as_deref(), Some("old"));
        assert_eq!(block_on(storage.read("other")).unwrap(), None);

        block_on(storage.write("site", "new")).unwrap();
        assert_eq!(block_on(storage.get("site")).as_deref(), Some("new"));
    }
}
