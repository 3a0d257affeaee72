//! The content store: one typed value per section, written through to
//! storage on every mutation.

use super::defaults;
use super::section::{Section, SectionKind, SectionValue};
use super::snapshot::{self, Snapshot};
use super::ContentError;
use crate::persistence::{PersistenceError, SnapshotStorage};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "lkc_site_data";

/// Where the running state came from at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSource {
    Persisted,
    /// Compiled defaults; the string says why the persisted blob was not used.
    Defaults(String),
}

/// Outcome of the write-through that follows a mutation.
///
/// A failed write never rolls back the in-memory change.
#[must_use]
#[derive(Debug)]
pub enum WriteThrough {
    Persisted,
    Failed(PersistenceError),
}

impl WriteThrough {
    pub fn is_persisted(&self) -> bool {
        matches!(self, WriteThrough::Persisted)
    }
}

pub struct ContentStore {
    state: RwLock<Snapshot>,
    storage: Arc<dyn SnapshotStorage>,
    key: String,
    source: LoadSource,
}

impl ContentStore {
    /// Seed the store from storage, falling back to compiled defaults when
    /// the blob is missing or unusable. Never fails.
    #[instrument(skip_all, fields(backend = storage.name()))]
    pub async fn load(storage: Arc<dyn SnapshotStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let (snapshot, source) = Self::read_snapshot(storage.as_ref(), &key).await;

        match &source {
            LoadSource::Persisted => info!(key = %key, "content loaded from storage"),
            LoadSource::Defaults(reason) => {
                info!(key = %key, reason = %reason, "content seeded from defaults")
            }
        }

        Self {
            state: RwLock::new(snapshot),
            storage,
            key,
            source,
        }
    }

    async fn read_snapshot(storage: &dyn SnapshotStorage, key: &str) -> (Snapshot, LoadSource) {
        let blob = match storage.read(key).await {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                return (defaults::snapshot(), LoadSource::Defaults("no saved content".into()));
            }
            Err(e) => {
                warn!(error = %e, "could not read saved content");
                return (defaults::snapshot(), LoadSource::Defaults(e.to_string()));
            }
        };

        match snapshot::decode(&blob) {
            Ok(decoded) => {
                debug!(version = decoded.version, saved_at = ?decoded.saved_at, "snapshot decoded");
                (decoded.snapshot, LoadSource::Persisted)
            }
            Err(e) => {
                warn!(error = %e, "saved content is unusable, falling back to defaults");
                (defaults::snapshot(), LoadSource::Defaults(e.to_string()))
            }
        }
    }

    pub fn load_source(&self) -> &LoadSource {
        &self.source
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Copy of the full current state.
    pub async fn snapshot(&self) -> Snapshot {
        self.state.read().await.clone()
    }

    pub async fn get_section(&self, kind: SectionKind) -> SectionValue {
        self.state.read().await.get(kind)
    }

    /// Typed read, e.g. `store.section::<HeroContent>()`.
    pub async fn section<T: Section>(&self) -> T {
        let value = self.get_section(T::KIND).await;
        match T::from_value(value) {
            Some(inner) => inner,
            None => unreachable!("snapshot returned a value of the wrong kind for {}", T::KIND),
        }
    }

    /// Replace one section wholesale and write the snapshot through.
    ///
    /// The write lock is held until the write-through finishes, so readers
    /// never observe a value that has not at least been attempted on disk and
    /// concurrent updates cannot interleave.
    #[instrument(skip(self, value), fields(key = %self.key))]
    pub async fn update_section(
        &self,
        kind: SectionKind,
        value: SectionValue,
    ) -> Result<WriteThrough, ContentError> {
        if value.kind() != kind {
            return Err(ContentError::KindMismatch {
                expected: kind,
                found: value.kind(),
            });
        }

        let mut state = self.state.write().await;
        state.set(value);
        let outcome = self.write_through(&state).await;
        debug!(section = %kind, persisted = outcome.is_persisted(), "section replaced");
        Ok(outcome)
    }

    /// Typed replace, e.g. `store.replace(hero)`.
    pub async fn replace<T: Section>(&self, value: T) -> WriteThrough {
        let mut state = self.state.write().await;
        state.set(value.into_value());
        self.write_through(&state).await
    }

    /// Replace every section with compiled defaults; persists once.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn reset_all(&self) -> WriteThrough {
        let mut state = self.state.write().await;
        *state = defaults::snapshot();
        let outcome = self.write_through(&state).await;
        warn!(persisted = outcome.is_persisted(), "all content reset to defaults");
        outcome
    }

    async fn write_through(&self, snapshot: &Snapshot) -> WriteThrough {
        let blob = match snapshot::encode(snapshot) {
            Ok(blob) => blob,
            Err(e) => {
                error!(error = %e, "snapshot serialization failed");
                return WriteThrough::Failed(e.into());
            }
        };

        let (inline_count, inline_bytes) = snapshot.inline_image_stats();
        debug!(bytes = blob.len(), inline_count, inline_bytes, "writing snapshot");

        match self.storage.write(&self.key, &blob).await {
            Ok(()) => WriteThrough::Persisted,
            Err(e) => {
                error!(
                    error = %e,
                    backend = self.storage.name(),
                    "write-through failed, keeping in-memory content"
                );
                WriteThrough::Failed(e)
            }
        }
    }
}

impl std::fmt::Debug for ContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStore")
            .field("backend", &self.storage.name())
            .field("key", &self.key)
            .field("source", &self.source)
            .finish()
    }
}
