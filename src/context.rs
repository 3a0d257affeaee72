//! Everything a front end needs, constructed once and passed by reference.

use crate::admin::AdminGate;
use crate::config::Config;
use crate::content::ContentStore;
use crate::generator::{BackgroundGenerator, GeminiImageService, ImageService, ServiceError};
use crate::ingest::ImageIngest;
use crate::persistence::{FileStorage, MemoryStorage, SnapshotStorage};
use std::sync::Arc;
use tracing::info;

#[derive(Debug)]
pub struct AppContext {
    pub config: Config,
    pub store: Arc<ContentStore>,
    pub ingest: ImageIngest,
    pub generator: BackgroundGenerator,
    pub gate: AdminGate,
}

impl AppContext {
    /// Production wiring: file or memory storage per config, Gemini as the
    /// image service.
    pub async fn build(config: Config) -> Result<Self, ServiceError> {
        let storage: Arc<dyn SnapshotStorage> = match &config.storage.data_dir {
            Some(dir) => Arc::new(FileStorage::new(dir)),
            None => Arc::new(MemoryStorage::new()),
        };
        let service = Arc::new(GeminiImageService::new(&config.generator)?);
        Ok(Self::with_parts(config, storage, service).await)
    }

    /// Wire the context from explicit backends.
    pub async fn with_parts(
        config: Config,
        storage: Arc<dyn SnapshotStorage>,
        service: Arc<dyn ImageService>,
    ) -> Self {
        info!(backend = storage.name(), service = service.name(), "building app context");
        let store = ContentStore::load(storage, config.storage.key.clone()).await;

        Self {
            store: Arc::new(store),
            ingest: ImageIngest::new(config.ingest.max_upload_bytes),
            generator: BackgroundGenerator::new(service),
            gate: AdminGate::new(config.admin.password.clone()),
            config,
        }
    }
}
