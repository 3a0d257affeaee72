//! Settle-all fan-out over the style prompts.
//!
//! Every branch owns one reserved output slot. Branches run concurrently on
//! the calling task and are joined at a single barrier; a failed branch leaves
//! its slot empty and never affects the others.

use super::prompts::{self, StyleVariant};
use super::service::{extract_inline_image, ImageService, ServiceError};
use crate::busy::BusyFlag;
use crate::content::image::InlineImage;
use crate::content::store::ContentStore;
use crate::content::types::HeroContent;
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("a generation run is already in progress")]
    Busy,

    #[error("Failed to generate images. Please try again. ({attempted} attempts)")]
    AllVariantsFailed { attempted: usize },
}

/// One successful branch.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImageCandidate {
    pub style: StyleVariant,
    pub image: InlineImage,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Successful candidates only. Order is not meaningful.
    pub candidates: Vec<GeneratedImageCandidate>,
    pub attempted: usize,
    pub failed: usize,
}

impl GenerationReport {
    /// Some, but not all, branches failed.
    pub fn is_partial(&self) -> bool {
        self.failed > 0 && !self.candidates.is_empty()
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum GenerationStatus {
    Idle,
    Generating,
    Completed { candidates: usize, failed: usize },
    Failed { attempted: usize },
}

#[derive(Debug, Default)]
struct GeneratorState {
    results: Vec<GeneratedImageCandidate>,
    last: Option<GenerationStatus>,
}

pub struct BackgroundGenerator {
    service: Arc<dyn ImageService>,
    busy: BusyFlag,
    state: RwLock<GeneratorState>,
}

impl BackgroundGenerator {
    pub fn new(service: Arc<dyn ImageService>) -> Self {
        Self {
            service,
            busy: BusyFlag::new(),
            state: RwLock::new(GeneratorState::default()),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_set()
    }

    /// Candidates of the last completed run; empty while a run is in flight.
    pub async fn results(&self) -> Vec<GeneratedImageCandidate> {
        self.state.read().await.results.clone()
    }

    pub async fn status(&self) -> GenerationStatus {
        if self.busy.is_set() {
            return GenerationStatus::Generating;
        }
        self.state.read().await.last.unwrap_or(GenerationStatus::Idle)
    }

    /// Generate one background per style for `context`.
    ///
    /// Returns only once every branch has settled. Rejected without issuing
    /// any request if a run is already in progress.
    #[instrument(skip(self), fields(service = self.service.name()))]
    pub async fn generate(&self, context: &str) -> Result<GenerationReport, GenerateError> {
        let _guard = self.busy.try_claim().ok_or(GenerateError::Busy)?;
        self.state.write().await.results.clear();

        let branches = prompts::build_all(context)
            .into_iter()
            .map(|(style, prompt)| self.run_branch(style, prompt));
        let slots: Vec<Option<GeneratedImageCandidate>> = join_all(branches).await;

        let attempted = slots.len();
        let candidates: Vec<_> = slots.into_iter().flatten().collect();
        let failed = attempted - candidates.len();

        let mut state = self.state.write().await;
        if candidates.is_empty() {
            warn!(attempted, "every style variant failed");
            state.last = Some(GenerationStatus::Failed { attempted });
            return Err(GenerateError::AllVariantsFailed { attempted });
        }

        info!(succeeded = candidates.len(), failed, "backgrounds generated");
        state.results = candidates.clone();
        state.last = Some(GenerationStatus::Completed {
            candidates: candidates.len(),
            failed,
        });

        Ok(GenerationReport {
            candidates,
            attempted,
            failed,
        })
    }

    /// Same as [`generate`](Self::generate), using the hero heading as
    /// context. The store is only read.
    pub async fn generate_from_hero(
        &self,
        store: &ContentStore,
    ) -> Result<GenerationReport, GenerateError> {
        let hero: HeroContent = store.section().await;
        self.generate(&hero.heading_text).await
    }

    async fn run_branch(
        &self,
        style: StyleVariant,
        prompt: String,
    ) -> Option<GeneratedImageCandidate> {
        let outcome = self
            .service
            .generate(&prompt)
            .await
            .and_then(|response| extract_inline_image(&response));

        match outcome {
            Ok(image) => Some(GeneratedImageCandidate { style, image }),
            Err(e) => {
                log_branch_failure(style, &e);
                None
            }
        }
    }
}

fn log_branch_failure(style: StyleVariant, error: &ServiceError) {
    warn!(style = %style, error = %error, "Failed to generate one image variation");
}

impl std::fmt::Debug for BackgroundGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundGenerator")
            .field("service", &self.service.name())
            .field("busy", &self.busy.is_set())
            .finish()
    }
}
