//! AI background generation for the hero section.
//!
//! ```text
//! hero heading ─▶ 3 style prompts ─▶ join_all(ImageService::generate) ─▶ successful candidates
//! ```
//!
//! The operator picks one candidate and adopts it into the hero section
//! through the content store; nothing here writes content.

pub mod gemini;
pub mod orchestrator;
pub mod prompts;
pub mod service;

pub use gemini::GeminiImageService;
pub use orchestrator::{
    BackgroundGenerator, GenerateError, GeneratedImageCandidate, GenerationReport,
    GenerationStatus,
};
pub use prompts::StyleVariant;
pub use service::{extract_inline_image, GenerateContentResponse, ImageService, ServiceError};

#[cfg(test)]
mod tests;
