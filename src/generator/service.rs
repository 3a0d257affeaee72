//! The external image-generation seam and its wire format.

use crate::content::image::{ImageRefError, InlineImage, DEFAULT_IMAGE_MIME};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a single generation call produced no usable image.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("failed to create HTTP client: {0}")]
    Client(String),

    #[error("{0}")]
    Transport(String),

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("failed to parse API response as JSON: {0}")]
    Decode(String),

    #[error(
        "response carried no image (finish reason: {})",
        .finish_reason.as_deref().unwrap_or("none")
    )]
    NoImage { finish_reason: Option<String> },

    #[error("response image is unusable: {0}")]
    BadImage(#[from] ImageRefError),
}

#[async_trait]
pub trait ImageService: Send + Sync {
    fn name(&self) -> &'static str;

    /// Issue one generation request for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<GenerateContentResponse, ServiceError>;
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// Single text prompt asking for an image-only reply.
    pub fn image_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                role: None,
                parts: vec![Part::text(prompt)],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE".to_string()],
            },
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<Blob>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn image(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(Blob {
                mime_type: Some(mime_type.into()),
                data: data.into(),
            }),
        }
    }
}

/// Base64 payload as returned by the service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    #[serde(default)]
    pub mime_type: Option<String>,
    pub data: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Convenience for stubs: one candidate with the given parts.
    pub fn with_parts(parts: Vec<Part>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(Content { role: None, parts }),
                finish_reason: Some("STOP".to_string()),
            }],
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// First candidate, first part carrying inline data. Anything else (no
/// candidates, text only, bad base64) is a failure for this branch.
pub fn extract_inline_image(
    response: &GenerateContentResponse,
) -> Result<InlineImage, ServiceError> {
    let candidate = response
        .candidates
        .first()
        .ok_or(ServiceError::NoImage { finish_reason: None })?;

    let blob = candidate
        .content
        .iter()
        .flat_map(|c| c.parts.iter())
        .find_map(|p| p.inline_data.as_ref())
        .ok_or_else(|| ServiceError::NoImage {
            finish_reason: candidate.finish_reason.clone(),
        })?;

    // Keep the MIME type the service reports; models may return JPEG or
    // WebP, and labelling those `image/png` would produce a wrong data URI.
    // PNG is only assumed when the reply leaves it out.
    let mime = blob
        .mime_type
        .as_deref()
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_IMAGE_MIME);
    Ok(InlineImage::from_base64(mime, &blob.data)?)
}
