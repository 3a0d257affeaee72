//! `generateContent` client for Google's image models.

use super::service::{GenerateContentRequest, GenerateContentResponse, ImageService, ServiceError};
use crate::config::GeneratorConfig;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

pub struct GeminiImageService {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GeminiImageService {
    /// The client is built without a request timeout; a slow branch simply
    /// settles late.
    pub fn new(config: &GeneratorConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ServiceError::Client(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/models/{}:generateContent",
                config.api_url.trim_end_matches('/'),
                config.model
            ),
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ImageService for GeminiImageService {
    fn name(&self) -> &'static str {
        "gemini"
    }

    #[instrument(skip_all, fields(endpoint = %self.endpoint, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<GenerateContentResponse, ServiceError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateContentRequest::image_prompt(prompt))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ServiceError::Transport(
                        "Request timeout - the API took too long to respond".to_string(),
                    )
                } else if e.is_connect() {
                    ServiceError::Transport(
                        "Connection error - unable to reach the API".to_string(),
                    )
                } else {
                    ServiceError::Transport(format!("Network error: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            let message = match status.as_u16() {
                400 => format!("Request rejected: {}", error_text),
                401 | 403 => "Authentication failed - check your API key".to_string(),
                429 => "Rate limit exceeded - too many requests".to_string(),
                500..=599 => format!("Server error ({}): {}", status, error_text),
                _ => format!("HTTP error {}: {}", status, error_text),
            };
            return Err(ServiceError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))?;

        debug!(candidates = body.candidates.len(), "generation response received");
        Ok(body)
    }
}
