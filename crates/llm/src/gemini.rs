//! [`LlmProvider`] implementation over the Gemini REST API.

use async_trait::async_trait;
use pipeline::{CompletionRequest, LlmError, LlmProvider, PipelineError};
use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::config::GeminiConfig;
use crate::wire::{GenerateContentRequest, GenerateContentResponse};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Hosted-model oracle backed by Gemini `generateContent`.
///
/// Holds one pooled HTTP client shared by every call.
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
    endpoint: String,
}

impl GeminiProvider {
    /// Builds the provider and its HTTP client.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: GeminiConfig) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PipelineError::configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint(),
            config,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    #[instrument(
        skip_all,
        fields(model = %self.config.model, temperature = %request.temperature)
    )]
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let body = GenerateContentRequest::from(&request);

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Transport {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "model request rejected");
            return Err(LlmError::BadStatus {
                status: status.as_u16(),
                body,
            });
        }

        let decoded: GenerateContentResponse =
            response.json().await.map_err(|e| LlmError::Decode {
                message: e.to_string(),
            })?;

        if let Some(usage) = &decoded.usage_metadata {
            debug!(
                prompt_tokens = usage.prompt_token_count,
                response_tokens = usage.candidates_token_count,
                total_tokens = usage.total_token_count,
                "model request complete"
            );
        }

        decoded.into_text()
    }
}
