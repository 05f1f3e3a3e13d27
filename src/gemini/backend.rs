use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use super::types::{ApiErrorEnvelope, GenerateContentRequest, GenerateContentResponse};
use crate::config::Config;
use crate::error::{GenerationError, Result, StudioError};
use crate::{log_debug, log_error};

/// Transport for `generateContent` calls
///
/// The studio talks to exactly one capability; this trait is the seam that
/// lets tests answer requests without a network.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse>;
}

/// HTTP backend for the Gemini API
pub struct GeminiBackend {
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

impl GeminiBackend {
    /// Build a backend from configuration
    ///
    /// A missing credential is not an error here: each call reports it, so the
    /// studio can still be opened and used for uploads.
    pub fn new(config: &Config) -> Self {
        Self::with_credential(config, config.api_key())
    }

    /// Build a backend with an explicit credential instead of the environment
    pub fn with_credential(config: &Config, api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                log_error!("Failed to build HTTP client with timeout, using defaults: {}", e);
                Client::new()
            });
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    #[tracing::instrument(name = "generate_content", skip(self, request), fields(images = request.image_count()))]
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(StudioError::Configuration(
                crate::config::MISSING_API_KEY_MESSAGE.to_string(),
            ));
        };

        let api_url = format!("{}/models/{}:generateContent", self.base_url, model);
        log_debug!(
            "POST {} ({} inline images)",
            api_url,
            request.image_count()
        );

        let response = self
            .client
            .post(&api_url)
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                log_error!("Gemini request failed to send: {}", e);
                GenerationError::Failed("Could not reach the generation service.")
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorEnvelope>(&text)
                .map(|env| format!("{} {}: {}", env.error.code, env.error.status, env.error.message))
                .unwrap_or(text);
            log_error!("Gemini API request failed with status {}: {}", status, detail);

            return Err(if status == StatusCode::BAD_REQUEST {
                GenerationError::InvalidRequest.into()
            } else {
                GenerationError::Failed("The generation service returned an error.").into()
            });
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            log_error!("Failed to parse Gemini response: {}", e);
            GenerationError::Failed("The generation service sent an unreadable response.")
        })?;

        if let Some(reason) = body
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            log_debug!("Prompt blocked by service: {}", reason);
        }

        Ok(body)
    }
}
