use async_trait::async_trait;
use reqwest::Client;

use crate::config::Config;
use crate::error::{Result, ShimError};
use crate::models::{GenerateContentRequest, GenerateContentResponse};

#[cfg(test)]
use mockall::automock;

/// Text generation capability: one opaque prompt in, generated text out
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

pub struct GeminiTransport {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiTransport {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(cfg.get_request_timeout())
            .build()
            .map_err(|e| ShimError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: cfg.gemini.api_key.clone(),
            model: cfg.gemini.model.clone(),
            base_url: cfg.gemini.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }
}

#[async_trait]
impl Generator for GeminiTransport {
    async fn generate(&self, prompt: &str) -> Result<String> {
        if self.api_key.is_empty() {
            return Err(ShimError::Generation(
                "GEMINI_API_KEY is not set".to_string(),
            ));
        }

        tracing::debug!(model = %self.model, chars = prompt.len(), "Sending generateContent request");

        let response = self
            .client
            .post(self.endpoint())
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await
            .map_err(|e| {
                // reqwest includes the URL in its message; keep the key out of logs
                let e = e.without_url();
                ShimError::Generation(format!("Failed to send request to Gemini API: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ShimError::Generation(format!(
                "Gemini API error ({status}): {body}"
            )));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            ShimError::Generation(format!("Failed to parse Gemini API response: {}", e.without_url()))
        })?;

        parsed.text().ok_or_else(|| {
            ShimError::Generation("Gemini API returned no candidate text".to_string())
        })
    }
}
