use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::errors::GenerationError;
use crate::wire::{GenerateContentRequest, GenerateContentResponse};

/// Gemini `generateContent` over plain HTTPS. No timeout and no retry:
/// the call resolves or fails purely on the provider's behaviour.
pub struct GeminiProvider {
    endpoint: String,
    client: Client,
}

impl GeminiProvider {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    fn url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, model)
    }
}

#[async_trait]
impl super::Provider for GeminiProvider {
    async fn generate_content(
        &self,
        req: &GenerateContentRequest,
        api_key: &str,
    ) -> Result<GenerateContentResponse, GenerationError> {
        let url = self.url(&req.model);
        debug!(model = %req.model, %url, "POST generateContent");

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(req)
            .send()
            .await
            .map_err(|e| GenerationError::Provider(format!("request to Gemini failed: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| GenerationError::Provider(format!("reading Gemini response failed: {e}")))?;

        debug!(%status, bytes = text.len(), "generateContent returned");

        if !status.is_success() {
            return Err(GenerationError::Provider(format!(
                "Gemini API error ({}): {}",
                status, text
            )));
        }

        serde_json::from_str(&text).map_err(|e| {
            GenerationError::Provider(format!("failed to parse Gemini response: {e}"))
        })
    }
}
