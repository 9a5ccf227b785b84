use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::GenerationError;
use crate::wire::{GenerateContentRequest, GenerateContentResponse};

pub mod gemini;

#[async_trait]
pub trait Provider: Send + Sync {
    async fn generate_content(
        &self,
        req: &GenerateContentRequest,
        api_key: &str,
    ) -> Result<GenerateContentResponse, GenerationError>;
}

pub type DynProvider = Arc<dyn Provider>;

pub fn make_provider(endpoint: String) -> DynProvider {
    Arc::new(gemini::GeminiProvider::new(endpoint))
}
