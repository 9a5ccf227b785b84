use crate::errors::GenerationError;
use crate::form::FormState;
use crate::prompt;
use crate::provider::Provider;
use crate::wire::{
    GenerateContentRequest, GenerateContentResponse, GeneratedResult, PromptPayload, Source,
};

pub const MISSING_SYSTEM_PROMPT: &str = "Error parsing system prompt.";
pub const MISSING_REASONING: &str = "No reasoning provided.";

/// One generation round trip. No retry, no caching: every failure is
/// returned to the caller as-is.
pub async fn generate(
    provider: &dyn Provider,
    form: &FormState,
    manual_key: Option<&str>,
    ambient_key: Option<&str>,
) -> Result<GeneratedResult, GenerationError> {
    let api_key = manual_key
        .filter(|k| !k.is_empty())
        .or(ambient_key.filter(|k| !k.is_empty()))
        .ok_or(GenerationError::CredentialMissing)?;

    let req = GenerateContentRequest::json_with_grounding(
        form.model.as_str(),
        prompt::build_instruction(form),
    );
    let resp = provider.generate_content(&req, api_key).await?;
    parse_response(&resp)
}

pub fn parse_response(resp: &GenerateContentResponse) -> Result<GeneratedResult, GenerationError> {
    let text = resp.text().ok_or(GenerationError::EmptyResponse)?;

    let value: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;
    if !value.is_object() {
        return Err(GenerationError::MalformedResponse(format!(
            "expected a JSON object, got: {value}"
        )));
    }
    let payload: PromptPayload = serde_json::from_value(value)
        .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

    Ok(GeneratedResult {
        system_prompt: non_empty_or(payload.system_prompt, MISSING_SYSTEM_PROMPT),
        reasoning: non_empty_or(payload.reasoning, MISSING_REASONING),
        sources: extract_sources(resp),
    })
}

/// Web citations in provider order; chunks without a web source are dropped.
pub fn extract_sources(resp: &GenerateContentResponse) -> Vec<Source> {
    resp.grounding_chunks()
        .iter()
        .filter_map(|chunk| chunk.web.as_ref())
        .map(|web| Source {
            title: web.title.clone().unwrap_or_default(),
            url: web.uri.clone().unwrap_or_default(),
        })
        .collect()
}

fn non_empty_or(value: Option<String>, fallback: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ModelId;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Returns a canned response and records what it was asked.
    struct StubProvider {
        response: Result<serde_json::Value, GenerationError>,
        seen: Mutex<Vec<(String, String)>>,
    }

    impl StubProvider {
        fn ok(body: serde_json::Value) -> Self {
            Self { response: Ok(body), seen: Mutex::new(Vec::new()) }
        }

        fn text(text: &str) -> Self {
            Self::ok(json!({"candidates": [{"content": {"parts": [{"text": text}]}}]}))
        }
    }

    #[async_trait]
    impl Provider for StubProvider {
        async fn generate_content(
            &self,
            req: &GenerateContentRequest,
            api_key: &str,
        ) -> Result<GenerateContentResponse, GenerationError> {
            self.seen
                .lock()
                .unwrap()
                .push((req.model.clone(), api_key.to_string()));
            match &self.response {
                Ok(body) => Ok(serde_json::from_value(body.clone()).unwrap()),
                Err(e) => Err(e.clone()),
            }
        }
    }

    fn form() -> FormState {
        FormState {
            model: ModelId::Gemini25Flash,
            identity: "persona".into(),
            objective: "goal".into(),
            ..FormState::default()
        }
    }

    #[tokio::test]
    async fn plain_payload_without_grounding() {
        let provider = StubProvider::text(r#"{"systemPrompt":"X","reasoning":"Y"}"#);
        let result = generate(&provider, &form(), None, Some("env-key")).await.unwrap();
        assert_eq!(
            result,
            GeneratedResult {
                system_prompt: "X".into(),
                reasoning: "Y".into(),
                sources: vec![],
            }
        );
        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen[0], ("gemini-2.5-flash".to_string(), "env-key".to_string()));
    }

    #[tokio::test]
    async fn non_web_chunks_are_dropped() {
        let provider = StubProvider::ok(json!({
            "candidates": [{
                "content": {"parts": [{"text": "{\"systemPrompt\":\"X\",\"reasoning\":\"Y\"}"}]},
                "groundingMetadata": {"groundingChunks": [{"web": {"title": "T", "uri": "U"}}, {}]}
            }]
        }));
        let result = generate(&provider, &form(), Some("manual-key-xyz"), None).await.unwrap();
        assert_eq!(
            result.sources,
            vec![Source { title: "T".into(), url: "U".into() }]
        );
    }

    #[tokio::test]
    async fn manual_key_wins_over_ambient() {
        let provider = StubProvider::text(r#"{"systemPrompt":"X","reasoning":"Y"}"#);
        generate(&provider, &form(), Some("manual"), Some("env")).await.unwrap();
        assert_eq!(provider.seen.lock().unwrap()[0].1, "manual");
    }

    #[tokio::test]
    async fn empty_manual_key_falls_back_to_ambient() {
        let provider = StubProvider::text(r#"{"systemPrompt":"X","reasoning":"Y"}"#);
        generate(&provider, &form(), Some(""), Some("env")).await.unwrap();
        assert_eq!(provider.seen.lock().unwrap()[0].1, "env");
    }

    #[tokio::test]
    async fn no_key_fails_before_calling_provider() {
        let provider = StubProvider::text("{}");
        let err = generate(&provider, &form(), None, None).await.unwrap_err();
        assert_eq!(err, GenerationError::CredentialMissing);
        assert!(provider.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_text_is_empty_response() {
        let provider = StubProvider::ok(json!({"candidates": []}));
        let err = generate(&provider, &form(), Some("k"), None).await.unwrap_err();
        assert_eq!(err, GenerationError::EmptyResponse);
    }

    #[tokio::test]
    async fn invalid_json_is_malformed() {
        let provider = StubProvider::text("Sure! Here is your prompt:");
        let err = generate(&provider, &form(), Some("k"), None).await.unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn non_object_json_is_malformed() {
        let provider = StubProvider::text("[1,2,3]");
        let err = generate(&provider, &form(), Some("k"), None).await.unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn missing_fields_get_placeholders() {
        let provider = StubProvider::text(r#"{"somethingElse":true}"#);
        let result = generate(&provider, &form(), Some("k"), None).await.unwrap();
        assert_eq!(result.system_prompt, MISSING_SYSTEM_PROMPT);
        assert_eq!(result.reasoning, MISSING_REASONING);
    }

    #[tokio::test]
    async fn provider_errors_pass_through() {
        let provider = StubProvider {
            response: Err(GenerationError::Provider("Gemini API error (500)".into())),
            seen: Mutex::new(Vec::new()),
        };
        let err = generate(&provider, &form(), Some("k"), None).await.unwrap_err();
        assert_eq!(err, GenerationError::Provider("Gemini API error (500)".into()));
    }
}
