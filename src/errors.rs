use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Access Denied: No API Key provided. Please enter a valid Gemini API Key.")] CredentialMissing,
    #[error("No response generated from Gemini")] EmptyResponse,
    #[error("malformed response: {0}")] MalformedResponse(String),
    #[error("{0}")] Provider(String),
    #[error("generation cancelled")] Cancelled,
}

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("clipboard not available")] Unavailable,
    #[error("failed to copy to clipboard: {0}")] Write(String),
}
