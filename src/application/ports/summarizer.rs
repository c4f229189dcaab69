use async_trait::async_trait;

/// Client for the external summarization endpoint: one prompt in, the
/// generated text out.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, SummarizerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SummarizerError {
    #[error("summarization credentials are not configured: {0}")]
    MissingCredentials(String),
    #[error("api request failed: {0}")]
    RequestFailed(String),
    #[error("api request failed with status {status}: {body}")]
    UpstreamFailure { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
