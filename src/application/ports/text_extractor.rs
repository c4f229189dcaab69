use async_trait::async_trait;

/// Extracts the text content of an uploaded PDF.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, data: &[u8]) -> Result<String, TextExtractorError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TextExtractorError {
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),
    #[error("could not extract text from PDF: document contains no recoverable text")]
    NoTextFound,
}
