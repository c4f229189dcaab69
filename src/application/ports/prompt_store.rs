use async_trait::async_trait;

use crate::domain::DocType;

/// Source of prompt templates, keyed by document type.
#[async_trait]
pub trait PromptStore: Send + Sync {
    async fn load(&self, doc_type: &DocType) -> Result<String, PromptStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PromptStoreError {
    #[error("no prompt template found for document type '{0}' (expected {0}_summary.md)")]
    TemplateNotFound(String),
    #[error("failed to read prompt template: {0}")]
    ReadFailed(String),
}
