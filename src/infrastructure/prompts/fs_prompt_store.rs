use std::path::PathBuf;

use async_trait::async_trait;

use crate::application::ports::{PromptStore, PromptStoreError};
use crate::domain::DocType;

/// Prompt templates on the local filesystem: `<dir>/{doc_type}_summary.md`.
pub struct FsPromptStore {
    dir: PathBuf,
}

impl FsPromptStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Only lowercase ascii, digits, `-` and `_` may name a template. This
    /// keeps the doc type from ever escaping the prompt directory.
    fn is_valid_doc_type(doc_type: &DocType) -> bool {
        let s = doc_type.as_str();
        !s.is_empty()
            && s.chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    }
}

#[async_trait]
impl PromptStore for FsPromptStore {
    async fn load(&self, doc_type: &DocType) -> Result<String, PromptStoreError> {
        if !Self::is_valid_doc_type(doc_type) {
            return Err(PromptStoreError::TemplateNotFound(
                doc_type.as_str().to_string(),
            ));
        }

        let path = self.dir.join(doc_type.template_file_name());

        match tokio::fs::read_to_string(&path).await {
            Ok(template) => Ok(template),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(
                PromptStoreError::TemplateNotFound(doc_type.as_str().to_string()),
            ),
            Err(e) => Err(PromptStoreError::ReadFailed(e.to_string())),
        }
    }
}
