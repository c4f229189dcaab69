use std::fmt;

use super::DocumentId;

/// Location of an uploaded PDF inside the staging store: `{file_id}.pdf`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePath(String);

impl StoragePath {
    pub fn for_upload(document_id: &DocumentId) -> Self {
        Self(format!("{}.pdf", document_id.as_uuid()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
