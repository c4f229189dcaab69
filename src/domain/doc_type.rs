use std::fmt;

/// Requested document type, e.g. `account` or `contract`. Selects which
/// prompt template the pipeline loads; the value itself is not validated
/// here. An unknown or malformed type surfaces as a missing template when
/// the pipeline runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocType(String);

impl DocType {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Template file name keyed by this type: `{doc_type}_summary.md`.
    pub fn template_file_name(&self) -> String {
        format!("{}_summary.md", self.0)
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
