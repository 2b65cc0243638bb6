use crate::error::SearchError;
use crate::index::DocMeta;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// How ranked documents are rendered for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// `file://` URL of the canonical absolute path.
    FullPath,
    /// Bare document name, extension stripped.
    DocumentName,
}

impl FromStr for OutputMode {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "full_path" => Ok(Self::FullPath),
            "document_name" => Ok(Self::DocumentName),
            _ => Err(SearchError::Configuration(format!(
                "unknown output mode `{s}` (expected FULL_PATH or DOCUMENT_NAME)"
            ))),
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FullPath => f.write_str("FULL_PATH"),
            Self::DocumentName => f.write_str("DOCUMENT_NAME"),
        }
    }
}

impl OutputMode {
    pub fn render(&self, doc: &DocMeta) -> String {
        match self {
            Self::DocumentName => doc.name.clone(),
            Self::FullPath => full_path_url(doc).unwrap_or_else(|| {
                tracing::warn!(doc = %doc.name, "cannot resolve document path, using its name");
                doc.name.clone()
            }),
        }
    }
}

fn full_path_url(doc: &DocMeta) -> Option<String> {
    let path = doc.path.as_ref()?;
    let canonical = std::fs::canonicalize(path).ok()?;
    Url::from_file_path(canonical).ok().map(String::from)
}
