use std::io;
use thiserror::Error;

/// A document that could not be read during a build. Recoverable: the build goes on without it.
#[derive(Debug, Error)]
#[error("failed to read document {doc}: {source}")]
pub struct DocumentReadError {
    pub doc: String,
    #[source]
    pub source: io::Error,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("query has no searchable terms")]
    EmptyQuery,

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("failed to list corpus {path}: {source}")]
    Corpus {
        path: String,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SearchError>;
