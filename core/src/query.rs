use crate::error::{Result, SearchError};
use crate::tokenizer::{analyze, AnalyzerConfig};
use std::collections::BTreeMap;

/// Raw term frequencies of one query, keyed by term in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryVector {
    pub terms: BTreeMap<String, u32>,
}

impl QueryVector {
    /// Analyze `query` with the same pipeline used for documents.
    ///
    /// Fails with [`SearchError::EmptyQuery`] when nothing survives normalization.
    pub fn parse(query: &str, analyzer: &AnalyzerConfig) -> Result<Self> {
        let mut terms: BTreeMap<String, u32> = BTreeMap::new();
        for term in analyze(query, analyzer) {
            *terms.entry(term).or_insert(0) += 1;
        }
        if terms.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        Ok(Self { terms })
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn tf(&self, term: &str) -> u32 {
        self.terms.get(term).copied().unwrap_or(0)
    }
}
