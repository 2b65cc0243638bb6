use crate::corpus::Corpus;
use crate::error::DocumentReadError;
use crate::scorer::document_norms;
use crate::tokenizer::{analyze, AnalyzerConfig};
use crate::DocId;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocMeta {
    /// Document identifier: the file name without its extension.
    pub name: String,
    /// Where the text came from, when the document lives on disk.
    pub path: Option<PathBuf>,
}

impl DocMeta {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), path: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    pub doc_id: DocId,
    pub tf: u32,
}

/// A term together with its postings, which are sorted by `doc_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermEntry {
    pub postings: Vec<Posting>,
}

impl TermEntry {
    /// Number of distinct documents containing the term.
    pub fn document_frequency(&self) -> u32 {
        self.postings.len() as u32
    }

    pub fn tf(&self, doc_id: DocId) -> Option<u32> {
        self.postings
            .binary_search_by_key(&doc_id, |p| p.doc_id)
            .ok()
            .map(|i| self.postings[i].tf)
    }
}

/// Term dictionary plus the document set it was built over.
///
/// Immutable once built; a rebuild produces a fresh value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvertedIndex {
    pub terms: HashMap<String, TermEntry>,
    pub docs: Vec<DocMeta>,
    /// Per-document `sqrt(sum((1 + ln tf)^2))` over every indexed term.
    pub doc_norms: Vec<f64>,
}

/// Result of one build pass: the index and the documents that could not be read.
#[derive(Debug)]
pub struct IndexBuild {
    pub index: InvertedIndex,
    pub failures: Vec<DocumentReadError>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index over every document of `corpus`, in corpus order.
    ///
    /// Unreadable documents keep their slot in the document set but contribute no postings.
    pub fn build<C: Corpus + ?Sized>(corpus: &C, analyzer: &AnalyzerConfig) -> IndexBuild {
        let docs = corpus.documents().to_vec();
        let mut terms: HashMap<String, TermEntry> = HashMap::new();
        let mut failures = Vec::new();

        for (doc_id, meta) in docs.iter().enumerate() {
            let doc_id = doc_id as DocId;
            let text = match corpus.read_text(doc_id) {
                Ok(text) => text,
                Err(source) => {
                    tracing::warn!(doc = %meta.name, error = %source, "skipping unreadable document");
                    failures.push(DocumentReadError { doc: meta.name.clone(), source });
                    continue;
                }
            };
            ingest_doc(doc_id, &text, analyzer, &mut terms);
        }

        let mut index = InvertedIndex { terms, docs, doc_norms: Vec::new() };
        index.doc_norms = document_norms(&index);
        tracing::info!(
            num_docs = index.num_docs(),
            num_terms = index.terms.len(),
            failed = failures.len(),
            "index built"
        );
        IndexBuild { index, failures }
    }

    /// `N`, the size of the document set (unreadable documents included).
    pub fn num_docs(&self) -> usize {
        self.docs.len()
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn get(&self, term: &str) -> Option<&TermEntry> {
        self.terms.get(term)
    }

    pub fn document_frequency(&self, term: &str) -> u32 {
        self.terms.get(term).map_or(0, TermEntry::document_frequency)
    }

    pub fn doc(&self, doc_id: DocId) -> Option<&DocMeta> {
        self.docs.get(doc_id as usize)
    }

    /// Terms in lexicographic order.
    pub fn sorted_terms(&self) -> Vec<(&str, &TermEntry)> {
        let mut out: Vec<(&str, &TermEntry)> =
            self.terms.iter().map(|(t, e)| (t.as_str(), e)).collect();
        out.sort_unstable_by(|a, b| a.0.cmp(b.0));
        out
    }

    /// One line per term: `word=<term>(<df>)-><doc>(<tf>),<doc>(<tf>),`
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (term, entry) in self.sorted_terms() {
            let _ = write!(out, "word={term}({})->", entry.document_frequency());
            for p in &entry.postings {
                let name = self.doc(p.doc_id).map_or("?", |d| d.name.as_str());
                let _ = write!(out, "{name}({}),", p.tf);
            }
            out.push('\n');
        }
        out
    }
}

fn ingest_doc(doc_id: DocId, text: &str, analyzer: &AnalyzerConfig, terms: &mut HashMap<String, TermEntry>) {
    // Count locally first so each term gets exactly one posting per document.
    let mut tf_counts: HashMap<String, u32> = HashMap::new();
    for term in analyze(text, analyzer) {
        *tf_counts.entry(term).or_insert(0) += 1;
    }
    for (term, tf) in tf_counts {
        terms.entry(term).or_default().postings.push(Posting { doc_id, tf });
    }
}
