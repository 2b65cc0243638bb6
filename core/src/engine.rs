use crate::corpus::Corpus;
use crate::error::{DocumentReadError, Result};
use crate::index::{DocMeta, IndexBuild, InvertedIndex};
use crate::output::OutputMode;
use crate::query::QueryVector;
use crate::scorer::{ScoredDoc, Scorer, ScoringMode};
use crate::tokenizer::AnalyzerConfig;
use crate::DocId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub scoring: ScoringMode,
    pub analyzer: AnalyzerConfig,
    /// Extension admitted by directory corpora, without the dot.
    pub extension: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringMode::default(),
            analyzer: AnalyzerConfig::default(),
            extension: "txt".to_string(),
        }
    }
}

/// Outcome of [`SearchEngine::build`].
#[derive(Debug)]
pub struct BuildReport {
    pub num_docs: usize,
    pub num_terms: usize,
    pub failures: Vec<DocumentReadError>,
}

impl BuildReport {
    pub fn indexed_docs(&self) -> usize {
        self.num_docs - self.failures.len()
    }
}

/// One search session: a corpus, its current index and the settings used for both.
///
/// Builds replace the index wholesale. Callers must not build and query the
/// same engine concurrently; wrap it in a lock if it is shared.
pub struct SearchEngine<C> {
    corpus: C,
    config: EngineConfig,
    index: InvertedIndex,
}

impl<C: Corpus> SearchEngine<C> {
    pub fn new(corpus: C, config: EngineConfig) -> Self {
        Self { corpus, config, index: InvertedIndex::new() }
    }

    /// Create the engine and build its index straight away.
    pub fn open(corpus: C, config: EngineConfig) -> (Self, BuildReport) {
        let mut engine = Self::new(corpus, config);
        let report = engine.build();
        (engine, report)
    }

    pub fn build(&mut self) -> BuildReport {
        let built = InvertedIndex::build(&self.corpus, &self.config.analyzer);
        self.install(built)
    }

    /// Swap in a new corpus and rebuild against it.
    pub fn rebuild_with(&mut self, corpus: C) -> BuildReport {
        self.corpus = corpus;
        self.build()
    }

    /// Install an index that was built elsewhere over `corpus`.
    ///
    /// Lets a shared engine be rebuilt without holding its lock for the whole build.
    pub fn replace(&mut self, corpus: C, built: IndexBuild) -> BuildReport {
        self.corpus = corpus;
        self.install(built)
    }

    fn install(&mut self, built: IndexBuild) -> BuildReport {
        self.index = built.index;
        tracing::debug!("dictionary:\n{}", self.index.dump());
        BuildReport {
            num_docs: self.index.num_docs(),
            num_terms: self.index.num_terms(),
            failures: built.failures,
        }
    }

    /// Every document of the current index, best match first.
    pub fn query(&self, text: &str) -> Result<Vec<ScoredDoc>> {
        let query = QueryVector::parse(text, &self.config.analyzer)?;
        Ok(Scorer::new(&self.index, self.config.scoring).rank(&query))
    }

    /// Rank and render the results in `mode`.
    pub fn search(&self, text: &str, mode: OutputMode) -> Result<Vec<String>> {
        let ranked = self.query(text)?;
        Ok(ranked
            .iter()
            .filter_map(|d| self.index.doc(d.doc_id))
            .map(|meta| mode.render(meta))
            .collect())
    }

    /// Like [`search`](Self::search) but with the mode given as text, e.g. from a request.
    pub fn search_with_mode(&self, text: &str, mode: &str) -> Result<Vec<String>> {
        let mode: OutputMode = mode.parse()?;
        self.search(text, mode)
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn doc(&self, doc_id: DocId) -> Option<&DocMeta> {
        self.index.doc(doc_id)
    }

    pub fn corpus(&self) -> &C {
        &self.corpus
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
