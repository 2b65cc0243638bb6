pub mod corpus;
pub mod engine;
pub mod error;
pub mod index;
pub mod output;
pub mod query;
pub mod scorer;
pub mod stemmer;
pub mod tokenizer;

pub use corpus::{read_lossy, Corpus, DirectoryCorpus, MemoryCorpus};
pub use engine::{BuildReport, EngineConfig, SearchEngine};
pub use error::{DocumentReadError, Result, SearchError};
pub use index::{DocMeta, IndexBuild, InvertedIndex, Posting, TermEntry};
pub use output::OutputMode;
pub use query::QueryVector;
pub use scorer::{ScoredDoc, Scorer, ScoringMode};
pub use tokenizer::AnalyzerConfig;

pub type DocId = u32;
