use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};
use vsearch_core::tokenizer::AnalyzerConfig;
use vsearch_core::{BuildReport, DirectoryCorpus, EngineConfig, OutputMode, ScoringMode, SearchEngine};

#[derive(Parser)]
#[command(name = "vsearch")]
#[command(about = "Build a TF-IDF index over a directory of text files and rank it against queries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CorpusArgs {
    /// Directory holding the documents
    #[arg(long)]
    corpus: String,
    /// Only files with this extension are indexed
    #[arg(long, default_value = "txt")]
    extension: String,
    /// Drop English stopwords from documents and queries
    #[arg(long, default_value_t = false)]
    stopwords: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index and print the sorted dictionary
    Build {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Print the dictionary as JSON instead of `word=...` lines
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Build the index, then rank every document against a query
    Query {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Free-text query
        #[arg(long, short)]
        q: String,
        /// FULL_PATH or DOCUMENT_NAME
        #[arg(long, default_value = "DOCUMENT_NAME")]
        mode: String,
        /// cosine, or legacy-double-norm to reproduce older rankings
        #[arg(long, default_value = "cosine")]
        scoring: String,
        /// Print at most this many results
        #[arg(long)]
        k: Option<usize>,
        /// Also print scores
        #[arg(long, default_value_t = false)]
        scores: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { corpus, json } => build(&corpus, json),
        Commands::Query { corpus, q, mode, scoring, k, scores } => {
            query(&corpus, &q, &mode, &scoring, k, scores)
        }
    }
}

fn open_engine(args: &CorpusArgs, scoring: ScoringMode) -> Result<SearchEngine<DirectoryCorpus>> {
    let config = EngineConfig {
        scoring,
        analyzer: AnalyzerConfig { remove_stopwords: args.stopwords },
        extension: args.extension.clone(),
    };
    let corpus = DirectoryCorpus::open(&args.corpus, &config.extension)?;
    let (engine, report) = SearchEngine::open(corpus, config);
    log_report(&report);
    Ok(engine)
}

// Each skipped document was already logged by the build itself.
fn log_report(report: &BuildReport) {
    tracing::info!(
        num_docs = report.num_docs,
        indexed = report.indexed_docs(),
        failed = report.failures.len(),
        num_terms = report.num_terms,
        "index build complete"
    );
}

#[derive(Serialize)]
struct DictEntry<'a> {
    term: &'a str,
    df: u32,
    postings: Vec<(&'a str, u32)>,
}

fn build(args: &CorpusArgs, json: bool) -> Result<()> {
    let engine = open_engine(args, ScoringMode::default())?;
    let index = engine.index();
    if json {
        let entries: Vec<DictEntry> = index
            .sorted_terms()
            .into_iter()
            .map(|(term, entry)| DictEntry {
                term,
                df: entry.document_frequency(),
                postings: entry
                    .postings
                    .iter()
                    .filter_map(|p| index.doc(p.doc_id).map(|d| (d.name.as_str(), p.tf)))
                    .collect(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        print!("{}", index.dump());
    }
    Ok(())
}

fn query(args: &CorpusArgs, q: &str, mode: &str, scoring: &str, k: Option<usize>, scores: bool) -> Result<()> {
    // Validate options before paying for a build.
    let mode: OutputMode = mode.parse()?;
    let scoring: ScoringMode = scoring.parse()?;
    let engine = open_engine(args, scoring)?;

    let ranked = engine.query(q)?;
    let limit = k.unwrap_or(ranked.len());
    for hit in ranked.iter().take(limit) {
        let Some(meta) = engine.doc(hit.doc_id) else { continue };
        let rendered = mode.render(meta);
        if scores {
            println!("{:.6}\t{}", hit.score, rendered);
        } else {
            println!("{rendered}");
        }
    }
    Ok(())
}
