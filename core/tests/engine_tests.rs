use proptest::prelude::*;
use std::fs;
use tempfile::tempdir;
use vsearch_core::{
    Corpus, DirectoryCorpus, EngineConfig, InvertedIndex, MemoryCorpus, OutputMode, ScoringMode,
    SearchEngine, SearchError,
};
use vsearch_core::tokenizer::AnalyzerConfig;

fn pets() -> SearchEngine<MemoryCorpus> {
    let corpus = MemoryCorpus::from_pairs([
        ("cats.txt", "cat cats catlike catty"),
        ("dog.txt", "dog dogs"),
    ]);
    let (engine, report) = SearchEngine::open(corpus, EngineConfig::default());
    assert!(report.failures.is_empty());
    engine
}

#[test]
fn plural_query_matches_stemmed_document() {
    let engine = pets();
    assert_eq!(engine.index().document_frequency("cat"), 1);

    let ranked = engine.query("cats").unwrap();
    let names: Vec<&str> = ranked
        .iter()
        .map(|d| engine.doc(d.doc_id).unwrap().name.as_str())
        .collect();
    assert_eq!(names, vec!["cats", "dog"]);
    assert!(ranked[0].score > 0.0);
    assert_eq!(ranked[1].score, 0.0);

    let rendered = engine.search("cats", OutputMode::DocumentName).unwrap();
    assert_eq!(rendered, vec!["cats", "dog"]);
}

#[test]
fn empty_query_is_rejected_before_scoring() {
    let engine = pets();
    assert!(matches!(engine.query(""), Err(SearchError::EmptyQuery)));
    assert!(matches!(engine.query(" 42 ... "), Err(SearchError::EmptyQuery)));
}

#[test]
fn out_of_vocabulary_terms_are_ignored() {
    let engine = pets();
    let only_unknown = engine.query("xyzzy").unwrap();
    assert!(only_unknown.iter().all(|d| d.score == 0.0));

    let mixed = engine.query("xyzzy cats").unwrap();
    let plain = engine.query("cats").unwrap();
    assert_eq!(mixed, plain);
}

#[test]
fn unknown_output_mode_is_a_configuration_error() {
    let engine = pets();
    let err = engine.search_with_mode("cats", "TITLE_CASE").unwrap_err();
    assert!(matches!(err, SearchError::Configuration(_)));
    assert_eq!(
        engine.search_with_mode("cats", "DOCUMENT_NAME").unwrap(),
        vec!["cats", "dog"]
    );
}

#[test]
fn directory_corpus_end_to_end() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("hobbit.txt"), "Bilbo Baggins and the ring.\nThe ring of power").unwrap();
    fs::write(dir.path().join("dune.txt"), "Spice must flow on Arrakis").unwrap();
    fs::write(dir.path().join("ignored.md"), "ring ring ring").unwrap();

    let corpus = DirectoryCorpus::open(dir.path(), "txt").unwrap();
    let (engine, report) = SearchEngine::open(corpus, EngineConfig::default());
    assert_eq!(report.num_docs, 2);

    let names = engine.search("Rings", OutputMode::DocumentName).unwrap();
    assert_eq!(names, vec!["hobbit", "dune"]);

    let urls = engine.search("rings", OutputMode::FullPath).unwrap();
    assert!(urls[0].starts_with("file://") && urls[0].ends_with("hobbit.txt"), "{}", urls[0]);
}

#[test]
fn document_removed_after_listing_is_skipped() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "apple pie").unwrap();
    fs::write(dir.path().join("b.txt"), "banana bread").unwrap();
    let corpus = DirectoryCorpus::open(dir.path(), "txt").unwrap();
    fs::remove_file(dir.path().join("a.txt")).unwrap();

    let (engine, report) = SearchEngine::open(corpus, EngineConfig::default());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].doc, "a");
    assert_eq!(report.indexed_docs(), 1);
    assert_eq!(engine.index().document_frequency("banana"), 1);
    assert!(engine.index().get("appl").is_none());
}

#[test]
fn rebuild_replaces_the_index() {
    let mut engine = pets();
    let report = engine.rebuild_with(MemoryCorpus::from_pairs([("birds.txt", "bird birds")]));
    assert_eq!(report.num_docs, 1);
    assert!(engine.index().get("cat").is_none());
    assert_eq!(engine.index().document_frequency("bird"), 1);
}

#[test]
fn replace_installs_an_index_built_outside_the_engine() {
    let mut engine = pets();
    let corpus = MemoryCorpus::from_pairs([("fish.txt", "fish fishes"), ("owl.txt", "owl")]);
    let built = InvertedIndex::build(&corpus, &engine.config().analyzer);
    let report = engine.replace(corpus, built);
    assert_eq!(report.num_docs, 2);
    assert_eq!(report.indexed_docs(), 2);
    assert!(engine.index().get("cat").is_none());
    assert_eq!(engine.corpus().documents().len(), 2);
    assert_eq!(engine.search("fish", OutputMode::DocumentName).unwrap(), vec!["fish", "owl"]);
}

#[test]
fn legacy_scoring_divides_by_the_norm_again() {
    let corpus = MemoryCorpus::from_pairs([
        ("long.txt", "tea tea kettle stove pot cup saucer spoon"),
        ("short.txt", "tea"),
        ("other.txt", "coffee"),
    ]);
    let cosine = SearchEngine::open(corpus.clone(), EngineConfig::default()).0;
    let legacy = SearchEngine::open(
        corpus,
        EngineConfig { scoring: ScoringMode::LegacyDoubleNorm, ..EngineConfig::default() },
    )
    .0;
    let c = cosine.search("tea", OutputMode::DocumentName).unwrap();
    let l = legacy.search("tea", OutputMode::DocumentName).unwrap();
    assert_eq!(c, vec!["short", "long", "other"]);
    assert_eq!(l, vec!["short", "long", "other"]);
    let cs = cosine.query("tea").unwrap();
    let ls = legacy.query("tea").unwrap();
    assert!(ls[1].score < cs[1].score);
}

#[test]
fn stopword_filtering_applies_to_queries_too() {
    let corpus = MemoryCorpus::from_pairs([("a.txt", "the fox"), ("b.txt", "the hound")]);
    let config = EngineConfig {
        analyzer: AnalyzerConfig { remove_stopwords: true },
        ..EngineConfig::default()
    };
    let (engine, _) = SearchEngine::open(corpus, config);
    assert!(engine.index().get("the").is_none());
    assert!(matches!(engine.query("the of"), Err(SearchError::EmptyQuery)));
}

fn corpus_strategy() -> impl Strategy<Value = Vec<String>> {
    let word = prop::sample::select(vec![
        "cat", "cats", "dog", "dogs", "running", "runs", "happy", "tree", "trees", "relational",
        "x1", "--", "Quick", "brown", "fox", "the",
    ]);
    let doc = prop::collection::vec(word, 0..12).prop_map(|ws| ws.join(" "));
    prop::collection::vec(doc, 1..8)
}

fn memory(docs: &[String]) -> MemoryCorpus {
    let names: Vec<String> = (0..docs.len()).map(|i| format!("d{i}.txt")).collect();
    MemoryCorpus::from_pairs(names.iter().map(String::as_str).zip(docs.iter().map(String::as_str)))
}

proptest! {
    #[test]
    fn document_frequency_matches_postings(docs in corpus_strategy()) {
        let built = InvertedIndex::build(&memory(&docs), &AnalyzerConfig::default()).index;
        for (term, entry) in &built.terms {
            prop_assert!(!term.is_empty());
            let mut ids: Vec<u32> = entry.postings.iter().map(|p| p.doc_id).collect();
            let n = ids.len();
            ids.dedup();
            prop_assert_eq!(ids.len(), n);
            prop_assert_eq!(entry.document_frequency() as usize, n);
            prop_assert!(entry.postings.iter().all(|p| p.tf >= 1));
        }
    }

    #[test]
    fn building_twice_gives_the_same_index(docs in corpus_strategy()) {
        let corpus = memory(&docs);
        let a = InvertedIndex::build(&corpus, &AnalyzerConfig::default()).index;
        let b = InvertedIndex::build(&corpus, &AnalyzerConfig::default()).index;
        prop_assert_eq!(&a.terms, &b.terms);
        prop_assert_eq!(&a.docs, &b.docs);
        let bits = |v: &[f64]| v.iter().map(|n| n.to_bits()).collect::<Vec<_>>();
        prop_assert_eq!(bits(&a.doc_norms), bits(&b.doc_norms));
    }

    #[test]
    fn ranking_is_non_negative_descending_and_stable(
        docs in corpus_strategy(),
        query in prop::sample::select(vec!["cat", "dogs run", "happy trees", "fox fox xyzzy"]),
    ) {
        let (engine, _) = SearchEngine::open(memory(&docs), EngineConfig::default());
        let ranked = engine.query(query).unwrap();
        prop_assert_eq!(ranked.len(), docs.len());
        for d in &ranked {
            prop_assert!(d.score >= 0.0);
        }
        for w in ranked.windows(2) {
            prop_assert!(w[0].score >= w[1].score);
            if w[0].score == w[1].score {
                prop_assert!(w[0].doc_id < w[1].doc_id);
            }
        }
    }
}
