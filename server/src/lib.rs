use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::StatusCode, routing::{get, post}, Json, Router};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer, AllowOrigin};
use tower_http::trace::TraceLayer;
use vsearch_core::{read_lossy, DirectoryCorpus, EngineConfig, InvertedIndex, OutputMode, SearchEngine, SearchError};

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
    #[serde(default = "default_mode")]
    pub mode: String,
}
fn default_k() -> usize { 10 }
fn default_mode() -> String { "DOCUMENT_NAME".to_string() }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    /// Documents with a positive score.
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: u32,
    pub name: String,
    pub score: f64,
    /// The document rendered in the requested output mode.
    pub location: String,
    pub snippet: Option<String>,
}

#[derive(Serialize)]
pub struct RebuildResponse {
    pub num_docs: usize,
    pub indexed: usize,
    pub num_terms: usize,
    pub failures: Vec<String>,
}

pub struct ServerConfig {
    pub corpus_dir: PathBuf,
    pub engine: EngineConfig,
    pub admin_token: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RwLock<SearchEngine<DirectoryCorpus>>>,
    pub admin_token: Option<String>,
}

type ApiError = (StatusCode, String);

fn bad_request(err: SearchError) -> ApiError {
    (StatusCode::BAD_REQUEST, err.to_string())
}

pub fn build_app(config: ServerConfig) -> Result<Router> {
    // Build the index at startup
    let corpus = DirectoryCorpus::open(&config.corpus_dir, &config.engine.extension)?;
    let (engine, report) = SearchEngine::open(corpus, config.engine);
    tracing::info!(num_docs = report.num_docs, num_terms = report.num_terms, failed = report.failures.len(), "index ready");
    let app_state = AppState {
        engine: Arc::new(RwLock::new(engine)),
        admin_token: config.admin_token,
    };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .route("/index/rebuild", post(rebuild_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Result<Json<SearchResponse>, ApiError> {
    let start = std::time::Instant::now();
    // Reject a bad mode before any scoring happens
    let mode: OutputMode = params.mode.parse().map_err(bad_request)?;

    let engine = state.engine.read();
    let ranked = engine.query(&params.q).map_err(bad_request)?;
    let total_hits = ranked.iter().filter(|d| d.score > 0.0).count();
    let k = params.k.clamp(1, 100);

    // Capture raw query terms for highlighting
    let raw_terms: Vec<String> = params
        .q
        .split_whitespace()
        .map(|s| s.to_string())
        .collect();
    let mut results: Vec<SearchHit> = Vec::new();
    for hit in ranked.into_iter().take(k) {
        if let Some(meta) = engine.doc(hit.doc_id) {
            let snippet = meta
                .path
                .as_ref()
                .and_then(|p| snippet_from_file(p, &raw_terms));
            results.push(SearchHit {
                doc_id: hit.doc_id,
                name: meta.name.clone(),
                score: hit.score,
                location: mode.render(meta),
                snippet,
            });
        }
    }

    let elapsed = start.elapsed();
    Ok(Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits, results }))
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc_id): Path<u32>) -> Result<Json<serde_json::Value>, ApiError> {
    let engine = state.engine.read();
    let meta = engine
        .doc(doc_id)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("no document {doc_id}")))?;
    let mut obj = serde_json::json!({
        "doc_id": doc_id,
        "name": meta.name,
        "path": meta.path,
    });
    if let Some(path) = &meta.path {
        if let Ok(text) = read_lossy(path) {
            obj["text"] = serde_json::Value::String(text);
        }
    }
    Ok(Json(obj))
}

/// Re-list the corpus directory and rebuild the whole index.
///
/// The build runs on the blocking pool; the write lock is only held for the swap.
async fn rebuild_handler(State(state): State<AppState>, headers: axum::http::HeaderMap) -> Result<Json<RebuildResponse>, ApiError> {
    authorize(&state, &headers)?;
    let (root, config) = {
        let engine = state.engine.read();
        (engine.corpus().root().to_path_buf(), engine.config().clone())
    };
    let (corpus, built) = tokio::task::spawn_blocking(move || {
        let corpus = DirectoryCorpus::open(&root, &config.extension)?;
        let built = InvertedIndex::build(&corpus, &config.analyzer);
        Ok::<_, SearchError>((corpus, built))
    })
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let report = state.engine.write().replace(corpus, built);
    tracing::info!(num_docs = report.num_docs, num_terms = report.num_terms, "index rebuilt");
    Ok(Json(RebuildResponse {
        num_docs: report.num_docs,
        indexed: report.indexed_docs(),
        num_terms: report.num_terms,
        failures: report.failures.iter().map(|f| f.to_string()).collect(),
    }))
}

fn snippet_from_file(path: &std::path::Path, raw_terms: &[String]) -> Option<String> {
    let text = read_lossy(path).ok()?;
    if text.is_empty() { return None; }
    // find first match (case-insensitive) of any raw term
    let first_idx = raw_terms
        .iter()
        .filter(|t| !t.trim().is_empty())
        .find_map(|t| term_regex(t).and_then(|re| re.find(&text)).map(|m| m.start()));
    let snippet = match first_idx {
        Some(idx) => {
            let start = floor_char_boundary(&text, idx.saturating_sub(100));
            let end = floor_char_boundary(&text, (idx + 200).min(text.len()));
            text[start..end].to_string()
        }
        None => text.chars().take(200).collect(),
    };
    Some(highlight_terms(&snippet, raw_terms))
}

fn floor_char_boundary(s: &str, mut idx: usize) -> usize {
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn term_regex(term: &str) -> Option<regex::Regex> {
    regex::RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
        .ok()
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap every term match in `<em>` in a single pass, HTML-escaping the document text.
///
/// Matching runs on the raw text so terms never hit inserted tags or entities.
fn highlight_terms(snippet: &str, terms: &[String]) -> String {
    let mut alts: Vec<String> = terms
        .iter()
        .filter(|t| !t.trim().is_empty())
        .map(|t| regex::escape(t))
        .collect();
    // Longest first so a term wins over its own prefix.
    alts.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    alts.dedup();
    let pat = match regex::RegexBuilder::new(&alts.join("|")).case_insensitive(true).build() {
        Ok(pat) if !alts.is_empty() => pat,
        _ => return escape_html(snippet),
    };
    let mut out = String::with_capacity(snippet.len() + 16);
    let mut last = 0;
    for m in pat.find_iter(snippet) {
        out.push_str(&escape_html(&snippet[last..m.start()]));
        out.push_str("<em>");
        out.push_str(&escape_html(m.as_str()));
        out.push_str("</em>");
        last = m.end();
    }
    out.push_str(&escape_html(&snippet[last..]));
    out
}

fn authorize(state: &AppState, headers: &axum::http::HeaderMap) -> Result<(), ApiError> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlight_wraps_matches_case_insensitively() {
        let out = highlight_terms("Rust and rust", &["RUST".to_string()]);
        assert_eq!(out, "<em>Rust</em> and <em>rust</em>");
    }

    #[test]
    fn highlight_does_not_rewrite_its_own_tags() {
        let terms = vec!["cats".to_string(), "em".to_string()];
        assert_eq!(highlight_terms("cats are great", &terms), "<em>cats</em> are great");
        let terms = vec!["cat".to_string(), "cats".to_string()];
        assert_eq!(highlight_terms("cats and a cat", &terms), "<em>cats</em> and a <em>cat</em>");
    }

    #[test]
    fn highlight_escapes_document_markup() {
        let out = highlight_terms("a <script>alert(1)</script> cat", &["cat".to_string()]);
        assert_eq!(out, "a &lt;script&gt;alert(1)&lt;/script&gt; <em>cat</em>");
        let out = highlight_terms("x < y & lt", &["lt".to_string(), "<".to_string()]);
        assert_eq!(out, "x <em>&lt;</em> y &amp; <em>lt</em>");
        let out = highlight_terms("a<b", &["lt".to_string()]);
        assert_eq!(out, "a&lt;b");
        assert_eq!(highlight_terms("plain", &[" ".to_string()]), "plain");
    }

    #[test]
    fn char_boundary_is_respected() {
        let s = "héllo";
        assert_eq!(floor_char_boundary(s, 2), 1);
        assert_eq!(floor_char_boundary(s, 3), 3);
    }
}
