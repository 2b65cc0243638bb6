use anyhow::Result;
use axum::Router;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};
use vsearch_core::tokenizer::AnalyzerConfig;
use vsearch_core::{EngineConfig, ScoringMode};
use vsearch_server::{build_app, ServerConfig};
use tokio::net::TcpListener;

#[derive(Parser)]
struct Args {
    /// Directory of documents to index
    #[arg(long, default_value = "./corpus")]
    corpus: PathBuf,
    /// Only files with this extension are indexed
    #[arg(long, default_value = "txt")]
    extension: String,
    /// cosine, or legacy-double-norm to reproduce older rankings
    #[arg(long, default_value = "cosine")]
    scoring: String,
    /// Drop English stopwords from documents and queries
    #[arg(long, default_value_t = false)]
    stopwords: bool,
    /// Token required by the rebuild endpoint
    #[arg(long, env = "ADMIN_TOKEN")]
    admin_token: Option<String>,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let scoring: ScoringMode = args.scoring.parse()?;
    let config = ServerConfig {
        corpus_dir: args.corpus,
        engine: EngineConfig {
            scoring,
            analyzer: AnalyzerConfig { remove_stopwords: args.stopwords },
            extension: args.extension,
        },
        admin_token: args.admin_token,
    };
    let app: Router = build_app(config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
