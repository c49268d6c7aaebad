use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use poetry_db::LoadMode;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use poetry_search::{AppState, PoemIndex, router};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_DATA_DIR: &str = "public";
const MAX_PAGE_SIZE: usize = 500;

/// Poetry search service: lemma, text and structural filters over a poem corpus.
#[derive(Debug, Clone, Parser)]
#[command(name = "poetry-search", version)]
struct Config {
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    host: String,
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,
    /// Directory holding poems_minimal.json and lemmas.json.
    #[arg(long, env = "POETRY_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,
    /// `mmap` or `owned`.
    #[arg(long, env = "POETRY_LOAD_MODE", default_value = "mmap", value_parser = parse_load_mode)]
    load_mode: LoadMode,
    /// Omit Cache-Control headers.
    #[arg(long = "no-cache", env = "DISABLE_CACHE")]
    disable_cache: bool,
    #[arg(long, env = "MAX_PAGE_SIZE", default_value_t = MAX_PAGE_SIZE)]
    max_page_size: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::parse();
    info!("binding to {}:{}", config.host, config.port);
    info!(
        "using data at {} (mode: {:?})",
        config.data_dir.display(),
        config.load_mode
    );
    if config.disable_cache {
        info!("cache headers disabled");
    }

    let start = Instant::now();
    let index = PoemIndex::build_from_dir(&config.data_dir, config.load_mode)?;
    info!("index built in {} ms", start.elapsed().as_millis());

    let state = AppState {
        index,
        max_page_size: config.max_page_size.max(1),
        disable_cache: config.disable_cache,
    };

    let app = router(state).layer(TraceLayer::new_for_http());
    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("bind {}:{}", config.host, config.port))?;

    axum::serve(listener, app).await?;
    Ok(())
}

fn parse_load_mode(raw: &str) -> Result<LoadMode, String> {
    match raw.to_ascii_lowercase().as_str() {
        "mmap" => Ok(LoadMode::Mmap),
        "owned" => Ok(LoadMode::Owned),
        other => Err(format!("unknown load mode {other:?}, expected mmap or owned")),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .init();
}
