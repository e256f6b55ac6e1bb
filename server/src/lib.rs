use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::StatusCode, routing::get, Json, Router};
use search_core::{build_from_path, QueryEngine, QueryOptions, RankedResult, Tokenizer, TokenizerConfig, WordTokenizer};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer, AllowOrigin};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Index options shared by the server and the debug REPL.
#[derive(Debug, Clone, clap::Args)]
pub struct IndexArgs {
    /// Raw corpus written by the parser
    #[arg(long, default_value = "./data/output/raw")]
    pub input: PathBuf,
    /// Extra stop words, one per line
    #[arg(long)]
    pub stop_words: Option<PathBuf>,
    /// Stem English terms at index and query time
    #[arg(long, default_value_t = false)]
    pub stem: bool,
    /// Ignore stop words in queries
    #[arg(long, default_value_t = false)]
    pub drop_stop_words: bool,
}

impl IndexArgs {
    /// Builds the index synchronously and hands it to a query engine.
    pub fn load_engine(&self) -> Result<QueryEngine> {
        let config = TokenizerConfig { stem: self.stem, stop_words_file: self.stop_words.clone() };
        let tokenizer: Arc<dyn Tokenizer> = Arc::new(WordTokenizer::from_config(&config)?);
        let (index, _stats) = build_from_path(&self.input, tokenizer.clone())?;
        let options = QueryOptions { drop_stop_words: self.drop_stop_words };
        Ok(QueryEngine::new(Arc::new(index), tokenizer).with_options(options))
    }
}

#[derive(Deserialize)]
pub struct WordParams {
    pub word: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { 10 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_ms: u128,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<RankedResult>,
}

#[derive(Serialize)]
pub struct DocResponse {
    #[serde(rename = "docId")]
    pub doc_id: usize,
    pub title: String,
    pub url: String,
    pub body: String,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: QueryEngine,
}

type ApiError = (StatusCode, String);

/// Builds the index, then the router. Nothing is routable until the build has finished.
pub fn build_app(index: &IndexArgs, www_root: Option<PathBuf>) -> Result<Router> {
    let engine = index.load_engine()?;
    Ok(router(engine, www_root))
}

pub fn router(engine: QueryEngine, www_root: Option<PathBuf>) -> Router {
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

    let mut app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/s", get(word_handler))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .with_state(AppState { engine });
    if let Some(root) = www_root {
        app = app.fallback_service(ServeDir::new(root));
    }
    app.layer(TraceLayer::new_for_http()).layer(cors)
}

/// `GET /s?word=...`: the bare ranked array.
pub async fn word_handler(State(state): State<AppState>, Query(params): Query<WordParams>) -> Result<Json<Vec<RankedResult>>, ApiError> {
    let Some(word) = params.word else {
        return Err((StatusCode::BAD_REQUEST, "missing `word` query parameter".into()));
    };
    let results = state.engine.search(&word).map_err(query_failed)?;
    tracing::info!(query = %word, hits = results.len(), "user search");
    Ok(Json(results))
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Result<Json<SearchResponse>, ApiError> {
    let start = std::time::Instant::now();
    let k = params.k.clamp(1, 100);
    let (total_hits, results) = state.engine.search_top(&params.q, k).map_err(query_failed)?;
    let elapsed = start.elapsed();
    tracing::info!(query = %params.q, total_hits, k, "user search");
    Ok(Json(SearchResponse { query: params.q, took_ms: elapsed.as_millis(), took_s: elapsed.as_secs_f64(), total_hits, results }))
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc_id): Path<usize>) -> Result<Json<DocResponse>, ApiError> {
    let doc = state
        .engine
        .index()
        .document(doc_id)
        .map_err(|err| (StatusCode::NOT_FOUND, err.to_string()))?;
    Ok(Json(DocResponse { doc_id, title: doc.title.clone(), url: doc.url.clone(), body: doc.body.clone() }))
}

/// A failed query only fails its own request.
fn query_failed(err: search_core::Error) -> ApiError {
    tracing::error!(error = %err, "query failed");
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}
