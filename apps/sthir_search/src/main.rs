use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use clap::Parser;
use serde::{Deserialize, Serialize};
use sthir_core::SearchIndex;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Parser)]
#[command(author, version, about = "Serve a sthir index over HTTP")]
pub struct Cli {
    /// Index written by `sthir build`
    #[arg(long, default_value = "index.json")]
    index: PathBuf,

    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let index = SearchIndex::load(&cli.index)
        .with_context(|| format!("load index {}", cli.index.display()))?;
    tracing::info!(documents = index.documents.len(), addr = %cli.addr, "serving index");

    let listener = TcpListener::bind(&cli.addr).await?;
    axum::serve(listener, app(AppState { index: Arc::new(index) })).await?;
    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/search", get(search))
        .route("/documents", get(documents))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Clone)]
struct AppState {
    index: Arc<SearchIndex>,
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Serialize)]
struct HitBody {
    document_id: String,
    title: String,
    score: u64,
}

#[derive(Debug, Serialize)]
struct SearchResponse {
    query: String,
    hits: Vec<HitBody>,
}

#[derive(Debug, Serialize)]
struct DocumentBody {
    document_id: String,
    title: String,
    m: usize,
    k: usize,
    chunk_size: u8,
    token_count: u64,
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, axum::http::StatusCode> {
    let hits = state.index.search(&params.q).map_err(|e| {
        tracing::error!(error = %e, "search failed");
        axum::http::StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(Json(SearchResponse {
        query: params.q,
        hits: hits
            .into_iter()
            .map(|h| HitBody { document_id: h.document_id, title: h.title, score: h.score })
            .collect(),
    }))
}

async fn documents(State(state): State<AppState>) -> Json<Vec<DocumentBody>> {
    Json(
        state
            .index
            .documents
            .iter()
            .map(|b| DocumentBody {
                document_id: b.document_id.clone(),
                title: b.title.clone(),
                m: b.m,
                k: b.k,
                chunk_size: b.chunk_size,
                token_count: b.token_count,
            })
            .collect(),
    )
}
