//! HTTP query service: search page, JSON search endpoint, health check.

use crate::aggregator::Aggregator;
use crate::stores::Offer;
use anyhow::{Context, Result};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

const INDEX_HTML: &str = include_str!("index.html");

/// Rejections surfaced to callers, distinct from an empty result.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("missing required query parameter 'q'")]
    Missing,
    #[error("query parameter 'q' must not be blank")]
    Blank,
    #[error("malformed query string: {0}")]
    Malformed(String),
}

impl From<QueryRejection> for QueryError {
    fn from(rejection: QueryRejection) -> Self {
        QueryError::Malformed(rejection.body_text())
    }
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// Raw `/search` query string.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

impl SearchParams {
    /// Returns the trimmed search term, rejecting absent or blank input.
    pub fn validated(self) -> Result<String, QueryError> {
        let q = self.q.ok_or(QueryError::Missing)?;
        let q = q.trim();
        if q.is_empty() {
            return Err(QueryError::Blank);
        }
        Ok(q.to_string())
    }
}

/// Builds the service router over a shared aggregator.
pub fn router(aggregator: Aggregator) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/search", get(search))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(aggregator)
}

/// Serves the router on all interfaces at `port` until the process exits.
pub async fn serve(aggregator: Aggregator, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener =
        TcpListener::bind(addr).await.with_context(|| format!("Failed to bind {}", addr))?;
    serve_on(listener, aggregator).await
}

/// Serves the router on an already bound listener.
pub async fn serve_on(listener: TcpListener, aggregator: Aggregator) -> Result<()> {
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(aggregator)).await.context("Server error")
}

/// GET / - search page.
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /search?q= - offers across all stores, cheapest first.
async fn search(
    State(aggregator): State<Aggregator>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<Offer>>, QueryError> {
    let Query(params) = params?;
    let query = params.validated()?;
    debug!("search: {}", query);

    Ok(Json(aggregator.aggregate(&query).await))
}

/// GET /health - liveness check.
async fn health() -> &'static str {
    "ok"
}
