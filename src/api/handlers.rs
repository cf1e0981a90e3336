//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::backend::Store;
use crate::cache::{Cache, MAX_VALUE_SIZE};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::memo::{Fetch, HttpFetcher, PageMemo, TtlMemo};
use crate::models::{
    CallsResponse, Decode, FetchQuery, FetchResponse, HealthResponse, MemoStatsResponse,
    ReplayResponse, RetrieveQuery, RetrieveResponse, StoreRequest, StoreResponse,
};
use crate::recorder::load_trace;

/// Application state shared across all handlers.
///
/// The cache needs no outer lock: its backend serializes access itself.
#[derive(Clone)]
pub struct AppState {
    /// Instrumented cache
    pub cache: Arc<Cache>,
    /// Memoized page fetcher
    pub memo: Arc<PageMemo>,
}

impl AppState {
    /// Creates a new AppState from its parts.
    pub fn new(cache: Cache, memo: PageMemo) -> Self {
        Self {
            cache: Arc::new(cache),
            memo: Arc::new(memo),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds the cache over `backend` (flushing it) and an HTTP-backed memo.
    pub async fn from_config(config: &Config, backend: Arc<dyn Store>) -> Result<Self> {
        let cache = Cache::new(backend).await?;
        let fetcher = HttpFetcher::new(Duration::from_secs(config.fetch_timeout))?;
        let memo = TtlMemo::new(
            Arc::new(fetcher) as Arc<dyn Fetch<Output = String>>,
            Duration::from_secs(config.memo_ttl),
            config.memo_max_entries,
        );
        Ok(Self::new(cache, memo))
    }
}

/// Handler for PUT /store
///
/// Stores a value under a freshly generated key.
pub async fn store_handler(
    State(state): State<AppState>,
    Json(req): Json<StoreRequest>,
) -> Result<Json<StoreResponse>> {
    let value = req.into_value().map_err(CacheError::InvalidRequest)?;

    let key = state.cache.store(value).await?;

    Ok(Json(StoreResponse::new(key)))
}

/// Handler for GET /retrieve/:key
///
/// Retrieves a value by key, decoded as requested by `?as=`.
pub async fn retrieve_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<RetrieveQuery>,
) -> Result<Json<RetrieveResponse>> {
    let cache = &state.cache;
    let value: Option<serde_json::Value> = match query.decode {
        Decode::Raw => cache
            .retrieve_raw(&key)
            .await?
            .map(|raw| String::from_utf8_lossy(&raw).into_owned().into()),
        Decode::Text => cache.retrieve_str(&key).await?.map(Into::into),
        Decode::Int => cache.retrieve_int(&key).await?.map(Into::into),
        Decode::Float => cache.retrieve_float(&key).await?.map(Into::into),
    };

    match value {
        Some(value) => Ok(Json(RetrieveResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for GET /calls/:operation
///
/// Returns how many times an instrumented operation was invoked.
pub async fn calls_handler(
    State(state): State<AppState>,
    Path(operation): Path<String>,
) -> Result<Json<CallsResponse>> {
    let calls = state.cache.call_count(&operation).await?;

    Ok(Json(CallsResponse { operation, calls }))
}

/// Handler for GET /replay/:operation
///
/// Returns the recorded call trace of an operation.
pub async fn replay_handler(
    State(state): State<AppState>,
    Path(operation): Path<String>,
) -> Result<Json<ReplayResponse>> {
    let backend = state.cache.backend();
    let trace = load_trace(backend.as_ref(), &operation).await?;

    Ok(Json(ReplayResponse::from(trace)))
}

/// Handler for GET /fetch?url=
///
/// Returns the page at `url`, memoized for the configured TTL.
pub async fn fetch_handler(
    State(state): State<AppState>,
    Query(query): Query<FetchQuery>,
) -> Result<Json<FetchResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let content = state.memo.get(&query.url).await?;
    let access_count = state.memo.access_count(&query.url).await;

    Ok(Json(FetchResponse {
        url: query.url,
        content,
        access_count,
    }))
}

/// Handler for GET /memo/stats
///
/// Returns current memoizer statistics.
pub async fn memo_stats_handler(State(state): State<AppState>) -> Json<MemoStatsResponse> {
    Json(MemoStatsResponse::from(state.memo.stats().await))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Body size limit for PUT /store, leaving room for JSON encoding of bytes.
pub const MAX_BODY_SIZE: usize = MAX_VALUE_SIZE * 4;

#[cfg(test)]
pub(crate) mod test_support {
    //! State builders shared by handler and router tests.

    use super::*;
    use crate::backend::MemoryStore;
    use async_trait::async_trait;

    /// Returns a fixed page per URL, failing for `http://down`.
    pub struct StubPages;

    #[async_trait]
    impl Fetch for StubPages {
        type Output = String;

        async fn fetch(&self, url: &str) -> Result<String> {
            if url == "http://down" {
                return Err(CacheError::Fetch(format!("{} unreachable", url)));
            }
            Ok(format!("<html>{}</html>", url))
        }
    }

    pub async fn test_state() -> AppState {
        let cache = Cache::new(Arc::new(MemoryStore::new())).await.unwrap();
        let memo = TtlMemo::new(
            Arc::new(StubPages) as Arc<dyn Fetch<Output = String>>,
            Duration::from_secs(10),
            100,
        );
        AppState::new(cache, memo)
    }
}
