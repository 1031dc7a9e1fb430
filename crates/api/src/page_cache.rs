//! Page cache for the index listing.
//!
//! Rendered responses are kept for a fixed time under
//! `<prefix>:<path and query>`, so every page number is cached on its own.
//! Writes elsewhere never touch the cache: entries only go away when they
//! expire or when [`PageCache::clear`] is called.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::RwLock;
use yatube_common::AppError;

/// Key prefix of cached index pages.
pub const INDEX_KEY_PREFIX: &str = "index_page";

/// Default lifetime of a cached page.
pub const DEFAULT_TTL: Duration = Duration::from_secs(20);

/// A stored response.
#[derive(Debug, Clone)]
struct CachedPage {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    stored_at: Instant,
}

impl CachedPage {
    fn to_response(&self) -> Response {
        let mut response = (self.status, self.body.clone()).into_response();
        *response.headers_mut() = self.headers.clone();
        response
    }
}

/// In-process page cache.
#[derive(Clone)]
pub struct PageCache {
    entries: Arc<RwLock<HashMap<String, CachedPage>>>,
    ttl: Duration,
}

impl Default for PageCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl PageCache {
    /// Create a cache whose entries live for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Lifetime of an entry.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cache key for a request target.
    #[must_use]
    pub fn key(prefix: &str, path_and_query: &str) -> String {
        format!("{prefix}:{path_and_query}")
    }

    /// A fresh stored response, if any.
    pub async fn get(&self, key: &str) -> Option<Response> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|page| page.stored_at.elapsed() < self.ttl)
            .map(CachedPage::to_response)
    }

    async fn insert(&self, key: String, status: StatusCode, headers: HeaderMap, body: Bytes) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            CachedPage {
                status,
                headers,
                body,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
        tracing::info!("Cleared page cache");
    }

    /// Drop expired entries.
    pub async fn purge_expired(&self) {
        let mut entries = self.entries.write().await;
        let ttl = self.ttl;
        entries.retain(|_, page| page.stored_at.elapsed() < ttl);
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Serve `GET` requests from the cache, storing successful responses.
pub async fn cache_index_middleware(
    State(cache): State<PageCache>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if req.method() != Method::GET {
        return next.run(req).await;
    }

    let target = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.uri().path().to_string(), ToString::to_string);
    let key = PageCache::key(INDEX_KEY_PREFIX, &target);

    if let Some(response) = cache.get(&key).await {
        tracing::debug!(key = %key, "Page cache hit");
        return response;
    }

    let response = next.run(req).await;
    if !response.status().is_success() {
        return response;
    }

    let (parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => return AppError::Internal(format!("Failed to buffer page: {e}")).into_response(),
    };

    cache
        .insert(key.clone(), parts.status, parts.headers.clone(), bytes.clone())
        .await;
    tracing::debug!(key = %key, "Page cache store");

    Response::from_parts(parts, Body::from(bytes))
}
