//! Short-TTL response cache for public pages.
//!
//! Rendered pages and feeds are cached in memory keyed by request path and
//! query string. The cache is injected as a route layer so each route class
//! gets its own TTL. Requests from a logged-in admin bypass the cache in
//! both directions, so fresh content is visible immediately after a scrape.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use axum::body::{Body, to_bytes};
use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use tracing::error;

use crate::AppState;
use crate::services::session;

/// Upper bound when buffering a response for the cache. Feeds and sitemaps
/// are the largest pages and stay well under this.
const MAX_CACHED_BODY_BYTES: usize = 16 * 1024 * 1024;

struct CacheEntry {
    body: Bytes,
    content_type: Option<HeaderValue>,
    expires_at: Instant,
}

/// In-memory store behind the page cache middleware.
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch a live entry. Expired entries are removed on the way out.
    pub fn get(&self, key: &str) -> Option<(Bytes, Option<HeaderValue>)> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                Some((entry.body.clone(), entry.content_type.clone()))
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// True when a live entry exists for the key.
    pub fn has(&self, key: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .is_some_and(|entry| entry.expires_at > Instant::now())
    }

    pub fn set(&self, key: String, body: Bytes, content_type: Option<HeaderValue>, ttl: Duration) {
        let entry = CacheEntry {
            body,
            content_type,
            expires_at: Instant::now() + ttl,
        };
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, entry);
    }

    /// Drop specific keys, used after a scrape lands new content.
    pub fn evict(&self, keys: &[&str]) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        for key in keys {
            entries.remove(*key);
        }
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

fn should_bypass(method: &Method, headers: &HeaderMap, secret: &[u8]) -> bool {
    method != Method::GET || session::is_authenticated(headers, secret)
}

fn cache_key(req: &Request) -> String {
    req.uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string())
}

/// Middleware body: serve from the cache when possible, otherwise render and
/// store the result. Only 200 responses are cached, so error pages and
/// redirects always re-render.
pub async fn read_through(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
    ttl: Duration,
) -> Response {
    if should_bypass(req.method(), req.headers(), &state.config.session_secret) {
        return next.run(req).await;
    }

    let key = cache_key(&req);
    if let Some((body, content_type)) = state.cache.get(&key) {
        let mut response = Response::new(Body::from(body));
        if let Some(ct) = content_type {
            response.headers_mut().insert(header::CONTENT_TYPE, ct);
        }
        return response;
    }

    let response = next.run(req).await;
    if response.status() != StatusCode::OK {
        return response;
    }

    let (parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_CACHED_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("failed to buffer response for cache key {}: {}", key, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let content_type = parts.headers.get(header::CONTENT_TYPE).cloned();
    state.cache.set(key, bytes.clone(), content_type, ttl);

    Response::from_parts(parts, Body::from(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_round_trip_until_expiry() {
        let cache = ResponseCache::new();
        cache.set(
            "/".to_string(),
            Bytes::from_static(b"<html>home</html>"),
            None,
            Duration::from_secs(60),
        );

        let (body, _) = cache.get("/").unwrap();
        assert_eq!(&body[..], b"<html>home</html>");

        cache.set(
            "/stale".to_string(),
            Bytes::from_static(b"old"),
            None,
            Duration::ZERO,
        );
        assert!(cache.get("/stale").is_none());
    }

    #[test]
    fn keys_include_query_string() {
        let cache = ResponseCache::new();
        cache.set(
            "/?page=2".to_string(),
            Bytes::from_static(b"page two"),
            None,
            Duration::from_secs(60),
        );
        assert!(cache.get("/").is_none());
        assert!(cache.get("/?page=2").is_some());
    }

    #[test]
    fn evict_removes_only_named_keys() {
        let cache = ResponseCache::new();
        for key in ["/", "/rss", "/cosplay"] {
            cache.set(
                key.to_string(),
                Bytes::from_static(b"x"),
                None,
                Duration::from_secs(60),
            );
        }
        cache.evict(&["/", "/rss"]);
        assert!(!cache.has("/"));
        assert!(!cache.has("/rss"));
        assert!(cache.has("/cosplay"));
    }

    #[test]
    fn non_get_requests_bypass() {
        let headers = HeaderMap::new();
        assert!(should_bypass(&Method::POST, &headers, b"secret"));
        assert!(!should_bypass(&Method::GET, &headers, b"secret"));
    }

    #[test]
    fn admin_session_bypasses() {
        let secret = b"cache-test-secret";
        let token = session::create_session_token(secret).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            format!("admin_session={token}").parse().unwrap(),
        );
        assert!(should_bypass(&Method::GET, &headers, secret));
    }
}
