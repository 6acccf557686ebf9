//! Permanent redirects for legacy PHP-era URLs and relocated uploads.
//!
//! These paths are still indexed and linked externally, so each one answers
//! with a plain 301 to its current home.

use axum::{
    Router,
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::Deserialize;
use std::sync::Arc;

use crate::AppState;

/// Bytes that cannot appear raw in a Location header path
const UNSAFE_PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'%');

/// Same set plus '/', for single path segments
const UNSAFE_SEGMENT: &AsciiSet = &UNSAFE_PATH.add(b'/');

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/uploads/{*path}", get(uploads))
        .route("/rss.php", get(rss_php))
        .route("/sitemap.php", get(sitemap_php))
        .route("/rss-sitemap.php", get(rss_sitemap_php))
        .route("/index.php", get(index_php))
        .route("/rss-by-category.php", get(rss_by_category_php))
}

fn moved_permanently(target: &str) -> Response {
    match HeaderValue::from_str(target) {
        Ok(location) => {
            (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
        }
        Err(_) => StatusCode::BAD_REQUEST.into_response(),
    }
}

fn uploads_target(media_base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        media_base,
        utf8_percent_encode(path, UNSAFE_PATH)
    )
}

fn index_target(page: Option<&str>) -> String {
    match page {
        Some(page) => format!("/?page={}", utf8_percent_encode(page, UNSAFE_SEGMENT)),
        None => "/".to_string(),
    }
}

fn category_feed_target(slug: Option<&str>) -> String {
    match slug {
        Some(slug) => {
            let hyphenated = slug.replace(' ', "-");
            format!(
                "/rss/category/{}",
                utf8_percent_encode(&hyphenated, UNSAFE_SEGMENT)
            )
        }
        None => "/rss".to_string(),
    }
}

/// GET /uploads/{*path} - media moved to the dedicated host
async fn uploads(State(state): State<Arc<AppState>>, Path(path): Path<String>) -> Response {
    moved_permanently(&uploads_target(&state.config.media_public_url, &path))
}

async fn rss_php() -> Response {
    moved_permanently("/rss")
}

async fn sitemap_php() -> Response {
    moved_permanently("/sitemap.xml")
}

async fn rss_sitemap_php() -> Response {
    moved_permanently("/sitemap-video.xml")
}

#[derive(Deserialize)]
struct IndexQuery {
    page: Option<String>,
}

/// GET /index.php - old paginated front page
async fn index_php(Query(query): Query<IndexQuery>) -> Response {
    moved_permanently(&index_target(query.page.as_deref()))
}

#[derive(Deserialize)]
struct CategoryFeedQuery {
    slug: Option<String>,
    category: Option<String>,
}

/// GET /rss-by-category.php?slug= - old category feed, either param name
async fn rss_by_category_php(Query(query): Query<CategoryFeedQuery>) -> Response {
    let slug = query.slug.or(query.category);
    moved_permanently(&category_feed_target(slug.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uploads_keep_nested_paths() {
        assert_eq!(
            uploads_target("https://media.vitrine.example", "thumbs/clip one.jpg"),
            "https://media.vitrine.example/thumbs/clip%20one.jpg"
        );
    }

    #[test]
    fn index_preserves_page_query() {
        assert_eq!(index_target(None), "/");
        assert_eq!(index_target(Some("3")), "/?page=3");
    }

    #[test]
    fn category_feed_hyphenates_and_falls_back() {
        assert_eq!(
            category_feed_target(Some("one punch man")),
            "/rss/category/one-punch-man"
        );
        assert_eq!(category_feed_target(None), "/rss");
    }
}
