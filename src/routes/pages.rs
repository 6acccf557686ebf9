//! Public page handlers: listings, detail pages, search and the 404 page.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use crate::AppState;
use crate::constants::{
    ALBUMS_PER_PAGE, HOME_ALBUM_STRIP, NOT_FOUND_SAMPLE, RELATED_ALBUMS, RELATED_VIDEOS,
    SIDE_ALBUM_STRIP, VIDEOS_PER_PAGE,
};
use crate::domain::{cosplays, videos};
use crate::routes::page_ctx;
use crate::services::error::LogErr;
use crate::views;

#[derive(Deserialize)]
pub struct PageQuery {
    page: Option<i64>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
}

fn requested_page(query: &PageQuery) -> i64 {
    query.page.unwrap_or(1).max(1)
}

fn total_pages(total: i64, per_page: i64) -> i64 {
    (total + per_page - 1).max(per_page) / per_page
}

/// Increment a view counter off the request path. Failures are logged and
/// never affect the response.
fn spawn_view_bump(state: &Arc<AppState>, slug: &str, album: bool) {
    let db = state.db.clone();
    let slug = slug.to_string();
    tokio::spawn(async move {
        let result = if album {
            cosplays::bump_views(&db, &slug).await
        } else {
            videos::bump_views(&db, &slug).await
        };
        if let Err(e) = result {
            warn!("view bump failed for {}: {}", slug, e);
        }
    });
}

/// Render the 404 page with a handful of random videos to keep visitors on
/// the site.
pub async fn not_found_response(state: &Arc<AppState>) -> Result<Response, StatusCode> {
    let samples = videos::random_sample(&state.db, NOT_FOUND_SAMPLE)
        .await
        .log_500("404 sample query")?;
    let page = views::not_found(&page_ctx(state), &samples);
    Ok((StatusCode::NOT_FOUND, Html(page)).into_response())
}

/// Fallback for every unmatched route
pub async fn fallback(State(state): State<Arc<AppState>>) -> Result<Response, StatusCode> {
    not_found_response(&state).await
}

/// GET / - newest videos, paginated, with a strip of recent albums
pub async fn home(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, StatusCode> {
    let page = requested_page(&query);
    let offset = (page - 1) * VIDEOS_PER_PAGE;

    let (videos, total) = videos::browse(&state.db, None, None, VIDEOS_PER_PAGE, offset)
        .await
        .log_500("home video listing")?;
    let albums = cosplays::latest_filtered(&state.db, None, None, HOME_ALBUM_STRIP)
        .await
        .log_500("home album strip")?;

    Ok(Html(views::home(
        &page_ctx(&state),
        &videos,
        &albums,
        page,
        total_pages(total, VIDEOS_PER_PAGE),
    )))
}

/// GET /video/{slug} - video detail with random related videos
pub async fn video_detail(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Response, StatusCode> {
    let Some(video) = videos::find_by_slug(&state.db, &slug)
        .await
        .log_500("video lookup")?
    else {
        return not_found_response(&state).await;
    };

    spawn_view_bump(&state, &video.slug, false);

    let related = videos::random_sample(&state.db, RELATED_VIDEOS)
        .await
        .log_500("related videos query")?;
    let related: Vec<_> = related.into_iter().filter(|v| v.slug != video.slug).collect();

    let page = views::video_detail(&page_ctx(&state), &video, &related);
    Ok(Html(page).into_response())
}

/// GET /cosplay - paginated album index
pub async fn cosplay_index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, StatusCode> {
    let page = requested_page(&query);
    let offset = (page - 1) * ALBUMS_PER_PAGE;

    let (albums, total) = cosplays::page(&state.db, ALBUMS_PER_PAGE, offset)
        .await
        .log_500("album index listing")?;

    Ok(Html(views::cosplay_index(
        &page_ctx(&state),
        &albums,
        page,
        total_pages(total, ALBUMS_PER_PAGE),
    )))
}

/// GET /cosplay/{slug} - album detail with same-category related albums
pub async fn cosplay_detail(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Response, StatusCode> {
    let Some(album) = cosplays::find_by_slug(&state.db, &slug)
        .await
        .log_500("album lookup")?
    else {
        return not_found_response(&state).await;
    };

    spawn_view_bump(&state, &album.slug, true);

    let related = cosplays::related_sample(&state.db, &album.categories, &album.slug, RELATED_ALBUMS)
        .await
        .log_500("related albums query")?;

    let page = views::cosplay_detail(&page_ctx(&state), &album, &related);
    Ok(Html(page).into_response())
}

/// GET /search?q= - substring search over videos and albums
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Html<String>, StatusCode> {
    let q = query.q.unwrap_or_default();

    let videos = videos::search(&state.db, &q, VIDEOS_PER_PAGE)
        .await
        .log_500("video search")?;
    let albums = cosplays::search(&state.db, &q, SIDE_ALBUM_STRIP)
        .await
        .log_500("album search")?;

    Ok(Html(views::search_results(
        &page_ctx(&state),
        &q,
        &videos,
        &albums,
    )))
}

/// GET /tag/{tag} - videos and albums whose tags contain the keyword
pub async fn tag_page(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, StatusCode> {
    taxonomy_page(state, slug, query, true).await
}

/// GET /category/{slug} - same shape as tag pages, matching categories
pub async fn category_page(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, StatusCode> {
    taxonomy_page(state, slug, query, false).await
}

async fn taxonomy_page(
    state: Arc<AppState>,
    slug: String,
    query: PageQuery,
    by_tag: bool,
) -> Result<Html<String>, StatusCode> {
    let page = requested_page(&query);
    let offset = (page - 1) * VIDEOS_PER_PAGE;
    // Slugs store spaces as hyphens; match against the spaced form
    let keyword = slug.replace('-', " ");

    let (tag_kw, category_kw) = if by_tag {
        (Some(keyword.as_str()), None)
    } else {
        (None, Some(keyword.as_str()))
    };

    let (videos, total) = videos::browse(&state.db, tag_kw, category_kw, VIDEOS_PER_PAGE, offset)
        .await
        .log_500("taxonomy video listing")?;
    let albums = cosplays::latest_filtered(&state.db, tag_kw, category_kw, SIDE_ALBUM_STRIP)
        .await
        .log_500("taxonomy album strip")?;

    let base_path = if by_tag { "/tag" } else { "/category" };
    Ok(Html(views::taxonomy_page(
        &page_ctx(&state),
        base_path,
        &slug,
        &videos,
        &albums,
        page,
        total_pages(total, VIDEOS_PER_PAGE),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults_to_one() {
        assert_eq!(requested_page(&PageQuery { page: None }), 1);
        assert_eq!(requested_page(&PageQuery { page: Some(0) }), 1);
        assert_eq!(requested_page(&PageQuery { page: Some(-3) }), 1);
        assert_eq!(requested_page(&PageQuery { page: Some(7) }), 7);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 24), 1);
        assert_eq!(total_pages(24, 24), 1);
        assert_eq!(total_pages(25, 24), 2);
        assert_eq!(total_pages(49, 24), 3);
    }
}
