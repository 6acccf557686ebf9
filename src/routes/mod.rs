pub mod admin;
pub mod feeds;
pub mod media;
pub mod pages;
pub mod redirects;

use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    routing::get,
};
use std::sync::Arc;
use std::time::Duration;

use crate::AppState;
use crate::cache;
use crate::constants::{TTL_ALBUM_INDEX, TTL_DETAIL, TTL_HOME, TTL_SEARCH, TTL_TAXONOMY};
use crate::views::PageContext;

/// Site values every renderer needs, borrowed from config
pub(crate) fn page_ctx(state: &AppState) -> PageContext<'_> {
    PageContext {
        site_name: &state.config.site_name,
        site_url: &state.config.site_url,
    }
}

/// Build the full route tree. Public pages are wrapped in the response cache
/// with one TTL per route class; feeds, admin, redirects and media stay
/// uncached.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cached = |ttl: Duration| {
        middleware::from_fn_with_state(
            state.clone(),
            move |state: State<Arc<AppState>>, req: Request, next: Next| {
                cache::read_through(state, req, next, ttl)
            },
        )
    };

    let home = Router::new()
        .route("/", get(pages::home))
        .route_layer(cached(TTL_HOME));
    let search = Router::new()
        .route("/search", get(pages::search))
        .route_layer(cached(TTL_SEARCH));
    let album_index = Router::new()
        .route("/cosplay", get(pages::cosplay_index))
        .route_layer(cached(TTL_ALBUM_INDEX));
    let taxonomy = Router::new()
        .route("/tag/{tag}", get(pages::tag_page))
        .route("/category/{slug}", get(pages::category_page))
        .route_layer(cached(TTL_TAXONOMY));
    let details = Router::new()
        .route("/video/{slug}", get(pages::video_detail))
        .route("/cosplay/{slug}", get(pages::cosplay_detail))
        .route_layer(cached(TTL_DETAIL));

    let feeds = Router::new()
        .route("/rss", get(feeds::rss))
        .route("/rss/category/{slug}", get(feeds::rss_category))
        .route("/sitemap.xml", get(feeds::sitemap))
        .route("/sitemap-video.xml", get(feeds::sitemap_video));

    Router::new()
        .merge(home)
        .merge(search)
        .merge(album_index)
        .merge(taxonomy)
        .merge(details)
        .merge(feeds)
        .merge(admin::routes())
        .merge(redirects::routes())
        .merge(media::routes())
        .fallback(pages::fallback)
        .with_state(state)
}
