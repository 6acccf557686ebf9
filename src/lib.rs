//! Vitrine: a content aggregation site for scraped video and cosplay
//! gallery metadata.
//!
//! The server renders paginated listings, search, tag and category pages,
//! RSS and sitemap feeds, and an admin-gated scraper that ingests pages
//! from upstream sites into Postgres. Public responses sit behind a
//! short-TTL in-memory cache.

pub mod cache;
pub mod config;
pub mod constants;
pub mod domain;
pub mod models;
pub mod routes;
pub mod scrape;
pub mod services;
pub mod storage;
pub mod views;

use sqlx::PgPool;

use cache::ResponseCache;
use config::AppConfig;
use scrape::fetcher::PageFetcher;
use storage::MediaStore;

/// Shared state handed to every handler behind an `Arc`.
pub struct AppState {
    pub db: PgPool,
    pub cache: ResponseCache,
    pub media: MediaStore,
    pub fetcher: PageFetcher,
    pub config: AppConfig,
}
