//! Scrape-and-normalize pipelines.
//!
//! Two source-specific extractors feed a shared flow: fetch the page, extract
//! a draft record, refuse duplicates, relocate remote media, insert the row,
//! then drop the response-cache keys whose pages just went stale. Errors stop
//! the pipeline and surface to the operator, nothing is retried.

pub mod cosplay;
pub mod fetcher;
pub mod slug;
pub mod video;

use scraper::{Html, Selector};
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use crate::cache::ResponseCache;
use crate::constants::{ALBUM_FETCH_TIMEOUT, VIDEO_FETCH_TIMEOUT};
use crate::domain::{self, cosplays, videos};
use crate::models::{CosplayAlbum, Video};
use crate::storage::{MediaStore, StorageError};
use fetcher::{FetchError, PageFetcher};

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("anti-bot challenge page detected")]
    Blocked,
    #[error("page has no usable title")]
    MissingTitle,
    #[error("already stored: {0}")]
    Duplicate(String),
    #[error("database error: {0}")]
    Store(#[from] sqlx::Error),
    #[error("media mirror failed: {0}")]
    Media(#[from] StorageError),
}

/// Cache keys that go stale when a record of the given kind is written.
const VIDEO_STALE_KEYS: [&str; 2] = ["/", "/rss"];
const ALBUM_STALE_KEYS: [&str; 2] = ["/", "/cosplay"];

/// Anti-bot interstitials serve a page with this `<title>` instead of the
/// content. Must be checked before any field extraction.
pub(crate) fn is_challenge_page(doc: &Html) -> bool {
    let Ok(selector) = Selector::parse("title") else {
        return false;
    };
    doc.select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().contains("Just a moment..."))
        .unwrap_or(false)
}

/// Ingest one video page: fetch, extract, dedup by trimmed title, mirror the
/// thumbnail, insert, invalidate the home and feed cache keys.
pub async fn ingest_video(
    db: &PgPool,
    fetcher: &PageFetcher,
    media: &MediaStore,
    cache: &ResponseCache,
    url: &str,
) -> Result<Video, ScrapeError> {
    let html = fetcher.fetch_page(url, VIDEO_FETCH_TIMEOUT).await?;
    let draft = video::extract_video(&html)?;

    if videos::find_by_title(db, &draft.title).await?.is_some() {
        return Err(ScrapeError::Duplicate(draft.title));
    }

    let thumbnail = media
        .mirror_image(draft.thumbnail_url.as_deref(), &draft.slug)
        .await?;

    // The pre-check races with concurrent ingests; the unique index makes the
    // loser surface here as a duplicate instead of a second row.
    let stored = match videos::insert(db, &draft, &thumbnail).await {
        Ok(video) => video,
        Err(e) if domain::is_unique_violation(&e) => {
            return Err(ScrapeError::Duplicate(draft.title));
        }
        Err(e) => return Err(ScrapeError::Store(e)),
    };

    cache.evict(&VIDEO_STALE_KEYS);
    info!(slug = %stored.slug, "scraped video stored");
    Ok(stored)
}

/// Ingest one album page: fetch, extract (gallery already CDN-rewritten),
/// dedup by slug, insert, invalidate the home and album index cache keys.
pub async fn ingest_cosplay(
    db: &PgPool,
    fetcher: &PageFetcher,
    cache: &ResponseCache,
    cdn_base: &str,
    url: &str,
) -> Result<CosplayAlbum, ScrapeError> {
    let html = fetcher.fetch_page(url, ALBUM_FETCH_TIMEOUT).await?;
    let draft = cosplay::extract_cosplay(&html, cdn_base)?;

    if cosplays::find_by_slug(db, &draft.slug).await?.is_some() {
        return Err(ScrapeError::Duplicate(draft.title));
    }

    let stored = match cosplays::insert(db, &draft).await {
        Ok(album) => album,
        Err(e) if domain::is_unique_violation(&e) => {
            return Err(ScrapeError::Duplicate(draft.title));
        }
        Err(e) => return Err(ScrapeError::Store(e)),
    };

    cache.evict(&ALBUM_STALE_KEYS);
    info!(slug = %stored.slug, photos = stored.gallery.len(), "scraped album stored");
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_detection_reads_the_title_tag() {
        let blocked = Html::parse_document(
            "<html><head><title>Just a moment...</title></head><body></body></html>",
        );
        assert!(is_challenge_page(&blocked));

        let fine = Html::parse_document(
            "<html><head><title>A real page</title></head><body>Just a moment... in body</body></html>",
        );
        assert!(!is_challenge_page(&fine));
    }

    // A page with no thumbnail meta tag still produces a storable draft: the
    // extractor leaves the thumbnail out and the mirror step returns an empty
    // reference instead of failing.
    #[tokio::test]
    async fn thumbnail_less_page_survives_extract_and_mirror() {
        const PAGE: &str = r#"<html><head>
            <title>Fallback Title</title>
            <meta itemprop="name" content="Clip Without Poster">
            <meta itemprop="embedURL" content="//player.example/embed/7">
            <meta itemprop="duration" content="PT2M10S">
        </head><body></body></html>"#;

        let draft = video::extract_video(PAGE).unwrap();
        assert_eq!(draft.title, "Clip Without Poster");
        assert!(draft.thumbnail_url.is_none());

        let dir = tempfile::tempdir().unwrap();
        let media = MediaStore::new(
            Some(dir.path().to_path_buf()),
            None,
            "unused".to_string(),
            "http://localhost:3000/media".to_string(),
        );
        let thumbnail = media
            .mirror_image(draft.thumbnail_url.as_deref(), &draft.slug)
            .await
            .unwrap();
        assert_eq!(thumbnail, "");
    }
}
