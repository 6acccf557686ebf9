//! Shared data models used across modules

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

/// A stored video record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Video {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub embed_url: String,
    /// Public URL of the mirrored thumbnail, empty when the source had none
    pub thumbnail: String,
    /// Raw ISO-8601 duration as scraped, e.g. "PT1H2M3S"
    pub duration: String,
    pub duration_sec: i32,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub views: i64,
    pub created_at: DateTime<Utc>,
}

/// Download mirrors offered on an album page, keyed by provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DownloadLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mediafire: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sorafolder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gofile: Option<String>,
}

impl DownloadLinks {
    pub fn is_empty(&self) -> bool {
        self.mediafire.is_none()
            && self.telegram.is_none()
            && self.sorafolder.is_none()
            && self.gofile.is_none()
    }
}

/// A stored cosplay album record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CosplayAlbum {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub cosplayer: String,
    pub character_name: String,
    /// Game or anime the character appears in
    pub source_work: String,
    /// CDN-rewritten image URLs, first entry doubles as the cover
    pub gallery: Vec<String>,
    pub downloads: Json<DownloadLinks>,
    pub description: String,
    pub archive_password: String,
    pub video_embed: String,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub views: i64,
    pub created_at: DateTime<Utc>,
}
