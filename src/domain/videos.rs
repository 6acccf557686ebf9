//! Video domain - DB queries for video records

use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres};

use super::escape_like;
use crate::models::Video;
use crate::scrape::video::VideoDraft;

/// Video row with total count from window function
#[derive(Debug, sqlx::FromRow)]
struct VideoRowWithTotal {
    #[sqlx(flatten)]
    video: Video,
    total_count: i64,
}

/// Slim row for the general sitemap
#[derive(Debug, sqlx::FromRow)]
pub struct VideoSitemapEntry {
    pub slug: String,
    pub title: String,
    pub thumbnail: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Row for the Google video sitemap
#[derive(Debug, sqlx::FromRow)]
pub struct VideoSitemapDetail {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub embed_url: String,
    pub duration_sec: i32,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

pub async fn find_by_slug<'e, E>(executor: E, slug: &str) -> Result<Option<Video>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as("SELECT * FROM videos WHERE slug = $1")
        .bind(slug)
        .fetch_optional(executor)
        .await
}

/// Dedup lookup: exact match on the trimmed title
pub async fn find_by_title<'e, E>(executor: E, title: &str) -> Result<Option<Video>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as("SELECT * FROM videos WHERE title = $1")
        .bind(title)
        .fetch_optional(executor)
        .await
}

/// Paginated newest-first listing with optional tag/category keyword filters,
/// returning total count from the same query via a window function.
/// Keywords match case-insensitively as substrings of individual entries.
pub async fn browse<'e, E>(
    executor: E,
    tag_keyword: Option<&str>,
    category_keyword: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<(Vec<Video>, i64), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows: Vec<VideoRowWithTotal> = sqlx::query_as(
        r#"
        SELECT *, COUNT(*) OVER() AS total_count
        FROM videos
        WHERE ($1::text IS NULL
               OR EXISTS (SELECT 1 FROM unnest(tags) AS t WHERE t ILIKE '%' || $1 || '%'))
          AND ($2::text IS NULL
               OR EXISTS (SELECT 1 FROM unnest(categories) AS c WHERE c ILIKE '%' || $2 || '%'))
        ORDER BY created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(tag_keyword.map(escape_like))
    .bind(category_keyword.map(escape_like))
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await?;

    let total = rows.first().map(|r| r.total_count).unwrap_or(0);
    Ok((rows.into_iter().map(|r| r.video).collect(), total))
}

/// Newest videos without pagination bookkeeping (feeds, home strip)
pub async fn latest<'e, E>(executor: E, limit: i64) -> Result<Vec<Video>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as("SELECT * FROM videos ORDER BY created_at DESC LIMIT $1")
        .bind(limit)
        .fetch_all(executor)
        .await
}

/// Newest videos matching a category keyword (category RSS feed)
pub async fn latest_in_category<'e, E>(
    executor: E,
    category_keyword: &str,
    limit: i64,
) -> Result<Vec<Video>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        SELECT * FROM videos
        WHERE EXISTS (SELECT 1 FROM unnest(categories) AS c WHERE c ILIKE '%' || $1 || '%')
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(escape_like(category_keyword))
    .bind(limit)
    .fetch_all(executor)
    .await
}

/// Substring search over title and tags, newest first
pub async fn search<'e, E>(executor: E, q: &str, limit: i64) -> Result<Vec<Video>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let pattern = format!("%{}%", escape_like(q));
    sqlx::query_as(
        r#"
        SELECT * FROM videos
        WHERE title ILIKE $1
           OR EXISTS (SELECT 1 FROM unnest(tags) AS t WHERE t ILIKE $1)
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(pattern)
    .bind(limit)
    .fetch_all(executor)
    .await
}

/// Uniform random sample (related strips, 404 page)
pub async fn random_sample<'e, E>(executor: E, count: i64) -> Result<Vec<Video>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as("SELECT * FROM videos ORDER BY random() LIMIT $1")
        .bind(count)
        .fetch_all(executor)
        .await
}

/// Atomic view-counter increment; missing slugs are a no-op
pub async fn bump_views<'e, E>(executor: E, slug: &str) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query("UPDATE videos SET views = views + 1 WHERE slug = $1")
        .bind(slug)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn insert<'e, E>(
    executor: E,
    draft: &VideoDraft,
    thumbnail: &str,
) -> Result<Video, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        INSERT INTO videos
            (title, slug, description, embed_url, thumbnail, duration, duration_sec, tags, categories)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(&draft.title)
    .bind(&draft.slug)
    .bind(&draft.description)
    .bind(&draft.embed_url)
    .bind(thumbnail)
    .bind(&draft.duration)
    .bind(draft.duration_sec)
    .bind(&draft.tags)
    .bind(&draft.categories)
    .fetch_one(executor)
    .await
}

pub async fn for_sitemap<'e, E>(executor: E) -> Result<Vec<VideoSitemapEntry>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        SELECT slug, title, thumbnail, tags, created_at
        FROM videos
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(executor)
    .await
}

pub async fn for_video_sitemap<'e, E>(
    executor: E,
    limit: i64,
) -> Result<Vec<VideoSitemapDetail>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        SELECT slug, title, description, thumbnail, embed_url, duration_sec, tags, created_at
        FROM videos
        ORDER BY created_at DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(executor)
    .await
}
