//! Cosplay album domain - DB queries for album records

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{Executor, Postgres};

use super::escape_like;
use crate::models::CosplayAlbum;
use crate::scrape::cosplay::CosplayDraft;

#[derive(Debug, sqlx::FromRow)]
struct AlbumRowWithTotal {
    #[sqlx(flatten)]
    album: CosplayAlbum,
    total_count: i64,
}

/// Slim row for the general sitemap
#[derive(Debug, sqlx::FromRow)]
pub struct AlbumSitemapEntry {
    pub slug: String,
    pub title: String,
    pub gallery: Vec<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

pub async fn find_by_slug<'e, E>(
    executor: E,
    slug: &str,
) -> Result<Option<CosplayAlbum>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as("SELECT * FROM cosplay_albums WHERE slug = $1")
        .bind(slug)
        .fetch_optional(executor)
        .await
}

/// Paginated newest-first album index with total count
pub async fn page<'e, E>(
    executor: E,
    limit: i64,
    offset: i64,
) -> Result<(Vec<CosplayAlbum>, i64), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows: Vec<AlbumRowWithTotal> = sqlx::query_as(
        r#"
        SELECT *, COUNT(*) OVER() AS total_count
        FROM cosplay_albums
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await?;

    let total = rows.first().map(|r| r.total_count).unwrap_or(0);
    Ok((rows.into_iter().map(|r| r.album).collect(), total))
}

/// Newest albums, optionally filtered by a tag or category keyword
/// (home strip, tag/category side strips, category RSS)
pub async fn latest_filtered<'e, E>(
    executor: E,
    tag_keyword: Option<&str>,
    category_keyword: Option<&str>,
    limit: i64,
) -> Result<Vec<CosplayAlbum>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        SELECT * FROM cosplay_albums
        WHERE ($1::text IS NULL
               OR EXISTS (SELECT 1 FROM unnest(tags) AS t WHERE t ILIKE '%' || $1 || '%'))
          AND ($2::text IS NULL
               OR EXISTS (SELECT 1 FROM unnest(categories) AS c WHERE c ILIKE '%' || $2 || '%'))
        ORDER BY created_at DESC
        LIMIT $3
        "#,
    )
    .bind(tag_keyword.map(escape_like))
    .bind(category_keyword.map(escape_like))
    .bind(limit)
    .fetch_all(executor)
    .await
}

/// Substring search over title, character, cosplayer and tags, newest first
pub async fn search<'e, E>(
    executor: E,
    q: &str,
    limit: i64,
) -> Result<Vec<CosplayAlbum>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let pattern = format!("%{}%", escape_like(q));
    sqlx::query_as(
        r#"
        SELECT * FROM cosplay_albums
        WHERE title ILIKE $1
           OR character_name ILIKE $1
           OR cosplayer ILIKE $1
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

/// Random sample of albums sharing at least one category, excluding the
/// album being viewed
pub async fn related_sample<'e, E>(
    executor: E,
    categories: &[String],
    exclude_slug: &str,
    count: i64,
) -> Result<Vec<CosplayAlbum>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        SELECT * FROM cosplay_albums
        WHERE categories && $1 AND slug <> $2
        ORDER BY random()
        LIMIT $3
        "#,
    )
    .bind(categories)
    .bind(exclude_slug)
    .bind(count)
    .fetch_all(executor)
    .await
}

/// Atomic view-counter increment; missing slugs are a no-op
pub async fn bump_views<'e, E>(executor: E, slug: &str) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query("UPDATE cosplay_albums SET views = views + 1 WHERE slug = $1")
        .bind(slug)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn insert<'e, E>(executor: E, draft: &CosplayDraft) -> Result<CosplayAlbum, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        INSERT INTO cosplay_albums
            (title, slug, cosplayer, character_name, source_work, gallery, downloads,
             description, archive_password, video_embed, tags, categories)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING *
        "#,
    )
    .bind(&draft.title)
    .bind(&draft.slug)
    .bind(&draft.cosplayer)
    .bind(&draft.character_name)
    .bind(&draft.source_work)
    .bind(&draft.gallery)
    .bind(Json(&draft.downloads))
    .bind(&draft.description)
    .bind(&draft.archive_password)
    .bind(&draft.video_embed)
    .bind(&draft.tags)
    .bind(&draft.categories)
    .fetch_one(executor)
    .await
}

pub async fn for_sitemap<'e, E>(executor: E) -> Result<Vec<AlbumSitemapEntry>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        r#"
        SELECT slug, title, gallery, tags, created_at
        FROM cosplay_albums
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(executor)
    .await
}
