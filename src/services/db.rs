//! Database schema management and query conventions.
//!
//! Domain functions use sqlx's generic Executor trait so they accept both
//! `&PgPool` and `&mut PgConnection`:
//!
//! ```ignore
//! pub async fn my_query<'e, E>(executor: E, id: i64) -> Result<MyType, sqlx::Error>
//! where
//!     E: Executor<'e, Database = Postgres>,
//! { ... }
//! ```
//!
//! The schema is applied idempotently at startup; the unique constraints on
//! `videos.title`, `videos.slug` and `cosplay_albums.slug` back the scrape
//! pipeline's duplicate detection.

use sqlx::PgPool;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS videos (
    id           BIGSERIAL PRIMARY KEY,
    title        TEXT NOT NULL,
    slug         TEXT NOT NULL,
    description  TEXT NOT NULL DEFAULT '',
    embed_url    TEXT NOT NULL DEFAULT '',
    thumbnail    TEXT NOT NULL DEFAULT '',
    duration     TEXT NOT NULL DEFAULT 'PT0S',
    duration_sec INTEGER NOT NULL DEFAULT 0,
    tags         TEXT[] NOT NULL DEFAULT '{}',
    categories   TEXT[] NOT NULL DEFAULT '{}',
    views        BIGINT NOT NULL DEFAULT 0,
    created_at   TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT videos_title_key UNIQUE (title),
    CONSTRAINT videos_slug_key UNIQUE (slug)
);

CREATE INDEX IF NOT EXISTS videos_created_at_idx ON videos (created_at DESC);

CREATE TABLE IF NOT EXISTS cosplay_albums (
    id               BIGSERIAL PRIMARY KEY,
    title            TEXT NOT NULL,
    slug             TEXT NOT NULL,
    cosplayer        TEXT NOT NULL DEFAULT '',
    character_name   TEXT NOT NULL DEFAULT '',
    source_work      TEXT NOT NULL DEFAULT '',
    gallery          TEXT[] NOT NULL DEFAULT '{}',
    downloads        JSONB NOT NULL DEFAULT '{}',
    description      TEXT NOT NULL DEFAULT '',
    archive_password TEXT NOT NULL DEFAULT '',
    video_embed      TEXT NOT NULL DEFAULT '',
    tags             TEXT[] NOT NULL DEFAULT '{}',
    categories       TEXT[] NOT NULL DEFAULT '{}',
    views            BIGINT NOT NULL DEFAULT 0,
    created_at       TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT cosplay_albums_slug_key UNIQUE (slug)
);

CREATE INDEX IF NOT EXISTS cosplay_albums_created_at_idx ON cosplay_albums (created_at DESC);
"#;

/// Apply the schema. Safe to run on every boot.
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}
