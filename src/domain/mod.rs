//! Query layer over PostgreSQL.
//!
//! All functions use the generic Executor pattern so they work with both
//! `&PgPool` and `&mut PgConnection` should a caller ever need a transaction.

pub mod cosplays;
pub mod videos;

/// Unique-index violations (duplicate title/slug) get translated into the
/// pipeline's Duplicate outcome instead of bubbling as raw database errors.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
        _ => false,
    }
}

/// Escape LIKE/ILIKE wildcards in user-supplied keywords so a search for
/// "100%" matches the literal text instead of everything.
pub fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
