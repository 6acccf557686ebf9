//! Cookie building utilities for the admin session
//!
//! Centralizes cookie formatting so login and logout stay consistent.

use axum::http::{HeaderValue, StatusCode};
use tracing::error;

/// Cookie configuration constants
pub mod config {
    /// Admin session cookie name
    pub const SESSION_COOKIE_NAME: &str = "admin_session";
    /// Session cookie max-age in seconds (1 hour, matches token lifetime)
    pub const SESSION_MAX_AGE_SECS: u32 = 3600;
    /// Path for the session cookie (admin pages and scrape endpoints)
    pub const SESSION_COOKIE_PATH: &str = "/";
}

fn is_dev() -> bool {
    std::env::var("ENV").as_deref() != Ok("prod")
}

fn cookie_same_site() -> &'static str {
    match std::env::var("COOKIE_SAMESITE")
        .unwrap_or_else(|_| "Lax".to_string())
        .to_lowercase()
        .as_str()
    {
        "none" => "None",
        "strict" => "Strict",
        "lax" => "Lax",
        _ => "Lax",
    }
}

/// Build a session Set-Cookie header value
pub fn build_session_cookie(token: &str) -> Result<HeaderValue, StatusCode> {
    let same_site = cookie_same_site();
    let secure = if is_dev() { "" } else { " Secure;" };
    let cookie = format!(
        "{}={}; HttpOnly;{} SameSite={}; Path={}; Max-Age={}",
        config::SESSION_COOKIE_NAME,
        token,
        secure,
        same_site,
        config::SESSION_COOKIE_PATH,
        config::SESSION_MAX_AGE_SECS
    );
    cookie.parse().map_err(|_| {
        error!("failed to parse session cookie header");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Build a Set-Cookie header to clear the session
pub fn build_clear_session_cookie() -> HeaderValue {
    format!(
        "{}=; HttpOnly; Secure; SameSite=Lax; Path={}; Max-Age=0",
        config::SESSION_COOKIE_NAME,
        config::SESSION_COOKIE_PATH
    )
    .parse()
    .expect("static cookie string should always parse")
}
