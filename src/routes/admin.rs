//! Admin login, logout, panel, and the scrape endpoints.

use axum::{
    Form, Router,
    extract::{FromRequestParts, State},
    http::{StatusCode, header::SET_COOKIE, request::Parts},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};
use tracing::error;

use crate::AppState;
use crate::routes::page_ctx;
use crate::scrape::{self, ScrapeError};
use crate::services::{cookies, session};
use crate::views;

pub fn routes() -> Router<Arc<AppState>> {
    // Rate limit the whole admin surface to slow down password guessing
    let rate_limit_config = GovernorConfigBuilder::default()
        .per_second(6)
        .burst_size(10)
        .key_extractor(SmartIpKeyExtractor)
        .finish()
        .expect("Failed to build rate limit config");

    let rate_limit_layer = GovernorLayer {
        config: rate_limit_config.into(),
    };

    Router::new()
        .route("/admin/login", get(login_form).post(login_submit))
        .route("/admin/logout", get(logout))
        .route("/admin", get(panel))
        .route("/api/scrape", post(scrape_video))
        .route("/api/scrape-cosplay", post(scrape_cosplay))
        .layer(rate_limit_layer)
}

/// Extractor that validates the admin session cookie; rejects with 401
pub struct AdminSession;

impl FromRequestParts<Arc<AppState>> for AdminSession {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                error!("cookie extraction error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            })?;

        let token = jar
            .get(cookies::config::SESSION_COOKIE_NAME)
            .map(|c| c.value())
            .ok_or(StatusCode::UNAUTHORIZED)?;

        session::validate_session_token(token, &state.config.session_secret)
            .map_err(|_| StatusCode::UNAUTHORIZED)?;

        Ok(AdminSession)
    }
}

fn authenticated(jar: &CookieJar, state: &AppState) -> bool {
    jar.get(cookies::config::SESSION_COOKIE_NAME)
        .map(|c| session::validate_session_token(c.value(), &state.config.session_secret).is_ok())
        .unwrap_or(false)
}

/// Truncate titles quoted in the scrape status strings
fn clip(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[derive(Deserialize)]
struct LoginForm {
    password: String,
}

#[derive(Deserialize)]
struct ScrapeForm {
    url: String,
}

/// GET /admin/login
async fn login_form(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    if authenticated(&jar, &state) {
        return Redirect::to("/admin").into_response();
    }
    Html(views::login_page(&page_ctx(&state), None)).into_response()
}

/// POST /admin/login - password check, session cookie on success
async fn login_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Response, StatusCode> {
    if form.password != state.config.admin_password {
        let page = views::login_page(&page_ctx(&state), Some("Wrong password"));
        return Ok((StatusCode::UNAUTHORIZED, Html(page)).into_response());
    }

    let token = session::create_session_token(&state.config.session_secret).map_err(|e| {
        error!("failed to create session token: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let mut response = Redirect::to("/admin").into_response();
    response
        .headers_mut()
        .append(SET_COOKIE, cookies::build_session_cookie(&token)?);
    Ok(response)
}

/// GET /admin/logout
async fn logout() -> Response {
    let mut response = Redirect::to("/admin/login").into_response();
    response
        .headers_mut()
        .append(SET_COOKIE, cookies::build_clear_session_cookie());
    response
}

/// GET /admin - scrape panel, gated behind the session cookie
async fn panel(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    if !authenticated(&jar, &state) {
        return Redirect::to("/admin/login").into_response();
    }
    Html(views::admin_panel(&page_ctx(&state))).into_response()
}

/// POST /api/scrape - ingest one video page, reply with a status line
async fn scrape_video(
    State(state): State<Arc<AppState>>,
    _session: AdminSession,
    Form(form): Form<ScrapeForm>,
) -> String {
    let url = form.url.trim();
    if url.is_empty() {
        return "Error: missing URL".to_string();
    }

    match scrape::ingest_video(&state.db, &state.fetcher, &state.media, &state.cache, url).await {
        Ok(video) => format!("OK: {}", clip(&video.title, 40)),
        Err(ScrapeError::Duplicate(title)) => format!("Duplicate: {}...", clip(&title, 20)),
        Err(e) => format!("Error: {}", e),
    }
}

/// POST /api/scrape-cosplay - ingest one album page, reply with a status line
async fn scrape_cosplay(
    State(state): State<Arc<AppState>>,
    _session: AdminSession,
    Form(form): Form<ScrapeForm>,
) -> String {
    let url = form.url.trim();
    if url.is_empty() {
        return "Error: missing URL".to_string();
    }

    let cdn_base = &state.config.cdn_base_url;
    match scrape::ingest_cosplay(&state.db, &state.fetcher, &state.cache, cdn_base, url).await {
        Ok(album) => format!(
            "OK: {}... ({} photos)",
            clip(&album.title, 40),
            album.gallery.len()
        ),
        Err(ScrapeError::Duplicate(title)) => format!("Duplicate: {}...", clip(&title, 30)),
        Err(e) => format!("Error: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_counts_characters_not_bytes() {
        assert_eq!(clip("abcdef", 4), "abcd");
        assert_eq!(clip("短い", 5), "短い");
        assert_eq!(clip("ネコミミコスプレ大集合セット", 5), "ネコミミコ");
    }
}
