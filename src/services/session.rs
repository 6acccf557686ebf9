//! Admin session management: short-lived JWTs carried in a cookie.
//!
//! The site has a single administrator, so claims carry a fixed subject
//! instead of a user id.

use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::services::cookies;

/// JWT claims for the admin session token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64, // expiry timestamp
    pub iat: i64, // issued at
}

#[derive(Debug)]
pub enum SessionError {
    InvalidToken,
    Expired,
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::InvalidToken => write!(f, "Invalid token"),
            SessionError::Expired => write!(f, "Token expired"),
        }
    }
}

const SESSION_LIFETIME_MINUTES: i64 = 60;
const SESSION_SUBJECT: &str = "admin";

/// Create a session token valid for one hour
pub fn create_session_token(secret: &[u8]) -> Result<String, SessionError> {
    let now = Utc::now();
    let exp = now + Duration::minutes(SESSION_LIFETIME_MINUTES);

    let claims = Claims {
        sub: SESSION_SUBJECT.to_string(),
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|_| SessionError::InvalidToken)
}

/// Validate a session token
pub fn validate_session_token(token: &str, secret: &[u8]) -> Result<(), SessionError> {
    // Explicitly validate with HS256 algorithm only to prevent algorithm confusion attacks
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_required_spec_claims(&["exp", "sub", "iat"]);

    let token_data = decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
            _ => SessionError::InvalidToken,
        })?;

    if token_data.claims.sub != SESSION_SUBJECT {
        return Err(SessionError::InvalidToken);
    }

    Ok(())
}

/// Check request headers for a valid admin session cookie.
///
/// Used both by the admin routes and by the response cache, which must not
/// serve or store cached pages for a logged-in admin.
pub fn is_authenticated(headers: &HeaderMap, secret: &[u8]) -> bool {
    let Some(token) = session_cookie_value(headers) else {
        return false;
    };
    validate_session_token(&token, secret).is_ok()
}

fn session_cookie_value(headers: &HeaderMap) -> Option<String> {
    for value in headers.get_all(axum::http::header::COOKIE) {
        let Ok(raw) = value.to_str() else { continue };
        for pair in raw.split(';') {
            let mut parts = pair.trim().splitn(2, '=');
            let name = parts.next()?;
            if name == cookies::config::SESSION_COOKIE_NAME {
                return parts.next().map(str::to_string);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::COOKIE;

    const SECRET: &[u8] = b"test-secret-key";

    #[test]
    fn round_trip() {
        let token = create_session_token(SECRET).unwrap();
        assert!(validate_session_token(&token, SECRET).is_ok());
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = create_session_token(SECRET).unwrap();
        assert!(matches!(
            validate_session_token(&token, b"other-secret"),
            Err(SessionError::InvalidToken)
        ));
    }

    #[test]
    fn expired_token_rejected() {
        let now = Utc::now();
        let claims = Claims {
            sub: SESSION_SUBJECT.to_string(),
            exp: (now - Duration::hours(2)).timestamp(),
            iat: (now - Duration::hours(3)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert!(matches!(
            validate_session_token(&token, SECRET),
            Err(SessionError::Expired)
        ));
    }

    #[test]
    fn wrong_subject_rejected() {
        let now = Utc::now();
        let claims = Claims {
            sub: "someone-else".to_string(),
            exp: (now + Duration::hours(1)).timestamp(),
            iat: now.timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert!(matches!(
            validate_session_token(&token, SECRET),
            Err(SessionError::InvalidToken)
        ));
    }

    #[test]
    fn authenticated_from_cookie_header() {
        let token = create_session_token(SECRET).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            format!("theme=dark; admin_session={token}").parse().unwrap(),
        );
        assert!(is_authenticated(&headers, SECRET));

        let mut bad = HeaderMap::new();
        bad.insert(COOKIE, "theme=dark".parse().unwrap());
        assert!(!is_authenticated(&bad, SECRET));
    }
}
