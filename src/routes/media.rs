//! Serves mirrored media objects from local storage or GCS.

use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use std::sync::Arc;
use tracing::error;

use crate::AppState;
use crate::storage::{self, StorageError};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/media/{*path}", get(serve_object))
}

/// GET /media/{*path} - mirrored objects are immutable once written
async fn serve_object(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    // Path traversal protection
    if path.contains("..") || path.contains('\0') || path.starts_with('/') {
        return Err(StatusCode::FORBIDDEN);
    }

    let content_type = storage::content_type_for(&path);

    match state.media.read(&path).await {
        Ok(bytes) => Ok((
            [
                (header::CONTENT_TYPE, content_type),
                (header::CACHE_CONTROL, "public, max-age=31536000, immutable"),
            ],
            bytes,
        )),
        Err(StorageError::NotFound(_)) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("media read failed for {}: {}", path, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
