use std::sync::Arc;

use google_cloud_storage::client::Storage;
use sqlx::postgres::PgPoolOptions;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use vitrine::cache::ResponseCache;
use vitrine::config::AppConfig;
use vitrine::scrape::fetcher::PageFetcher;
use vitrine::storage::MediaStore;
use vitrine::{AppState, routes, services};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load();

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    services::db::init_schema(&pool)
        .await
        .expect("Failed to apply database schema");

    // GCS client uses GOOGLE_APPLICATION_CREDENTIALS env var; local disk
    // takes precedence when LOCAL_STORAGE_PATH is set
    let gcs = match Storage::builder().build().await {
        Ok(client) => {
            info!("GCS client initialized");
            Some(client)
        }
        Err(e) => {
            warn!("GCS not available: {}", e);
            None
        }
    };
    if config.local_storage_path.is_none() && gcs.is_none() {
        warn!("no storage backend configured; thumbnail mirroring will fail");
    }

    let media = MediaStore::new(
        config.local_storage_path.clone(),
        gcs,
        config.gcs_bucket.clone(),
        config.media_public_url.clone(),
    );

    let fetcher = PageFetcher::new().expect("Failed to build scrape HTTP client");

    let port = config.port;
    let state = Arc::new(AppState {
        db: pool,
        cache: ResponseCache::new(),
        media,
        fetcher,
        config,
    });

    let app = routes::build_router(state).layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listen address");
    info!("listening on http://{}", addr);

    axum::serve(listener, app).await.expect("Server error");
}
