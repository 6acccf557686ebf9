//! Media storage for mirrored thumbnails.
//!
//! Scraped thumbnail images are downloaded and re-hosted so pages never hot
//! link the source site. Two backends are supported:
//! - **Local disk**: writes under `LOCAL_STORAGE_PATH`
//! - **GCS**: writes to a Google Cloud Storage bucket
//!
//! Reads try local first, then fall back to GCS.

use std::path::PathBuf;
use std::time::Duration;

use axum::http::StatusCode;
use bytes::Bytes;
use google_cloud_storage::client::Storage;
use reqwest::header;
use thiserror::Error;

use crate::scrape::fetcher::BROWSER_USER_AGENT;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("image download failed: {0}")]
    Download(#[from] reqwest::Error),
    #[error("image download returned status {0}")]
    DownloadStatus(StatusCode),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("gcs error: {0}")]
    Gcs(String),
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("no storage backend configured (set LOCAL_STORAGE_PATH or GOOGLE_APPLICATION_CREDENTIALS)")]
    NoBackend,
}

pub struct MediaStore {
    http: reqwest::Client,
    local_path: Option<PathBuf>,
    gcs: Option<Storage>,
    bucket: String,
    public_base: String,
}

impl MediaStore {
    pub fn new(
        local_path: Option<PathBuf>,
        gcs: Option<Storage>,
        bucket: String,
        public_base: String,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            local_path,
            gcs,
            bucket,
            public_base: public_base.trim_end_matches('/').to_string(),
        }
    }

    /// Download a remote thumbnail and store it under `thumbnails/{slug}.{ext}`.
    ///
    /// Returns the public URL of the mirrored copy, or an empty string when
    /// the source page had no thumbnail. Videos without thumbnails are still
    /// stored, so a missing source is not an error.
    pub async fn mirror_image(
        &self,
        src: Option<&str>,
        slug: &str,
    ) -> Result<String, StorageError> {
        let Some(src) = src.filter(|s| !s.is_empty()) else {
            return Ok(String::new());
        };

        let resp = self
            .http
            .get(src)
            .header(header::USER_AGENT, BROWSER_USER_AGENT)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(StorageError::DownloadStatus(resp.status()));
        }

        let ext = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(extension_for)
            .unwrap_or("jpg");
        let object_path = format!("thumbnails/{}.{}", slug, ext);

        let data = resp.bytes().await?;
        self.store(&object_path, data).await?;

        Ok(format!("{}/{}", self.public_base, object_path))
    }

    /// Write an object to local storage or GCS.
    pub async fn store(&self, path: &str, data: Bytes) -> Result<(), StorageError> {
        if let Some(ref local) = self.local_path {
            let full_path = local.join(path);
            if let Some(parent) = full_path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&full_path, &data).await?;
        } else if let Some(ref gcs) = self.gcs {
            let bucket = format!("projects/_/buckets/{}", self.bucket);
            gcs.write_object(&bucket, path, data)
                .send_buffered()
                .await
                .map_err(|e| StorageError::Gcs(e.to_string()))?;
        } else {
            return Err(StorageError::NoBackend);
        }
        Ok(())
    }

    /// Read an object, trying local storage first and falling back to GCS.
    pub async fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        if let Some(ref local) = self.local_path {
            let full_path = local.join(path);
            // Resolve symlinks before the containment check
            if let (Ok(canonical), Ok(root)) = (full_path.canonicalize(), local.canonicalize()) {
                if canonical.starts_with(&root) {
                    if let Ok(bytes) = tokio::fs::read(&canonical).await {
                        return Ok(bytes);
                    }
                }
            }
        }

        if let Some(ref gcs) = self.gcs {
            let bucket = format!("projects/_/buckets/{}", self.bucket);
            let mut resp = gcs
                .read_object(&bucket, path)
                .send()
                .await
                .map_err(|_| StorageError::NotFound(path.to_string()))?;
            let mut data = Vec::new();
            while let Some(chunk) = resp.next().await {
                data.extend_from_slice(&chunk.map_err(|e| StorageError::Gcs(e.to_string()))?);
            }
            return Ok(data);
        }

        Err(StorageError::NotFound(path.to_string()))
    }
}

/// Map a download's Content-Type to a file extension. Unknown types fall
/// back to jpg, which matches what the source site serves in practice.
fn extension_for(content_type: &str) -> &'static str {
    if content_type.starts_with("image/png") {
        "png"
    } else if content_type.starts_with("image/webp") {
        "webp"
    } else if content_type.starts_with("image/gif") {
        "gif"
    } else {
        "jpg"
    }
}

pub fn content_type_for(path: &str) -> &'static str {
    if path.ends_with(".png") {
        "image/png"
    } else if path.ends_with(".jpg") || path.ends_with(".jpeg") {
        "image/jpeg"
    } else if path.ends_with(".webp") {
        "image/webp"
    } else if path.ends_with(".gif") {
        "image/gif"
    } else {
        "application/octet-stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_store(dir: &tempfile::TempDir) -> MediaStore {
        MediaStore::new(
            Some(dir.path().to_path_buf()),
            None,
            "unused".to_string(),
            "http://localhost:3000/media".to_string(),
        )
    }

    #[tokio::test]
    async fn missing_source_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = local_store(&dir);
        assert_eq!(store.mirror_image(None, "some-video").await.unwrap(), "");
        assert_eq!(store.mirror_image(Some(""), "some-video").await.unwrap(), "");
    }

    #[tokio::test]
    async fn store_and_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = local_store(&dir);

        store
            .store("thumbnails/clip.jpg", Bytes::from_static(b"jpegdata"))
            .await
            .unwrap();
        let data = store.read("thumbnails/clip.jpg").await.unwrap();
        assert_eq!(data, b"jpegdata");
    }

    #[tokio::test]
    async fn read_refuses_paths_outside_root() {
        let outer = tempfile::tempdir().unwrap();
        let root = outer.path().join("media");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(outer.path().join("secret.txt"), b"nope").unwrap();

        let store = MediaStore::new(
            Some(root),
            None,
            "unused".to_string(),
            "http://localhost:3000/media".to_string(),
        );
        assert!(matches!(
            store.read("../secret.txt").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn no_backend_rejects_writes() {
        let store = MediaStore::new(
            None,
            None,
            "unused".to_string(),
            "http://localhost:3000/media".to_string(),
        );
        assert!(matches!(
            store.store("thumbnails/x.jpg", Bytes::from_static(b"x")).await,
            Err(StorageError::NoBackend)
        ));
    }

    #[test]
    fn extensions_follow_content_type() {
        assert_eq!(extension_for("image/png"), "png");
        assert_eq!(extension_for("image/webp"), "webp");
        assert_eq!(extension_for("image/jpeg"), "jpg");
        assert_eq!(extension_for("text/html; charset=utf-8"), "jpg");
    }

    #[test]
    fn content_types_follow_extension() {
        assert_eq!(content_type_for("thumbnails/a.png"), "image/png");
        assert_eq!(content_type_for("thumbnails/a.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("thumbnails/a.bin"), "application/octet-stream");
    }
}
