//! Object storage for generated and uploaded KML files.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use service_core::error::AppError;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Write-once object storage. `put` returns the public URL of the object.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<String, AppError>;
}

/// Files under a local directory, served by the application at
/// `public_base_url`.
pub struct LocalStorage {
    base_path: PathBuf,
    public_base_url: String,
}

impl LocalStorage {
    pub async fn new(
        base_path: impl Into<PathBuf>,
        public_base_url: impl Into<String>,
    ) -> Result<Self, AppError> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path).await?;
        Ok(Self {
            base_path,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(&self, key: &str, data: Vec<u8>, _content_type: &str) -> Result<String, AppError> {
        validate_key(key)?;

        let path = self.base_path.join(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, data).await?;

        tracing::debug!(path = %path.display(), "Stored object on local disk");
        Ok(format!("{}/{}", self.public_base_url, key))
    }
}

/// Vercel Blob compatible HTTP store.
pub struct BlobStorage {
    client: Client,
    api_url: String,
    token: Secret<String>,
}

#[derive(Debug, Deserialize)]
struct BlobPutResponse {
    url: String,
}

impl BlobStorage {
    pub fn new(api_url: impl Into<String>, token: Secret<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }
}

#[async_trait]
impl Storage for BlobStorage {
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<String, AppError> {
        validate_key(key)?;

        let response = self
            .client
            .put(format!("{}/{}", self.api_url, key))
            .bearer_auth(self.token.expose_secret())
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-access", "public")
            .body(data)
            .send()
            .await
            .map_err(|e| AppError::StorageError(anyhow::anyhow!("Blob upload failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::StorageError(anyhow::anyhow!(
                "Blob upload failed with {}: {}",
                status,
                body
            )));
        }

        let parsed: BlobPutResponse = response.json().await.map_err(|e| {
            AppError::StorageError(anyhow::anyhow!("Invalid blob upload response: {}", e))
        })?;
        Ok(parsed.url)
    }
}

/// Keys are relative paths without parent or root components.
fn validate_key(key: &str) -> Result<(), AppError> {
    let valid = !key.is_empty()
        && Path::new(key)
            .components()
            .all(|c| matches!(c, Component::Normal(_)));

    if valid {
        Ok(())
    } else {
        Err(AppError::StorageError(anyhow::anyhow!(
            "Invalid storage key: {}",
            key
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("tour-storage-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn keys_must_stay_inside_the_store() {
        assert!(validate_key("tours/a.kml").is_ok());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("/abs.kml").is_err());
        assert!(validate_key("").is_err());
    }

    #[tokio::test]
    async fn local_put_writes_file_and_returns_public_url() {
        let dir = temp_dir();
        let storage = LocalStorage::new(&dir, "http://localhost:8080/files/")
            .await
            .unwrap();

        let url = storage
            .put("tours/a.kml", b"<kml/>".to_vec(), "application/xml")
            .await
            .unwrap();

        assert_eq!(url, "http://localhost:8080/files/tours/a.kml");
        let written = fs::read(dir.join("tours/a.kml")).await.unwrap();
        assert_eq!(written, b"<kml/>");

        let _ = fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn local_storage_reopens_an_existing_directory() {
        let dir = temp_dir().join("nested/files");
        let first = LocalStorage::new(&dir, "http://localhost:8080/files")
            .await
            .unwrap();
        first
            .put("tours/kept.kml", b"<kml/>".to_vec(), "application/xml")
            .await
            .unwrap();

        let second = LocalStorage::new(&dir, "http://localhost:8080/files")
            .await
            .unwrap();

        assert_eq!(second.base_path(), dir.as_path());
        assert!(fs::try_exists(dir.join("tours/kept.kml")).await.unwrap());

        let _ = fs::remove_dir_all(dir.parent().unwrap().parent().unwrap()).await;
    }

    #[tokio::test]
    async fn blob_put_returns_url_from_response() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/tours/a.kml"))
            .and(header("authorization", "Bearer token"))
            .and(header("x-access", "public"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "url": "https://blob.example/tours/a.kml"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let storage = BlobStorage::new(server.uri(), Secret::new("token".to_string()));
        let url = storage
            .put("tours/a.kml", b"<kml/>".to_vec(), "application/xml")
            .await
            .unwrap();

        assert_eq!(url, "https://blob.example/tours/a.kml");
    }

    #[tokio::test]
    async fn blob_put_failure_is_a_storage_error() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let storage = BlobStorage::new(server.uri(), Secret::new("token".to_string()));
        let err = storage
            .put("tours/a.kml", Vec::new(), "application/xml")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::StorageError(_)));
    }
}
