//! Persistence of finished documents: one storage object plus one
//! `kml_files` row per document.

use crate::kml::extract_document;
use crate::models::StoredArtifact;
use crate::services::database::ArtifactStore;
use crate::services::storage::Storage;
use crate::services::PipelineError;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub const KML_CONTENT_TYPE: &str = "application/vnd.google-earth.kml+xml";

const TOUR_PREFIX: &str = "tours";
const UPLOAD_PREFIX: &str = "uploads";

#[derive(Clone)]
pub struct ArtifactPersister {
    storage: Arc<dyn Storage>,
    store: Arc<dyn ArtifactStore>,
}

impl ArtifactPersister {
    pub fn new(storage: Arc<dyn Storage>, store: Arc<dyn ArtifactStore>) -> Self {
        Self { storage, store }
    }

    pub fn store(&self) -> &Arc<dyn ArtifactStore> {
        &self.store
    }

    /// Store the `<?xml ... </kml>` region of `text` and record it.
    pub async fn persist_document(&self, text: &str) -> Result<StoredArtifact, PipelineError> {
        let document = extract_document(text)?;
        let key = tour_key(Utc::now(), Uuid::new_v4());
        self.persist(&key, document.as_bytes().to_vec()).await
    }

    /// Store an uploaded file as-is and record it.
    pub async fn persist_upload(
        &self,
        filename: &str,
        data: Vec<u8>,
    ) -> Result<StoredArtifact, PipelineError> {
        let key = upload_key(Utc::now(), filename);
        self.persist(&key, data).await
    }

    async fn persist(&self, key: &str, data: Vec<u8>) -> Result<StoredArtifact, PipelineError> {
        let size = data.len();
        let url = self.storage.put(key, data, KML_CONTENT_TYPE).await?;
        let artifact = self.store.insert(&url).await?;

        info!(key = %key, size = size, url = %artifact.url, "KML document persisted");
        Ok(artifact)
    }
}

fn tour_key(now: DateTime<Utc>, id: Uuid) -> String {
    let suffix = id.simple().to_string();
    format!(
        "{}/{}-{}.kml",
        TOUR_PREFIX,
        now.format("%Y%m%dT%H%M%S%3f"),
        &suffix[..8]
    )
}

fn upload_key(now: DateTime<Utc>, filename: &str) -> String {
    format!(
        "{}/{}-{}",
        UPLOAD_PREFIX,
        now.timestamp_millis(),
        sanitize_filename(filename)
    )
}

/// Keep the final path segment and replace anything outside
/// `[A-Za-z0-9._-]` with `_`.
fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim_start_matches('.');

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "upload.kml".to_string()
    } else {
        cleaned
    }
}
