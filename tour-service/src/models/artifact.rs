use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Row of the append-only `kml_files` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StoredArtifact {
    pub id: Uuid,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl StoredArtifact {
    pub fn new(url: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            url,
            created_at: Utc::now(),
        }
    }
}
