use crate::models::{GeoPoint, StoredArtifact};
use crate::services::pipeline::TourOutcome;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateKmlRequest {
    /// Place to build the tour for, e.g. "Athens".
    #[serde(default)]
    #[validate(length(min = 1, message = "Text is required"))]
    pub text: String,

    #[validate(range(min = 2, max = 25, message = "count must be between 2 and 25"))]
    pub count: Option<usize>,
}

/// Body of `POST /api/generate-kml`. Failures still use this shape, with
/// `success: false` and `error` set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateKmlResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<StoredArtifact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<GeoPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerateKmlResponse {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            url: None,
            data: None,
            center: None,
            error: Some(error.into()),
        }
    }
}

impl From<TourOutcome> for GenerateKmlResponse {
    fn from(outcome: TourOutcome) -> Self {
        Self {
            success: true,
            url: Some(outcome.artifact.url.clone()),
            data: Some(outcome.artifact),
            center: outcome.center,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub url: String,
    pub data: StoredArtifact,
}

impl From<StoredArtifact> for UploadResponse {
    fn from(artifact: StoredArtifact) -> Self {
        Self {
            success: true,
            url: artifact.url.clone(),
            data: artifact,
        }
    }
}
