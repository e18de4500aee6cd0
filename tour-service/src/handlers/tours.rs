use crate::dtos::{GenerateKmlRequest, GenerateKmlResponse, UploadResponse};
use crate::services::PipelineError;
use crate::startup::{AppState, MAX_BODY_BYTES};
use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;
use validator::{Validate, ValidationErrors};

const UPLOAD_FIELD: &str = "file";

/// `POST /api/generate-kml`
///
/// Every failure is reported in the body with `success: false`. Only bad
/// input changes the status code.
pub async fn generate_kml(
    State(state): State<AppState>,
    payload: Result<Json<GenerateKmlRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected generate-kml body");
            return (
                StatusCode::BAD_REQUEST,
                Json(GenerateKmlResponse::failed(rejection.body_text())),
            );
        }
    };

    if let Err(errors) = request.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(GenerateKmlResponse::failed(first_message(&errors))),
        );
    }

    match state.pipeline.generate(&request.text, request.count).await {
        Ok(outcome) => (StatusCode::OK, Json(GenerateKmlResponse::from(outcome))),
        Err(e @ PipelineError::InvalidInput(_)) => (
            StatusCode::BAD_REQUEST,
            Json(GenerateKmlResponse::failed(e.to_string())),
        ),
        Err(e) => (StatusCode::OK, Json(GenerateKmlResponse::failed(e.to_string()))),
    }
}

/// `POST /api/kml/upload`
pub async fn upload_kml(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(anyhow::anyhow!("Failed to read multipart field: {}", e))
    })? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload.kml").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| {
                if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    AppError::PayloadTooLarge(format!("File exceeds {} bytes", MAX_BODY_BYTES))
                } else {
                    AppError::BadRequest(anyhow::anyhow!("Failed to read file bytes: {}", e))
                }
            })?
            .to_vec();

        if data.is_empty() {
            return Err(AppError::BadRequest(anyhow::anyhow!("Uploaded file is empty")));
        }

        let artifact = state.pipeline.store_upload(&filename, data).await?;
        return Ok(Json(UploadResponse::from(artifact)));
    }

    Err(AppError::BadRequest(anyhow::anyhow!("No file uploaded")))
}

fn first_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .into_values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string())
}
