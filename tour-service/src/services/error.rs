use service_core::error::AppError;
use thiserror::Error;

/// Failure of one pipeline stage. Every variant except `NoInsertionPoint`
/// aborts the remaining stages for the request.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Generative API unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Generative API rejected the request: {0}")]
    UpstreamRejected(String),

    #[error("Generative API returned an unexpected response: {0}")]
    UpstreamMalformed(String),

    #[error("Not enough placemarks to compute a route: found {found}, need at least 2")]
    InsufficientPlacemarks { found: usize },

    #[error("Failed to parse generated KML: {0}")]
    ParseFailure(String),

    #[error("Routing request failed: {0}")]
    RoutingFailed(String),

    #[error("Routing API returned no route")]
    NoRouteFound,

    #[error("No placemark closing tag to insert the route after")]
    NoInsertionPoint,

    #[error("Output is not a complete KML document")]
    MalformedOutput,

    #[error("Failed to persist KML: {0}")]
    PersistenceFailed(String),
}

impl PipelineError {
    /// Stable label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::InvalidInput(_) => "invalid_input",
            PipelineError::UpstreamUnavailable(_) => "upstream_unavailable",
            PipelineError::UpstreamRejected(_) => "upstream_rejected",
            PipelineError::UpstreamMalformed(_) => "upstream_malformed",
            PipelineError::InsufficientPlacemarks { .. } => "insufficient_placemarks",
            PipelineError::ParseFailure(_) => "parse_failure",
            PipelineError::RoutingFailed(_) => "routing_failed",
            PipelineError::NoRouteFound => "no_route_found",
            PipelineError::NoInsertionPoint => "no_insertion_point",
            PipelineError::MalformedOutput => "malformed_output",
            PipelineError::PersistenceFailed(_) => "persistence_failed",
        }
    }
}

impl From<AppError> for PipelineError {
    fn from(err: AppError) -> Self {
        PipelineError::PersistenceFailed(err.to_string())
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::InvalidInput(msg) => AppError::BadRequest(anyhow::anyhow!(msg)),
            PipelineError::UpstreamUnavailable(_)
            | PipelineError::UpstreamRejected(_)
            | PipelineError::UpstreamMalformed(_)
            | PipelineError::RoutingFailed(_)
            | PipelineError::NoRouteFound => AppError::BadGateway(err.to_string()),
            PipelineError::PersistenceFailed(msg) => AppError::StorageError(anyhow::anyhow!(msg)),
            other => AppError::InternalError(anyhow::anyhow!(other.to_string())),
        }
    }
}
