//! The tour pipeline.
//!
//! One request runs the stages strictly in order: prompt, generation,
//! placemark extraction, routing, rendering, merge and persistence. The
//! first failing stage ends the run, except a missing insertion point,
//! which keeps the generated document without the route.

use crate::config::PipelineSettings;
use crate::kml::{extract_document, extract_placemarks, merge_route, render_route_placemark};
use crate::models::{GeoPoint, RouteOptions, RouteRequest, StoredArtifact};
use crate::services::metrics::{record_failure, record_run, record_stage};
use crate::services::persistence::ArtifactPersister;
use crate::services::prompt::build_tour_prompt;
use crate::services::providers::TextProvider;
use crate::services::routing::RouteProvider;
use crate::services::PipelineError;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

pub const MIN_PLACEMARK_COUNT: usize = 2;
pub const MAX_PLACEMARK_COUNT: usize = 25;

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct TourOutcome {
    pub artifact: StoredArtifact,
    pub center: Option<GeoPoint>,
    pub placemark_count: usize,
    /// False when the document had no insertion point for the route.
    pub route_inserted: bool,
}

#[derive(Clone)]
pub struct TourPipeline {
    text_provider: Arc<dyn TextProvider>,
    route_provider: Arc<dyn RouteProvider>,
    persister: ArtifactPersister,
    settings: PipelineSettings,
    route_options: RouteOptions,
}

impl TourPipeline {
    pub fn new(
        text_provider: Arc<dyn TextProvider>,
        route_provider: Arc<dyn RouteProvider>,
        persister: ArtifactPersister,
        settings: PipelineSettings,
        route_options: RouteOptions,
    ) -> Self {
        Self {
            text_provider,
            route_provider,
            persister,
            settings,
            route_options,
        }
    }

    pub fn persister(&self) -> &ArtifactPersister {
        &self.persister
    }

    /// Generate, route and store a walking tour of `place`.
    #[instrument(skip(self), fields(model = %self.text_provider.model()))]
    pub async fn generate(
        &self,
        place: &str,
        count: Option<usize>,
    ) -> Result<TourOutcome, PipelineError> {
        let result = self.run(place, count).await;
        match &result {
            Ok(outcome) => {
                record_run("success");
                info!(
                    url = %outcome.artifact.url,
                    placemark_count = outcome.placemark_count,
                    route_inserted = outcome.route_inserted,
                    "Tour generated"
                );
            }
            Err(e) => {
                record_run("failure");
                record_failure(e.kind());
                warn!(kind = e.kind(), error = %e, "Tour generation failed");
            }
        }
        result
    }

    /// Store an uploaded KML file without running the generation stages.
    #[instrument(skip(self, data), fields(size = data.len()))]
    pub async fn store_upload(
        &self,
        filename: &str,
        data: Vec<u8>,
    ) -> Result<StoredArtifact, PipelineError> {
        timed("persist", self.persister.persist_upload(filename, data)).await
    }

    async fn run(&self, place: &str, count: Option<usize>) -> Result<TourOutcome, PipelineError> {
        let count = count.unwrap_or(self.settings.default_placemark_count);
        if !(MIN_PLACEMARK_COUNT..=MAX_PLACEMARK_COUNT).contains(&count) {
            return Err(PipelineError::InvalidInput(format!(
                "count must be between {} and {}",
                MIN_PLACEMARK_COUNT, MAX_PLACEMARK_COUNT
            )));
        }

        let request = build_tour_prompt(place, count, &self.settings.template)?;
        info!(place = %place.trim(), placemark_count = count, "Requesting tour document");

        let generated = timed("generate", self.text_provider.complete(&request)).await?;

        let started = Instant::now();
        let document = extract_placemarks(&generated);
        record_stage("extract", started.elapsed());
        let document = document?;
        let points = document.points();
        let center = document.centroid();
        info!(
            placemark_count = points.len(),
            document = ?document.name,
            "Placemarks extracted"
        );

        let route_request = RouteRequest::walking(&points, &self.route_options)?;
        info!(waypoints = route_request.intermediates.len(), "Requesting walking route");

        let route = timed("route", self.route_provider.compute_route(&route_request)).await?;
        info!(
            path_points = route.path.len(),
            distance_meters = ?route.distance_meters,
            duration = ?route.duration,
            "Route computed"
        );

        // Merge inside the stored region so prose around it cannot take the route.
        let document_text = extract_document(&generated)?;
        let fragment = render_route_placemark(&route);
        let (merged, route_inserted) = match merge_route(document_text, &fragment) {
            Ok(merged) => (merged, true),
            Err(PipelineError::NoInsertionPoint) => {
                warn!("No placemark closing tag found, storing document without route");
                (document_text.to_string(), false)
            }
            Err(e) => return Err(e),
        };

        let artifact = timed("persist", self.persister.persist_document(&merged)).await?;

        Ok(TourOutcome {
            artifact,
            center,
            placemark_count: points.len(),
            route_inserted,
        })
    }
}

async fn timed<T, F>(stage: &'static str, future: F) -> T
where
    F: Future<Output = T>,
{
    let started = Instant::now();
    let output = future.await;
    record_stage(stage, started.elapsed());
    output
}
