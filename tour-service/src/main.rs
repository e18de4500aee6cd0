use service_core::observability::init_tracing;
use tour_service::config::TourConfig;
use tour_service::services::init_metrics;
use tour_service::startup::Application;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = TourConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing("tour-service", "info", &config.otlp_endpoint);
    init_metrics()?;

    let application = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        anyhow::anyhow!("Startup error: {}", e)
    })?;

    tracing::info!(port = application.port(), "Starting tour-service");
    application.run_until_stopped().await?;

    tracing::info!("tour-service stopped");
    Ok(())
}
