// Main entry point - Dependency injection and publishing
mod application;
mod domain;
mod infrastructure;

use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::infrastructure::config::load_publish_config;
use crate::infrastructure::publishers::publishers_for;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Load configuration
    let config = load_publish_config()?;
    tracing::debug!("Publish config: output_file={}, grafana_url={:?}", config.output_file, config.grafana_url());

    // Create publishers (infrastructure layer), file first
    let publishers = publishers_for(&config);

    // Build and publish (application layer)
    let service = DashboardService::new(publishers);
    service.run().await?;

    Ok(())
}
