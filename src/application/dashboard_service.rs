// Dashboard service - Use case for building and publishing the dashboard
use crate::application::dashboard_publisher::DashboardPublisher;
use crate::application::router_dashboard;
use crate::domain::dashboard::Dashboard;
use anyhow::Context;
use std::sync::Arc;

#[derive(Clone)]
pub struct DashboardService {
    publishers: Vec<Arc<dyn DashboardPublisher>>,
}

impl DashboardService {
    pub fn new(publishers: Vec<Arc<dyn DashboardPublisher>>) -> Self {
        Self { publishers }
    }

    pub fn build_dashboard(&self) -> Dashboard {
        let dashboard = router_dashboard::build();
        tracing::debug!(
            "Built dashboard {} with {} panels and {} variables",
            dashboard.uid,
            dashboard.panels.len(),
            dashboard.templating.list.len()
        );
        dashboard
    }

    /// Run every publisher in order, stopping at the first failure
    pub async fn publish(&self, dashboard: &Dashboard) -> anyhow::Result<()> {
        for publisher in &self.publishers {
            publisher
                .publish(dashboard)
                .await
                .with_context(|| format!("Failed to publish dashboard via {}", publisher.name()))?;
        }
        Ok(())
    }

    pub async fn run(&self) -> anyhow::Result<Dashboard> {
        let dashboard = self.build_dashboard();
        self.publish(&dashboard).await?;
        Ok(dashboard)
    }
}
