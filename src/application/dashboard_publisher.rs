// Publisher trait for dashboard output sinks
use crate::domain::dashboard::Dashboard;
use async_trait::async_trait;

#[async_trait]
pub trait DashboardPublisher: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Deliver the dashboard; called once per run, never retried
    async fn publish(&self, dashboard: &Dashboard) -> anyhow::Result<()>;
}
