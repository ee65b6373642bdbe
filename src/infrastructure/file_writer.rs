// Writes the dashboard JSON to disk
use crate::application::dashboard_publisher::DashboardPublisher;
use crate::domain::dashboard::Dashboard;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

#[derive(Debug, Clone)]
pub struct FileWriter {
    path: PathBuf,
}

impl FileWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DashboardPublisher for FileWriter {
    fn name(&self) -> &str {
        "file"
    }

    async fn publish(&self, dashboard: &Dashboard) -> Result<()> {
        let mut json = dashboard
            .to_json_pretty()
            .context("Failed to serialize dashboard")?;
        json.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        fs::write(&self.path, json.as_bytes())
            .await
            .with_context(|| format!("failed to write grafana dashboard to {}", self.path.display()))?;

        tracing::info!("Wrote dashboard {} to {}", dashboard.uid, self.path.display());
        Ok(())
    }
}
