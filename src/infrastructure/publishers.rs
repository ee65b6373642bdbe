// Publisher selection from the loaded config
use crate::application::dashboard_publisher::DashboardPublisher;
use crate::infrastructure::config::PublishConfig;
use crate::infrastructure::file_writer::FileWriter;
use crate::infrastructure::grafana_client::GrafanaClient;
use std::sync::Arc;

/// File output always comes first; Grafana upload only when a URL is configured.
pub fn publishers_for(config: &PublishConfig) -> Vec<Arc<dyn DashboardPublisher>> {
    let mut publishers: Vec<Arc<dyn DashboardPublisher>> = vec![Arc::new(FileWriter::new(&config.output_file))];
    match config.grafana_url() {
        Some(url) => publishers.push(Arc::new(GrafanaClient::new(
            url,
            config.grafana_token().map(str::to_string),
            config.grafana_folder_uid().map(str::to_string),
            config.overwrite,
        ))),
        None => tracing::warn!("GRAFANA_URL not set, skipping upload"),
    }
    publishers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::{load_publish_config_from_str, load_publish_config_with_env};

    fn names(config: &PublishConfig) -> Vec<String> {
        publishers_for(config).iter().map(|p| p.name().to_string()).collect()
    }

    #[test]
    fn test_file_only_without_grafana_url() {
        let config = load_publish_config_from_str("").unwrap();
        assert_eq!(names(&config), vec!["file"]);
    }

    #[test]
    fn test_blank_grafana_url_is_file_only() {
        let config = load_publish_config_from_str(r#"grafana_url = " ""#).unwrap();
        assert_eq!(names(&config), vec!["file"]);
    }

    #[test]
    fn test_grafana_url_adds_upload_after_file() {
        let config = load_publish_config_from_str(r#"grafana_url = "http://grafana.lan:3000""#).unwrap();
        assert_eq!(names(&config), vec!["file", "grafana"]);
    }

    #[test]
    fn test_selection_from_environment() {
        let vars: config::Map<String, String> = [("GRAFANA_URL", "https://grafana.lan"), ("OVERWRITE", "false")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let config = load_publish_config_with_env(config::Environment::default().source(Some(vars))).unwrap();
        assert!(!config.overwrite);
        assert_eq!(names(&config), vec!["file", "grafana"]);

        let blank: config::Map<String, String> = [("GRAFANA_URL".to_string(), String::new())].into_iter().collect();
        let config = load_publish_config_with_env(config::Environment::default().source(Some(blank))).unwrap();
        assert_eq!(names(&config), vec!["file"]);
    }
}
