use serde::Deserialize;

pub const DEFAULT_OUTPUT_FILE: &str = "router-monitor-dashboard.json";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PublishConfig {
    #[serde(default = "default_output_file")]
    pub output_file: String,
    #[serde(default)]
    pub grafana_url: Option<String>,
    #[serde(default)]
    pub grafana_token: Option<String>,
    #[serde(default)]
    pub grafana_folder_uid: Option<String>,
    #[serde(default = "default_overwrite")]
    pub overwrite: bool,
}

fn default_output_file() -> String {
    DEFAULT_OUTPUT_FILE.to_string()
}

fn default_overwrite() -> bool {
    true
}

impl PublishConfig {
    /// Grafana base URL, if uploading is enabled
    pub fn grafana_url(&self) -> Option<&str> {
        non_empty(&self.grafana_url)
    }

    pub fn grafana_token(&self) -> Option<&str> {
        non_empty(&self.grafana_token)
    }

    pub fn grafana_folder_uid(&self) -> Option<&str> {
        non_empty(&self.grafana_folder_uid)
    }

    fn validate(mut self) -> anyhow::Result<Self> {
        if self.output_file.trim().is_empty() {
            self.output_file = default_output_file();
        }
        if let Some(url) = self.grafana_url() {
            anyhow::ensure!(
                url.starts_with("http://") || url.starts_with("https://"),
                "grafana_url must start with http:// or https://, got {}",
                url
            );
        }
        Ok(self)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Load from an optional `config/dashboard` file overlaid by environment
/// variables (`GRAFANA_URL`, `GRAFANA_TOKEN`, `OUTPUT_FILE`, ...).
pub fn load_publish_config() -> anyhow::Result<PublishConfig> {
    load_publish_config_with_env(config::Environment::default())
}

/// Same as [`load_publish_config`] with an explicit environment source.
pub fn load_publish_config_with_env(environment: config::Environment) -> anyhow::Result<PublishConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(environment)
        .build()?;

    let config: PublishConfig = settings.try_deserialize()?;
    config.validate()
}

/// Parse and validate config from a TOML string (e.g. for tests).
pub fn load_publish_config_from_str(s: &str) -> anyhow::Result<PublishConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::from_str(s, config::FileFormat::Toml))
        .build()?;

    let config: PublishConfig = settings.try_deserialize()?;
    config.validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = load_publish_config_from_str("").unwrap();
        assert_eq!(config.output_file, DEFAULT_OUTPUT_FILE);
        assert!(config.overwrite);
        assert_eq!(config.grafana_url(), None);
        assert_eq!(config.grafana_token(), None);
    }

    #[test]
    fn test_grafana_settings() {
        let config = load_publish_config_from_str(
            r#"
output_file = "out/dashboard.json"
grafana_url = "http://grafana.lan:3000/"
grafana_token = "glsa_abc"
grafana_folder_uid = "network"
overwrite = false
"#,
        )
        .unwrap();

        assert_eq!(config.output_file, "out/dashboard.json");
        assert_eq!(config.grafana_url(), Some("http://grafana.lan:3000/"));
        assert_eq!(config.grafana_token(), Some("glsa_abc"));
        assert_eq!(config.grafana_folder_uid(), Some("network"));
        assert!(!config.overwrite);
    }

    #[test]
    fn test_blank_url_disables_upload() {
        let config = load_publish_config_from_str(r#"grafana_url = "  ""#).unwrap();
        assert_eq!(config.grafana_url(), None);
    }

    #[test]
    fn test_rejects_url_without_scheme() {
        let err = load_publish_config_from_str(r#"grafana_url = "grafana.lan:3000""#).unwrap_err();
        assert!(err.to_string().contains("grafana_url"));
    }

    #[test]
    fn test_empty_output_file_falls_back_to_default() {
        let config = load_publish_config_from_str(r#"output_file = """#).unwrap();
        assert_eq!(config.output_file, DEFAULT_OUTPUT_FILE);
    }

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let map: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::default().source(Some(map))
    }

    #[test]
    fn test_environment_overrides() {
        let config = load_publish_config_with_env(env(&[
            ("GRAFANA_URL", "http://grafana.lan:3000"),
            ("GRAFANA_TOKEN", ""),
            ("OVERWRITE", "false"),
            ("OUTPUT_FILE", "out/router.json"),
        ]))
        .unwrap();

        assert_eq!(config.grafana_url(), Some("http://grafana.lan:3000"));
        assert_eq!(config.grafana_token(), None);
        assert!(!config.overwrite);
        assert_eq!(config.output_file, "out/router.json");
    }

    #[test]
    fn test_environment_without_grafana_url() {
        let config = load_publish_config_with_env(env(&[("OUTPUT_FILE", "")])).unwrap();
        assert_eq!(config.grafana_url(), None);
        assert_eq!(config.output_file, DEFAULT_OUTPUT_FILE);
        assert!(config.overwrite);
    }

    #[test]
    fn test_environment_rejects_bad_grafana_url() {
        let err = load_publish_config_with_env(env(&[("GRAFANA_URL", "grafana.lan")])).unwrap_err();
        assert!(err.to_string().contains("grafana_url"));
    }
}
