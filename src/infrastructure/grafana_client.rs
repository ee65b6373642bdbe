// Grafana HTTP API client implementation
use crate::application::dashboard_publisher::DashboardPublisher;
use crate::domain::dashboard::Dashboard;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

const COMMIT_MESSAGE: &str = "Generated by router-monitor-dashboard";

#[derive(Debug, thiserror::Error)]
pub enum GrafanaError {
    #[error("failed to send request to Grafana: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Grafana rejected dashboard with status {status}: {body}")]
    Rejected { status: StatusCode, body: String },
    #[error("Grafana accepted dashboard but the response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct GrafanaClient {
    host: String,
    token: Option<String>,
    folder_uid: Option<String>,
    overwrite: bool,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveDashboardRequest<'a> {
    dashboard: &'a Dashboard,
    #[serde(skip_serializing_if = "Option::is_none")]
    folder_uid: Option<&'a str>,
    message: &'a str,
    overwrite: bool,
}

#[derive(Debug, Deserialize)]
pub struct SaveDashboardResponse {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub version: Option<u64>,
}

impl GrafanaClient {
    pub fn new(host: &str, token: Option<String>, folder_uid: Option<String>, overwrite: bool) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            token,
            folder_uid,
            overwrite,
            client: reqwest::Client::new(),
        }
    }

    fn save_url(&self) -> String {
        format!("{}/api/dashboards/db", self.host)
    }

    pub async fn save_dashboard(&self, dashboard: &Dashboard) -> Result<SaveDashboardResponse, GrafanaError> {
        let body = SaveDashboardRequest {
            dashboard,
            folder_uid: self.folder_uid.as_deref(),
            message: COMMIT_MESSAGE,
            overwrite: self.overwrite,
        };

        let mut request = self
            .client
            .post(self.save_url())
            .header("Accept", "application/json")
            .json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        tracing::debug!("Posting dashboard {} to {}", dashboard.uid, self.save_url());
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GrafanaError::Rejected { status, body });
        }

        response
            .json::<SaveDashboardResponse>()
            .await
            .map_err(GrafanaError::Decode)
    }
}

#[async_trait]
impl DashboardPublisher for GrafanaClient {
    fn name(&self) -> &str {
        "grafana"
    }

    async fn publish(&self, dashboard: &Dashboard) -> Result<()> {
        let saved = self.save_dashboard(dashboard).await?;
        tracing::info!(
            "Uploaded dashboard {} to {}{} (status {}, version {})",
            saved.uid.as_deref().unwrap_or(&dashboard.uid),
            self.host,
            saved.url.as_deref().unwrap_or_default(),
            saved.status.as_deref().unwrap_or("unknown"),
            saved.version.map(|v| v.to_string()).unwrap_or_else(|| "?".to_string())
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::router_dashboard;
    use axum::{Json, Router, extract::State, http::HeaderMap, http::StatusCode as AxumStatus, routing::post};
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured {
        body: Arc<Mutex<Option<Value>>>,
        auth: Arc<Mutex<Option<String>>>,
    }

    async fn save(State(captured): State<Captured>, headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        *captured.auth.lock().unwrap() = auth;
        let uid = body["dashboard"]["uid"].clone();
        *captured.body.lock().unwrap() = Some(body);
        Json(json!({ "id": 7, "uid": uid, "url": "/d/router-monitor/router-monitor", "status": "success", "version": 2 }))
    }

    async fn reject() -> (AxumStatus, &'static str) {
        (AxumStatus::PRECONDITION_FAILED, r#"{"message":"version-mismatch"}"#)
    }

    async fn plain_ok() -> &'static str {
        "ok"
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    #[tokio::test]
    async fn test_posts_wrapped_dashboard_with_token() {
        let captured = Captured::default();
        let router = Router::new()
            .route("/api/dashboards/db", post(save))
            .with_state(captured.clone());
        let host = serve(router).await;

        let client = GrafanaClient::new(&host, Some("glsa_test".to_string()), Some("network".to_string()), true);
        let dashboard = router_dashboard::build();
        let saved = client.save_dashboard(&dashboard).await.unwrap();

        assert_eq!(saved.uid.as_deref(), Some("router-monitor"));
        assert_eq!(saved.version, Some(2));
        assert_eq!(captured.auth.lock().unwrap().as_deref(), Some("Bearer glsa_test"));

        let body = captured.body.lock().unwrap().clone().unwrap();
        assert_eq!(body["overwrite"], true);
        assert_eq!(body["folderUid"], "network");
        assert_eq!(body["message"], COMMIT_MESSAGE);
        assert_eq!(body["dashboard"], serde_json::to_value(&dashboard).unwrap());
    }

    #[tokio::test]
    async fn test_omits_auth_and_folder_when_unset() {
        let captured = Captured::default();
        let router = Router::new()
            .route("/api/dashboards/db", post(save))
            .with_state(captured.clone());
        let host = serve(router).await;

        let client = GrafanaClient::new(&host, None, None, false);
        client.publish(&router_dashboard::build()).await.unwrap();

        assert_eq!(*captured.auth.lock().unwrap(), None);
        let body = captured.body.lock().unwrap().clone().unwrap();
        assert_eq!(body["overwrite"], false);
        assert!(body.get("folderUid").is_none());
    }

    #[tokio::test]
    async fn test_rejection_surfaces_status_and_body() {
        let host = serve(Router::new().route("/api/dashboards/db", post(reject))).await;

        let client = GrafanaClient::new(&host, None, None, true);
        let err = client.save_dashboard(&router_dashboard::build()).await.unwrap_err();

        match err {
            GrafanaError::Rejected { status, body } => {
                assert_eq!(status, StatusCode::PRECONDITION_FAILED);
                assert!(body.contains("version-mismatch"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_host_is_request_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = GrafanaClient::new(&format!("http://{}", addr), None, None, true);
        let err = client.publish(&router_dashboard::build()).await.unwrap_err();
        assert!(err.to_string().contains("failed to send request to Grafana"));
    }

    #[tokio::test]
    async fn test_unreadable_success_body_is_decode_error() {
        let host = serve(Router::new().route("/api/dashboards/db", post(plain_ok))).await;

        let client = GrafanaClient::new(&host, None, None, true);
        let err = client.save_dashboard(&router_dashboard::build()).await.unwrap_err();
        assert!(matches!(err, GrafanaError::Decode(_)), "unexpected error: {}", err);
        assert!(err.to_string().contains("could not be decoded"));
    }
}
