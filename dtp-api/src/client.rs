//! Authenticated JSON transport to the platform.
//!
//! Every request carries the developer token as a bearer credential. Status
//! and body problems are reported as [`RequestError`] values carrying the
//! request URL.

use crate::error::ApiResult;
use config::DtpSettings;
use errors::RequestError;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the Digital Twin Platform.
///
/// Holds the validated settings and a pooled `reqwest` client. Cloning is
/// cheap; clones share the connection pool.
#[derive(Clone)]
pub struct DtpClient {
    client: Client,
    settings: Arc<DtpSettings>
}

impl DtpClient {
    pub fn new(settings: Arc<DtpSettings>) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RequestError::Transport {
                url: settings.domain().to_string(),
                reason: e.to_string()
            })?;

        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &DtpSettings {
        &self.settings
    }

    /// POST a JSON body with the developer token and return the parsed
    /// JSON response.
    ///
    /// Any non-2xx status is a [`RequestError::Status`] carrying the body
    /// text; a 2xx body that is not JSON is a
    /// [`RequestError::MalformedResponse`].
    pub async fn post_general_request(&self, url: &str, payload: &Value) -> ApiResult<Value> {
        debug!(url = %url, "Making DTP API request");

        let response = self
            .client
            .post(url)
            .bearer_auth(self.settings.token())
            .header("Accept", "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| RequestError::Transport {
                url: url.to_string(),
                reason: e.to_string()
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| RequestError::Transport {
            url: url.to_string(),
            reason: e.to_string()
        })?;

        if !status.is_success() {
            return Err(RequestError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body
            }
            .into());
        }

        let value: Value = serde_json::from_str(&body).map_err(|e| RequestError::MalformedResponse {
            url: url.to_string(),
            reason: e.to_string()
        })?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use config::{DtpConfigFile, UriMappings};
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(dir: &TempDir, domain: &str) -> DtpClient {
        let config = DtpConfigFile {
            dtp_domain: domain.to_string(),
            kpi_domain: domain.to_string(),
            log_dir: dir.path().join("logs").display().to_string(),
            dev_token: None,
            auth_url: None
        };
        let mut mappings = UriMappings::default();
        mappings
            .ontology_uris
            .insert("task".to_string(), "https://onto/Task".to_string());
        let settings = DtpSettings::from_parts(config, mappings, "dev-token").unwrap();
        DtpClient::new(Arc::new(settings)).unwrap()
    }

    #[tokio::test]
    async fn test_post_sends_token_and_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/count"))
            .and(header("Authorization", "Bearer dev-token"))
            .and(body_json(json!({ "edge": true })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total_items": 3 })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let dir = TempDir::new().unwrap();
        let client = client(&dir, &mock_server.uri());
        let url = format!("{}/api/count", mock_server.uri());
        let value = client
            .post_general_request(&url, &json!({ "edge": true }))
            .await
            .unwrap();

        assert_eq!(value["total_items"], 3);
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&mock_server)
            .await;

        let dir = TempDir::new().unwrap();
        let client = client(&dir, &mock_server.uri());
        let result = client
            .post_general_request(&mock_server.uri(), &json!({}))
            .await;

        match result {
            Err(ApiError::Request(RequestError::Status { status, body, .. })) => {
                assert_eq!(status, 403);
                assert_eq!(body, "forbidden");
            }
            other => panic!("unexpected result: {other:?}")
        }
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&mock_server)
            .await;

        let dir = TempDir::new().unwrap();
        let client = client(&dir, &mock_server.uri());
        let result = client
            .post_general_request(&mock_server.uri(), &json!({}))
            .await;

        assert!(matches!(
            result,
            Err(ApiError::Request(RequestError::MalformedResponse { .. }))
        ));
    }
}
