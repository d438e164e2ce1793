//! Backend API client implementation

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{header, Method};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::{
    config::HttpConfig,
    error::{BackendError, Result},
    models::{BackendUser, LoginRequest},
};

/// Mockable backend API
///
/// One method per backend endpoint. Bodies are passed through as JSON so the
/// portal never drops fields it does not model.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// `POST /auth/login`
    async fn login(&self, credentials: &LoginRequest) -> Result<BackendUser>;

    /// `POST /ai-diagnosis`
    async fn ai_diagnosis(&self, body: &Value) -> Result<Value>;

    /// `POST /project-registration`
    async fn register_project(&self, body: &Value) -> Result<Value>;

    /// `GET /project-info/:companyId`
    async fn project_info(&self, company_id: &str) -> Result<Value>;

    /// `GET /matching-result/:projectId`
    async fn matching_result(&self, project_id: &str) -> Result<Value>;

    /// `PUT /favorites/:matchingId`
    async fn toggle_favorite(&self, matching_id: &str, body: &Value) -> Result<Value>;
}

/// Production backend client
pub struct BackendClient {
    inner: reqwest::Client,
    base_url: Option<Url>,
}

impl BackendClient {
    /// Create a new backend client with configuration
    pub fn new(config: HttpConfig) -> Result<Self> {
        let base_url = config
            .base_url
            .as_deref()
            .map(|raw| Url::parse(raw).map_err(|e| BackendError::InvalidUrl(e.to_string())))
            .transpose()?;

        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| BackendError::BuildError(e.to_string()))?;

        Ok(Self { inner, base_url })
    }

    /// Resolve backend path segments against the base URL, percent-encoding each one
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone().ok_or(BackendError::NotConfigured)?;
        if url.cannot_be_a_base() {
            return Err(BackendError::InvalidUrl(format!("{url} cannot be a base")));
        }
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidUrl("base URL has no path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&Value>,
        no_cache: bool,
    ) -> Result<Value> {
        let url = self.endpoint(segments)?;
        debug!("Backend {} {}", method, url);

        let mut request = self
            .inner
            .request(method.clone(), url.clone())
            .header(header::CONTENT_TYPE, "application/json");
        if no_cache {
            request = request
                .header(header::CACHE_CONTROL, "no-cache, no-store, must-revalidate")
                .header(header::PRAGMA, "no-cache")
                .header(header::EXPIRES, "0");
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!("Backend {} {} -> {}", method, url, status);

        // Check for HTTP error status
        if !status.is_success() {
            return Err(BackendError::HttpStatus {
                status: status.as_u16(),
                body: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string()),
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| BackendError::Decode(e.to_string()))
    }
}

#[async_trait]
impl BackendApi for BackendClient {
    async fn login(&self, credentials: &LoginRequest) -> Result<BackendUser> {
        let body = serde_json::to_value(credentials)
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        let user = self
            .send(Method::POST, &["auth", "login"], Some(&body), false)
            .await?;
        serde_json::from_value(user).map_err(|e| BackendError::Decode(e.to_string()))
    }

    async fn ai_diagnosis(&self, body: &Value) -> Result<Value> {
        self.send(Method::POST, &["ai-diagnosis"], Some(body), false)
            .await
    }

    async fn register_project(&self, body: &Value) -> Result<Value> {
        self.send(Method::POST, &["project-registration"], Some(body), false)
            .await
    }

    async fn project_info(&self, company_id: &str) -> Result<Value> {
        self.send(Method::GET, &["project-info", company_id], None, false)
            .await
    }

    async fn matching_result(&self, project_id: &str) -> Result<Value> {
        self.send(Method::GET, &["matching-result", project_id], None, true)
            .await
    }

    async fn toggle_favorite(&self, matching_id: &str, body: &Value) -> Result<Value> {
        self.send(Method::PUT, &["favorites", matching_id], Some(body), false)
            .await
    }
}

/// Create a shared backend client (Arc-wrapped for cloning)
pub fn shared_client(config: HttpConfig) -> Result<Arc<dyn BackendApi>> {
    Ok(Arc::new(BackendClient::new(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation_with_defaults() {
        let client = BackendClient::new(HttpConfig::default()).unwrap();
        assert!(client.base_url.is_none());
    }

    #[test]
    fn test_invalid_base_url() {
        let result = BackendClient::new(HttpConfig::default().with_base_url("not a url"));
        assert!(matches!(result, Err(BackendError::InvalidUrl(_))));
    }

    #[test]
    fn test_endpoint_rejects_opaque_base() {
        let client =
            BackendClient::new(HttpConfig::default().with_base_url("mailto:ops@example.com"))
                .unwrap();
        match client.endpoint(&["ai-diagnosis"]) {
            Err(BackendError::InvalidUrl(message)) => {
                assert!(message.contains("mailto:ops@example.com"))
            }
            other => panic!("expected InvalidUrl, got {other:?}"),
        }
    }

    #[test]
    fn test_endpoint_joins_and_encodes() {
        let client =
            BackendClient::new(HttpConfig::default().with_base_url("http://backend:8000/api/"))
                .unwrap();
        let url = client.endpoint(&["project-info", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://backend:8000/api/project-info/a%2Fb%20c");
    }

    #[test]
    fn test_endpoint_without_base_url() {
        let client = BackendClient::new(HttpConfig::default()).unwrap();
        assert!(matches!(
            client.endpoint(&["ai-diagnosis"]),
            Err(BackendError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn test_unconfigured_call_fails_fast() {
        let client = BackendClient::new(HttpConfig::default()).unwrap();
        let result = client.project_info("1").await;
        assert!(matches!(result, Err(BackendError::NotConfigured)));
    }
}
