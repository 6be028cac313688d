use crate::config::HttpConfig;
use crate::domain::model::FetchedResponse;
use crate::domain::ports::Transport;
use crate::utils::error::{Result, SocialworthError};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

/// `Transport` backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| SocialworthError::Config {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn fetch(&self, url: &str) -> Result<FetchedResponse> {
        tracing::debug!("Making API request to: {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SocialworthError::transport(url, e.to_string()))?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(SocialworthError::transport(
                url,
                format!("HTTP status {}", status.as_u16()),
            ));
        }

        let content_types = response
            .headers()
            .get_all(CONTENT_TYPE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect();

        let body = response
            .text()
            .await
            .map_err(|e| SocialworthError::transport(url, e.to_string()))?;

        Ok(FetchedResponse {
            body,
            content_types,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_fetch_returns_body_and_content_type() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/count.json");
            then.status(200)
                .header("Content-Type", "application/json")
                .body(r#"{"count": 12}"#);
        });

        let transport = ReqwestTransport::default();
        let response = transport.fetch(&server.url("/count.json")).await.unwrap();

        api_mock.assert();
        assert_eq!(response.body, r#"{"count": 12}"#);
        assert_eq!(response.content_types, vec!["application/json".to_string()]);
        assert!(response.declares_json());
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_transport_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/broken");
            then.status(500);
        });

        let transport = ReqwestTransport::default();
        let err = transport.fetch(&server.url("/broken")).await.unwrap_err();

        api_mock.assert();
        assert!(err.is_transport());
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_is_transport_error() {
        let transport = ReqwestTransport::default();
        let err = transport
            .fetch("http://127.0.0.1:1/unreachable")
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_from_config_sends_user_agent() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/ua")
                .header("user-agent", "share-bot/2.0");
            then.status(200).body("ok");
        });

        let config = HttpConfig {
            timeout_seconds: 5,
            user_agent: "share-bot/2.0".to_string(),
        };
        let transport = ReqwestTransport::from_config(&config).unwrap();
        let response = transport.fetch(&server.url("/ua")).await.unwrap();

        api_mock.assert();
        assert_eq!(response.body, "ok");
        assert!(!response.declares_json());
    }
}
