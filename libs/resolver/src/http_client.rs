use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::errors::RemoteFailure;
use crate::platforms::{Platform, RemoteRequest};
use crate::traits::RemoteResolver;
use crate::ParsedResult;

/// Configuration for the remote resolve service
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub endpoint: String,
    /// Per request timeout. `None` waits for the service indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:7777".to_string(),
            timeout: Some(Duration::from_secs(30)),
        }
    }
}

/// Calls a resolve service over http.
///
/// `POST {endpoint}/parse/{platform}` with the request as json. A 2xx answer carries the
/// parsed result, anything else a `{"error": "..."}` body.
#[derive(Clone)]
pub struct HttpRemoteResolver {
    client: Client,
    config: RemoteConfig,
}

impl HttpRemoteResolver {
    pub fn new(config: RemoteConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    fn parse_url(&self, platform: Platform) -> String {
        format!(
            "{}/parse/{}",
            self.config.endpoint.trim_end_matches('/'),
            platform.as_str()
        )
    }
}

#[async_trait]
impl RemoteResolver for HttpRemoteResolver {
    async fn resolve(
        &self,
        platform: Platform,
        request: &RemoteRequest,
    ) -> Result<ParsedResult, RemoteFailure> {
        let url = self.parse_url(platform);
        log::debug!("[{}]Sending resolve request to: {}", platform, url);

        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            log::warn!("[{}]Resolve service answered {}: {}", platform, status, body);
            return Err(match serde_json::from_str::<RemoteFailure>(&body) {
                Ok(failure) => failure,
                Err(_) => RemoteFailure::new(format!("status {}: {}", status.as_u16(), body)),
            });
        }

        Ok(response.json::<ParsedResult>().await?)
    }
}
