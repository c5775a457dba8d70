//! Shared HTTP client used by every data source.

use std::time::Duration;

use cropwise_core::HttpConfig;
use reqwest::Client;
use serde_json::Value;

use crate::retry::{with_retry, RetryConfig};
use crate::types::WeatherError;

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    retry: RetryConfig,
}

impl HttpClient {
    pub fn new(settings: &HttpConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            retry: RetryConfig::new(
                settings.max_retries,
                settings.initial_backoff_ms,
                settings.max_backoff_ms,
            ),
        })
    }

    /// GET `url` with query parameters and return the JSON body.
    ///
    /// Non-2xx responses become `WeatherError::Api`, carrying the body's
    /// `message`, `error` or `reason` field when there is one.
    pub async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, WeatherError> {
        let response = with_retry(&self.retry, || self.client.get(url).query(query).send()).await?;

        let status = response.status();
        if !status.is_success() {
            let body: Option<Value> = response.json().await.ok();
            let message = body
                .as_ref()
                .and_then(|b| {
                    ["message", "error", "reason"]
                        .iter()
                        .find_map(|key| b.get(*key).and_then(Value::as_str))
                })
                .map(str::to_string)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

            tracing::debug!("GET {} returned {}: {}", url, status, message);
            return Err(WeatherError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))
    }
}

/// Join a configured base URL and an API path.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_slashes() {
        assert_eq!(
            endpoint("https://api.open-meteo.com/", "/v1/forecast"),
            "https://api.open-meteo.com/v1/forecast"
        );
        assert_eq!(endpoint("http://localhost:9000", "geo/1.0/direct"), "http://localhost:9000/geo/1.0/direct");
    }

    #[test]
    fn test_client_builds_from_defaults() {
        assert!(HttpClient::new(&HttpConfig::default()).is_ok());
    }
}
