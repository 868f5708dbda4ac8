use std::fmt;

use async_trait::async_trait;
use log::{debug, warn};
use serde::de::DeserializeOwned;

use super::types::{CountryDetail, CountrySummary};

/// Errors that can occur while talking to the country API.
/// Every variant collapses to the same UI outcome (cleared result); the
/// distinction exists for the log.
#[derive(Debug)]
pub enum ApiError {
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// API returned a non-success status.
    Api { status: u16, message: String },
    /// Failed to parse the response body.
    Parse(String),
    /// The mpsc channel was closed (event loop dropped the receiver).
    ChannelClosed,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
            ApiError::ChannelClosed => write!(f, "channel closed"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Source of country data. The resolver and the TUI only ever see this trait.
#[async_trait]
pub trait CountryProvider: Send + Sync {
    /// Fetches the full directory of countries (code + name only).
    async fn fetch_directory(&self) -> Result<Vec<CountrySummary>, ApiError>;

    /// Fetches the detail record for one country code.
    async fn fetch_country(&self, code: &str) -> Result<CountryDetail, ApiError>;
}

/// REST Countries v2 client.
pub struct RestCountriesClient {
    base_url: String,
    client: reqwest::Client,
}

impl RestCountriesClient {
    /// Creates a new client.
    ///
    /// # Arguments
    /// * `base_url` - Optional custom base URL (defaults to the public API)
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            base_url: base_url.unwrap_or_else(|| "https://restcountries.com/v2".to_string()),
            client: reqwest::Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, ApiError> {
        debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        debug!("Response status for {url}: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("API error: {status} - {message}");
            return Err(ApiError::Api { status, message });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[async_trait]
impl CountryProvider for RestCountriesClient {
    async fn fetch_directory(&self) -> Result<Vec<CountrySummary>, ApiError> {
        self.get_json(format!("{}/all?fields=alpha3Code,name", self.base_url))
            .await
    }

    async fn fetch_country(&self, code: &str) -> Result<CountryDetail, ApiError> {
        self.get_json(format!("{}/alpha/{code}", self.base_url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Api {
            status: 404,
            message: "not found".to_string(),
        };
        assert_eq!(err.to_string(), "API error (HTTP 404): not found");

        let err = ApiError::Network("connection refused".to_string());
        assert_eq!(err.to_string(), "network error: connection refused");
    }

    #[test]
    fn test_client_defaults_to_public_api() {
        let client = RestCountriesClient::new(None);
        assert_eq!(client.base_url, "https://restcountries.com/v2");
    }

    #[test]
    fn test_client_accepts_custom_base_url() {
        let client = RestCountriesClient::new(Some("http://localhost:8080".to_string()));
        assert_eq!(client.base_url, "http://localhost:8080");
    }
}
