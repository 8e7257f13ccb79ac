use crate::client::error::ClientError;
use crate::client::query::AdapterQuery;
use crate::client::IpmService;
use crate::types::resource::Resource;
use crate::types::weather_parameter::WeatherParameter;
use crate::types::weather_response::WeatherAdapterResponse;
use bon::bon;
use log::{debug, info, warn};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://platform.ipmdecisions.net/api";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Blocking HTTP client for the IPM Decisions weather service.
///
/// Every call performs exactly one GET request and waits for the full body.
#[derive(Debug, Clone)]
pub struct IpmClient {
    weather_api_url: String,
    http: Client,
}

#[bon]
impl IpmClient {
    /// Creates a client.
    ///
    /// * `.base_url(impl Into<String>)`: Optional. Platform API root, defaults to
    ///   [`DEFAULT_BASE_URL`]. The weather service lives under `{base_url}/wx`.
    /// * `.timeout(Duration)`: Optional. Whole-request timeout; reqwest's default
    ///   applies when unset.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::HttpClientBuild`] if the TLS backend cannot be initialised.
    #[builder]
    pub fn new(
        #[builder(into)] base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut builder = Client::builder().user_agent(USER_AGENT).gzip(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::HttpClientBuild)?;
        Ok(Self {
            weather_api_url: weather_api_url(&base_url),
            http,
        })
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        info!("Requesting {}", url);
        debug!("Query parameters: {:?}", query);

        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .map_err(|e| ClientError::NetworkRequest(url.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    ClientError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    }
                } else {
                    ClientError::NetworkRequest(url.to_string(), e)
                });
            }
        };

        let body = response
            .text()
            .map_err(|e| ClientError::NetworkRequest(url.to_string(), e))?;
        debug!("Received {} bytes from {}", body.len(), url);

        serde_json::from_str(&body).map_err(|e| ClientError::JsonParse {
            url: url.to_string(),
            source: e,
        })
    }
}

impl IpmService for IpmClient {
    fn weather_data_sources(&self) -> Result<Vec<Resource>, ClientError> {
        let url = format!("{}/rest/weatherdatasource", self.weather_api_url);
        self.get_json(&url, &[])
    }

    fn weather_parameters(&self) -> Result<Vec<WeatherParameter>, ClientError> {
        let url = format!("{}/rest/parameter", self.weather_api_url);
        self.get_json(&url, &[])
    }

    fn weather_adapter(
        &self,
        endpoint: &str,
        query: &AdapterQuery,
    ) -> Result<WeatherAdapterResponse, ClientError> {
        self.get_json(endpoint, &query.to_pairs())
    }

    fn weather_api_url(&self) -> &str {
        &self.weather_api_url
    }
}

fn weather_api_url(base_url: &str) -> String {
    format!("{}/wx", base_url.trim_end_matches('/'))
}
