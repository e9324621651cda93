use async_trait::async_trait;
use log::{error, info};
use reqwest::StatusCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use utoipa::ToSchema;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to reach the weather API: {0}")]
    Transport(#[from] reqwest_middleware::Error),
    #[error("Weather API returned status {0}")]
    Status(StatusCode),
    #[error("Failed to decode weather API response: {0}")]
    Decode(#[from] reqwest::Error),
}

/// One match returned by the location search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LocationSuggestion {
    pub id: Option<i64>,
    pub name: String,
    pub region: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub url: Option<String>,
}

/// Upstream weather API operations.
#[async_trait]
pub trait WeatherApi: Send + Sync {
    /// Full forecast tree for a free-form location query. The shape is kept
    /// as raw JSON; flattening happens downstream.
    async fn forecast(&self, location: &str, days: u8) -> Result<Value, Error>;
    /// Location autocomplete matches for a partial query.
    async fn search(&self, query: &str) -> Result<Vec<LocationSuggestion>, Error>;
}

pub struct WeatherApiClient {
    client: ClientWithMiddleware,
    base_url: String,
    api_key: String,
}

impl WeatherApiClient {
    /// Wraps reqwest with retries on transient upstream failures.
    pub fn new(base_url: String, api_key: String) -> Result<Self, reqwest::Error> {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);
        let client = ClientBuilder::new(
            reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()?,
        )
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build();

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }
}

#[async_trait]
impl WeatherApi for WeatherApiClient {
    async fn forecast(&self, location: &str, days: u8) -> Result<Value, Error> {
        info!("fetching weather data for location: {}", location);
        let url = format!("{}/v1/forecast.json", self.base_url);
        let days = days.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", location),
                ("days", days.as_str()),
                ("aqi", "yes"),
                ("alerts", "yes"),
                ("marine", "yes"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            error!(
                "weather API returned {} for location: {}",
                response.status(),
                location
            );
            return Err(Error::Status(response.status()));
        }

        Ok(response.json().await?)
    }

    async fn search(&self, query: &str) -> Result<Vec<LocationSuggestion>, Error> {
        info!("searching locations matching: {}", query);
        let url = format!("{}/v1/search.json", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", query)])
            .send()
            .await?;

        if !response.status().is_success() {
            error!(
                "weather API search returned {} for query: {}",
                response.status(),
                query
            );
            return Err(Error::Status(response.status()));
        }

        Ok(response.json().await?)
    }
}
