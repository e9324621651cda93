use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Client, StatusCode};
use serde_json::json;
use std::time::Duration;

use crate::weather::{Point, MEASUREMENT};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to reach InfluxDB: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("InfluxDB returned status {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Time-series store operations used by the persistence pipeline.
#[async_trait]
pub trait TimeSeriesStore: Send + Sync {
    /// Whether the store answered its health probe.
    async fn is_connected(&self) -> bool;
    /// Writes a single point into the configured bucket.
    async fn write_point(&self, point: &Point) -> Result<(), Error>;
    /// Advisory read-back: whether any point tagged with `location` landed
    /// in the last hour.
    async fn verify_write(&self, location: &str) -> Result<bool, Error>;
    /// Drops every stored point of one measurement across all time.
    async fn delete_measurement(&self, measurement: &str) -> Result<(), Error>;
}

/// InfluxDB v2 HTTP client: token auth, line protocol writes, Flux reads.
pub struct InfluxClient {
    client: Client,
    url: String,
    token: String,
    org: String,
    bucket: String,
}

impl InfluxClient {
    pub fn new(
        url: String,
        token: String,
        org: String,
        bucket: String,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            client,
            url,
            token,
            org,
            bucket,
        })
    }

    fn auth_header(&self) -> String {
        format!("Token {}", self.token)
    }

    async fn require_success(response: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(Error::Status { status, body })
    }
}

#[async_trait]
impl TimeSeriesStore for InfluxClient {
    async fn is_connected(&self) -> bool {
        let url = format!("{}/health", self.url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("InfluxDB health check failed: {}", e);
                false
            }
        }
    }

    async fn write_point(&self, point: &Point) -> Result<(), Error> {
        let url = format!("{}/api/v2/write", self.url);
        let line = point.to_line_protocol();
        debug!("writing to '{}': {}", self.bucket, line);

        let response = self
            .client
            .post(&url)
            .query(&[("org", self.org.as_str()), ("bucket", self.bucket.as_str())])
            .header("Authorization", self.auth_header())
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(line)
            .send()
            .await?;
        Self::require_success(response).await?;

        Ok(())
    }

    async fn verify_write(&self, location: &str) -> Result<bool, Error> {
        let url = format!("{}/api/v2/query", self.url);
        let flux = format!(
            "from(bucket: \"{}\")\n\
             |> range(start: -1h)\n\
             |> filter(fn: (r) => r._measurement == \"{}\")\n\
             |> filter(fn: (r) => r.location == \"{}\")\n\
             |> limit(n: 10)",
            escape_flux_string(&self.bucket),
            MEASUREMENT,
            escape_flux_string(location)
        );

        let response = self
            .client
            .post(&url)
            .query(&[("org", self.org.as_str())])
            .header("Authorization", self.auth_header())
            .header("Content-Type", "application/vnd.flux")
            .header("Accept", "application/csv")
            .body(flux)
            .send()
            .await?;
        let response = Self::require_success(response).await?;

        let body = response.text().await?;
        Ok(has_csv_records(&body))
    }

    async fn delete_measurement(&self, measurement: &str) -> Result<(), Error> {
        let url = format!("{}/api/v2/delete", self.url);
        info!(
            "deleting measurement '{}' from bucket '{}'",
            measurement, self.bucket
        );

        let body = json!({
            "start": "1970-01-01T00:00:00Z",
            "stop": "2099-12-31T23:59:59Z",
            "predicate": format!("_measurement=\"{}\"", measurement),
        });
        let response = self
            .client
            .post(&url)
            .query(&[("org", self.org.as_str()), ("bucket", self.bucket.as_str())])
            .header("Authorization", self.auth_header())
            .json(&body)
            .send()
            .await?;
        Self::require_success(response).await?;

        Ok(())
    }
}

/// Flux query results come back as annotated CSV: '#' annotation rows, one
/// header row per table, then data rows. Any row past a header means at
/// least one record matched.
fn has_csv_records(body: &str) -> bool {
    let mut saw_header = false;
    for line in body.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if saw_header {
            return true;
        }
        saw_header = true;
    }
    false
}

fn escape_flux_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
