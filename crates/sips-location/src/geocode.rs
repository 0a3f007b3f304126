//! Reverse geocoding: convert coordinates to a human-readable address.
//! Uses Nominatim (OpenStreetMap) - free, no API key required, but it
//! rejects clients without an identifying User-Agent.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::types::Coordinates;

pub const ADDRESS_NOT_FOUND: &str = "Address not found";
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    display_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReverseGeocoder {
    client: Client,
    base_url: String,
}

impl ReverseGeocoder {
    /// # Errors
    /// Fails only if the HTTP client cannot be built.
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self, reqwest::Error> {
        Self::with_timeout(base_url, user_agent, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    /// # Errors
    /// Fails only if the HTTP client cannot be built.
    pub fn with_timeout(
        base_url: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Formatted address for `coords`, or `None` on any failure.
    pub async fn lookup(&self, coords: &Coordinates) -> Option<String> {
        let url = format!("{}/reverse", self.base_url);

        let response = match self
            .client
            .get(&url)
            .query(&[
                ("format", "json".to_string()),
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
            ])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("Reverse geocode request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!("Reverse geocode returned status {}", response.status());
            return None;
        }

        let body: NominatimResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!("Reverse geocode parse error: {}", e);
                return None;
            }
        };

        body.display_name.filter(|name| !name.trim().is_empty())
    }

    /// Formatted address for `coords`, falling back to [`ADDRESS_NOT_FOUND`].
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn address_for(&self, coords: &Coordinates) -> String {
        match self.lookup(coords).await {
            Some(address) => address,
            None => ADDRESS_NOT_FOUND.to_string(),
        }
    }
}
