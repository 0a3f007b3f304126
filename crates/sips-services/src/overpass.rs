//! Nearby cafe search against the Overpass API.

use reqwest::Client;
use serde::Deserialize;
use sips_core::{CafeSearchError, NetworkError, ReqwestErrorExt};
use sips_location::Coordinates;
use std::collections::HashMap;
use std::time::Duration;
use tracing::instrument;

use crate::cafe::{CafeCandidate, CafeId, UNNAMED_CAFE};

/// Cafe search errors
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("No cafes found")]
    NoCafesFound,
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Overpass returned status {0}")]
    Status(u16),
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<SearchError> for CafeSearchError {
    fn from(e: SearchError) -> Self {
        let cause = match e {
            SearchError::NoCafesFound => return CafeSearchError::NothingFound,
            SearchError::Network(e) => e.into_network_error(),
            SearchError::Status(status) => NetworkError::ServerError {
                status,
                message: "Overpass request rejected".to_string(),
            },
            SearchError::Parse(message) => NetworkError::InvalidResponse(message),
        };
        CafeSearchError::Failed(cause)
    }
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    id: CafeId,
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

impl OverpassElement {
    fn into_candidate(self) -> Option<CafeCandidate> {
        let (latitude, longitude) = (self.lat?, self.lon?);
        let name = self
            .tags
            .get("name")
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .unwrap_or(UNNAMED_CAFE)
            .to_string();

        Some(CafeCandidate {
            id: self.id,
            name,
            latitude,
            longitude,
        })
    }
}

/// Overpass QL selecting cafe nodes within `radius` meters of `coords`
pub fn cafe_query(coords: &Coordinates, radius: u32) -> String {
    format!(
        "[out:json];node[\"amenity\"=\"cafe\"](around:{},{},{});out;",
        radius, coords.latitude, coords.longitude
    )
}

#[derive(Debug, Clone)]
pub struct CafeFetcher {
    client: Client,
    base_url: String,
    radius: u32,
}

impl CafeFetcher {
    /// # Errors
    /// Fails only if the HTTP client cannot be built.
    pub fn new(base_url: &str, radius: u32, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            radius,
        })
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Cafes around `coords`, in the order Overpass returns them.
    ///
    /// # Errors
    /// `NoCafesFound` for an empty result; `Network`, `Status` or `Parse`
    /// when the search itself fails.
    #[instrument(skip(self), level = "info")]
    pub async fn nearby(&self, coords: &Coordinates) -> Result<Vec<CafeCandidate>, SearchError> {
        let query = cafe_query(coords, self.radius);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("data", query.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Overpass returned status {}", status);
            return Err(SearchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed: OverpassResponse =
            serde_json::from_str(&body).map_err(|e| SearchError::Parse(e.to_string()))?;

        let cafes: Vec<CafeCandidate> = parsed
            .elements
            .into_iter()
            .filter_map(OverpassElement::into_candidate)
            .collect();

        if cafes.is_empty() {
            tracing::info!("No cafes within {}m of {}", self.radius, coords);
            return Err(SearchError::NoCafesFound);
        }

        tracing::info!("Found {} cafes near {}", cafes.len(), coords);
        Ok(cafes)
    }
}
