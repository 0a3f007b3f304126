//! Cafe records as they move through the pipeline.

use serde::{Deserialize, Serialize};
use sips_location::Coordinates;

use crate::rating::Rating;

/// OpenStreetMap node id; the immutable key of a cafe.
pub type CafeId = u64;

pub const UNNAMED_CAFE: &str = "Unnamed Cafe";

/// A nearby cafe before photo/address enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct CafeCandidate {
    pub id: CafeId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl CafeCandidate {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// A candidate plus everything needed to draw its card.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedCafe {
    pub id: CafeId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub photo_url: String,
    pub address: String,
    pub rating: Rating,
}

impl EnrichedCafe {
    pub fn from_candidate(
        candidate: CafeCandidate,
        photo_url: String,
        address: String,
        rating: Rating,
    ) -> Self {
        Self {
            id: candidate.id,
            name: candidate.name,
            latitude: candidate.latitude,
            longitude: candidate.longitude,
            photo_url,
            address,
            rating,
        }
    }
}

/// The persisted form of a kept cafe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedCafe {
    pub name: String,
    #[serde(rename = "osm_id")]
    pub id: CafeId,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
    #[serde(rename = "photo")]
    pub photo_url: String,
    pub address: String,
    pub rating: Rating,
}

impl From<&EnrichedCafe> for SavedCafe {
    fn from(cafe: &EnrichedCafe) -> Self {
        Self {
            name: cafe.name.clone(),
            id: cafe.id,
            latitude: cafe.latitude,
            longitude: cafe.longitude,
            photo_url: cafe.photo_url.clone(),
            address: cafe.address.clone(),
            rating: cafe.rating,
        }
    }
}
