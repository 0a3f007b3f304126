//! Short-lived cache of the last resolved location.
//!
//! Avoids prompting the location provider again while the previous answer
//! is still fresh. The stored record keeps the `{lat, lng, timestamp}`
//! shape with a millisecond Unix timestamp.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sips_core::{JsonStore, StorageError, LOCATION_CACHE_KEY};

use crate::types::Coordinates;

/// Default freshness window
pub const DEFAULT_FRESHNESS_MINUTES: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CachedLocation {
    pub lat: f64,
    pub lng: f64,
    /// Unix milliseconds at which the location was resolved
    pub timestamp: i64,
}

impl CachedLocation {
    pub fn new(coords: Coordinates, resolved_at: DateTime<Utc>) -> Self {
        Self {
            lat: coords.latitude,
            lng: coords.longitude,
            timestamp: resolved_at.timestamp_millis(),
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }

    /// Fresh while strictly younger than `window`. A timestamp from the
    /// future (clock moved back) is stale.
    pub fn is_fresh(&self, now: DateTime<Utc>, window: Duration) -> bool {
        let age_ms = now.timestamp_millis() - self.timestamp;
        age_ms >= 0 && age_ms < window.num_milliseconds()
    }
}

#[derive(Debug, Clone)]
pub struct LocationCache {
    store: JsonStore,
    freshness: Duration,
}

impl LocationCache {
    pub fn new(store: JsonStore) -> Self {
        Self::with_freshness(store, Duration::minutes(DEFAULT_FRESHNESS_MINUTES))
    }

    pub fn with_freshness(store: JsonStore, freshness: Duration) -> Self {
        Self { store, freshness }
    }

    pub fn freshness(&self) -> Duration {
        self.freshness
    }

    /// Cached coordinates if present and still fresh at `now`.
    pub fn fresh_at(&self, now: DateTime<Utc>) -> Option<Coordinates> {
        let cached: CachedLocation = match self.store.read(LOCATION_CACHE_KEY) {
            Ok(Some(c)) => c,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to read location cache: {}", e);
                return None;
            }
        };

        if cached.is_fresh(now, self.freshness) {
            Some(cached.coordinates())
        } else {
            tracing::debug!("Cached location expired");
            None
        }
    }

    /// Overwrite the cache with a freshly resolved location
    pub fn store(&self, coords: Coordinates, resolved_at: DateTime<Utc>) -> Result<(), StorageError> {
        self.store
            .write(LOCATION_CACHE_KEY, &CachedLocation::new(coords, resolved_at))
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(LOCATION_CACHE_KEY)
    }
}
