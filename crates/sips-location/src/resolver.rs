use chrono::{DateTime, Utc};

use crate::cache::LocationCache;
use crate::location::LocationProvider;
use crate::types::{Coordinates, LocationError};

/// Resolves the user's coordinates, consulting the cache before the provider.
#[derive(Debug, Clone)]
pub struct LocationResolver<P> {
    provider: P,
    cache: LocationCache,
}

impl<P: LocationProvider> LocationResolver<P> {
    pub fn new(provider: P, cache: LocationCache) -> Self {
        Self { provider, cache }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Resolve now.
    ///
    /// # Errors
    /// Returns the provider's error when no fresh cached location exists and
    /// the provider is denied or unavailable.
    pub async fn resolve(&self) -> Result<Coordinates, LocationError> {
        self.resolve_at(Utc::now()).await
    }

    /// Resolve as of `now`; a cache hit never touches the provider.
    ///
    /// # Errors
    /// See [`LocationResolver::resolve`].
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn resolve_at(&self, now: DateTime<Utc>) -> Result<Coordinates, LocationError> {
        if let Some(coords) = self.cache.fresh_at(now) {
            tracing::debug!("Using cached location {}", coords);
            return Ok(coords);
        }

        let coords = self.provider.current_location().await.map_err(|e| {
            tracing::warn!("Location request failed: {}", e);
            e
        })?;

        // A failed cache write only costs a future prompt.
        if let Err(e) = self.cache.store(coords, now) {
            tracing::warn!("Failed to cache location: {}", e);
        }

        tracing::info!("Resolved location: {}", coords);
        Ok(coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sips_core::JsonStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Counts calls and answers with a fixed result.
    struct CountingProvider {
        calls: Arc<AtomicUsize>,
        result: Option<Coordinates>,
    }

    impl LocationProvider for CountingProvider {
        async fn current_location(&self) -> Result<Coordinates, LocationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.ok_or(LocationError::PermissionDenied)
        }
    }

    fn resolver(
        result: Option<Coordinates>,
    ) -> (tempfile::TempDir, Arc<AtomicUsize>, LocationResolver<CountingProvider>) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = CountingProvider {
            calls: calls.clone(),
            result,
        };
        (dir, calls, LocationResolver::new(provider, LocationCache::new(store)))
    }

    #[tokio::test]
    async fn test_fresh_cache_skips_provider() {
        let (_dir, calls, resolver) = resolver(Some(Coordinates::new(50.0, 8.0)));
        let now = Utc::now();
        let cached = Coordinates::new(12.97, 77.59);
        resolver.cache.store(cached, now - Duration::minutes(5)).unwrap();

        let coords = resolver.resolve_at(now).await.unwrap();
        assert_eq!(coords, cached);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_stale_cache_requests_fresh_location() {
        let fresh = Coordinates::new(50.0, 8.0);
        let (_dir, calls, resolver) = resolver(Some(fresh));
        let now = Utc::now();
        resolver
            .cache
            .store(Coordinates::new(12.97, 77.59), now - Duration::minutes(15))
            .unwrap();

        let coords = resolver.resolve_at(now).await.unwrap();
        assert_eq!(coords, fresh);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // The fresh answer is cached with the new timestamp
        assert_eq!(resolver.cache.fresh_at(now), Some(fresh));
    }

    #[tokio::test]
    async fn test_second_resolve_hits_cache() {
        let (_dir, calls, resolver) = resolver(Some(Coordinates::new(50.0, 8.0)));
        let now = Utc::now();

        resolver.resolve_at(now).await.unwrap();
        resolver.resolve_at(now + Duration::minutes(3)).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_denied_is_reported_and_not_cached() {
        let (_dir, calls, resolver) = resolver(None);
        let now = Utc::now();

        let result = resolver.resolve_at(now).await;
        assert!(matches!(result, Err(LocationError::PermissionDenied)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(resolver.cache.fresh_at(now), None);
    }
}
