pub mod config;
pub mod error;
pub mod storage;

pub use config::{
    Config, LocationConfig, SearchConfig, ServiceConfig, ThrottleConfig, ValidationResult,
    DEFAULT_RADIUS_METERS, NOMINATIM_URL, OVERPASS_URL, UNSPLASH_URL,
};
pub use error::{
    AppError, CafeSearchError, LocationAccessError, NetworkError, ReqwestErrorExt, StorageError,
};
pub use storage::{JsonStore, LOCATION_CACHE_KEY, SAVED_CAFES_KEY};

use anyhow::Result;

/// Initialize logging for the application
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    tracing::info!("Sips & Spots core initialized");
    Ok(())
}
