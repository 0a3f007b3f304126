use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

const APP_DIR: &str = "sips-and-spots";

pub const OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";
pub const UNSPLASH_URL: &str = "https://api.unsplash.com";
pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_RADIUS_METERS: u32 = 2000;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the saved list and the location cache
    pub data_dir: PathBuf,

    /// Remote API endpoints and credentials
    pub services: ServiceConfig,

    /// Nearby search and paging
    #[serde(default)]
    pub search: SearchConfig,

    /// Pacing of reverse-geocoding requests
    #[serde(default)]
    pub throttle: ThrottleConfig,

    /// Location cache and optional fixed coordinates
    #[serde(default)]
    pub location: LocationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Overpass interpreter endpoint
    pub overpass_url: String,

    /// Unsplash API base URL
    pub unsplash_url: String,

    /// Nominatim base URL
    pub nominatim_url: String,

    /// Unsplash access key (optional, can be set via UNSPLASH_ACCESS_KEY)
    pub unsplash_access_key: Option<String>,

    /// Identifying User-Agent; Nominatim rejects anonymous clients
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            overpass_url: OVERPASS_URL.to_string(),
            unsplash_url: UNSPLASH_URL.to_string(),
            nominatim_url: NOMINATIM_URL.to_string(),
            unsplash_access_key: None,
            user_agent: "SipsAndSpots/1.0".to_string(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ServiceConfig {
    /// Access key from the config file, falling back to the environment.
    pub fn unsplash_key(&self) -> Option<String> {
        self.unsplash_access_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var("UNSPLASH_ACCESS_KEY").ok())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search radius around the user, in meters
    pub radius_meters: u32,

    /// Cards shown per page
    pub page_size: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            radius_meters: DEFAULT_RADIUS_METERS,
            page_size: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// Pause between successive address lookups, in milliseconds (0 disables)
    pub address_delay_ms: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            address_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Freshness window of the cached location, in minutes
    #[serde(default = "default_cache_minutes")]
    pub cache_minutes: u32,

    /// Fixed latitude; used instead of the system provider when set with longitude
    pub latitude: Option<f64>,

    /// Fixed longitude
    pub longitude: Option<f64>,
}

fn default_cache_minutes() -> u32 {
    10
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            cache_minutes: default_cache_minutes(),
            latitude: None,
            longitude: None,
        }
    }
}

impl LocationConfig {
    /// Configured coordinates, only when both halves are present.
    pub fn fixed_coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR);

        Self {
            data_dir,
            services: ServiceConfig::default(),
            search: SearchConfig::default(),
            throttle: ThrottleConfig::default(),
            location: LocationConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Warnings are logged; errors fail the load.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.services.overpass_url, "services.overpass_url", &mut result);
        self.validate_url(&self.services.unsplash_url, "services.unsplash_url", &mut result);
        self.validate_url(&self.services.nominatim_url, "services.nominatim_url", &mut result);

        if self.services.user_agent.trim().is_empty() {
            result.add_error(
                "services.user_agent",
                "Nominatim requires an identifying User-Agent",
            );
        }

        if self.services.unsplash_key().is_none() {
            result.add_warning(
                "services.unsplash_access_key",
                "No Unsplash key configured - cards will show placeholder images",
            );
        }

        if self.services.request_timeout_secs == 0 {
            result.add_error(
                "services.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        }

        if self.search.page_size == 0 {
            result.add_error("search.page_size", "Page size must be greater than 0");
        }

        if self.search.radius_meters == 0 {
            result.add_error("search.radius_meters", "Search radius must be greater than 0");
        } else if self.search.radius_meters > 50_000 {
            result.add_warning(
                "search.radius_meters",
                "Search radius is unusually large (>50km); Overpass may time out",
            );
        }

        if self.throttle.address_delay_ms == 0 {
            result.add_warning(
                "throttle.address_delay_ms",
                "Address throttling disabled; Nominatim may reject requests",
            );
        }

        if self.location.cache_minutes == 0 {
            result.add_warning(
                "location.cache_minutes",
                "Location cache disabled (0 minutes)",
            );
        }

        match (self.location.latitude, self.location.longitude) {
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    result.add_error("location.latitude", "Latitude must be within -90..=90");
                }
                if !(-180.0..=180.0).contains(&lon) {
                    result.add_error("location.longitude", "Longitude must be within -180..=180");
                }
            }
            (None, None) => {}
            _ => result.add_error(
                "location",
                "Latitude and longitude must be set together",
            ),
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join(APP_DIR);

        Ok(config_dir.join("config.toml"))
    }
}
