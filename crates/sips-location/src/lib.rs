//! Location services for Sips & Spots
//!
//! Resolves the user's coordinates through a short-lived cache and a
//! platform provider, and turns coordinates back into addresses.

pub mod cache;
pub mod geocode;
pub mod location;
pub mod resolver;
pub mod types;

pub use cache::{CachedLocation, LocationCache};
pub use geocode::{ReverseGeocoder, ADDRESS_NOT_FOUND};
pub use location::{FixedLocationProvider, LocationProvider, SystemLocationProvider};
pub use resolver::LocationResolver;
pub use types::*;
