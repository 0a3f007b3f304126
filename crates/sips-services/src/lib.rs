pub mod cafe;
pub mod enrich;
pub mod overpass;
pub mod photo;
pub mod rating;
pub mod saved;
pub mod throttle;

pub use cafe::{CafeCandidate, CafeId, EnrichedCafe, SavedCafe, UNNAMED_CAFE};
pub use enrich::Enricher;
pub use overpass::{CafeFetcher, SearchError};
pub use photo::{PhotoClient, PLACEHOLDER_PHOTO};
pub use rating::{Rating, StarRow};
pub use saved::{SaveOutcome, SavedList};
pub use throttle::ThrottlePolicy;
