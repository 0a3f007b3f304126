//! Synthetic ratings.
//!
//! There is no real rating source behind a cafe card. The number is random
//! and purely cosmetic; nothing should treat it as a signal.

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const MIN_RATING: f64 = 3.5;
pub const MAX_RATING: f64 = 5.0;
pub const STAR_COUNT: u8 = 5;

const FULL_STAR: char = '★';
const HALF_STAR: char = '⯪';
const EMPTY_STAR: char = '☆';

/// A rating with one decimal place.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Rating(f64);

impl Rating {
    /// Round `value` to one decimal place
    pub fn new(value: f64) -> Self {
        Self((value * 10.0).round() / 10.0)
    }

    /// Random rating in `[MIN_RATING, MAX_RATING]`
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::rng())
    }

    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.random_range(MIN_RATING..=MAX_RATING))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn stars(self) -> StarRow {
        StarRow::for_rating(self.0)
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

// Stored as a one-decimal string ("4.3"); numbers are accepted on read.
impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(Rating::new(n)),
            Raw::Text(s) => s
                .trim()
                .parse::<f64>()
                .map(Rating::new)
                .map_err(serde::de::Error::custom),
        }
    }
}

/// A fixed-width row of five stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarRow {
    pub full: u8,
    pub half: bool,
    pub empty: u8,
}

impl StarRow {
    pub fn for_rating(rating: f64) -> Self {
        let clamped = rating.clamp(0.0, f64::from(STAR_COUNT));
        // Bounded by STAR_COUNT above.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let full = clamped.floor() as u8;
        let half = full < STAR_COUNT && clamped.fract() >= 0.5;
        let empty = STAR_COUNT - full - u8::from(half);
        Self { full, half, empty }
    }
}

impl std::fmt::Display for StarRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for _ in 0..self.full {
            write!(f, "{}", FULL_STAR)?;
        }
        if self.half {
            write!(f, "{}", HALF_STAR)?;
        }
        for _ in 0..self.empty {
            write!(f, "{}", EMPTY_STAR)?;
        }
        Ok(())
    }
}
