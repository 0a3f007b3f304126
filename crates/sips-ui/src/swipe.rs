//! Swipe gestures: left discards a card, right saves it.
//!
//! Either way the card plays its exit animation and then leaves the deck.
//! There is no undo.

use std::time::Duration;

use sips_core::StorageError;
use sips_services::{CafeId, SaveOutcome, SavedCafe, SavedList};

use crate::deck::Deck;

pub const EXIT_ANIMATION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
}

/// How a card leaves the screen: slide sideways, tilt, fade out
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitAnimation {
    pub translate_x_percent: i32,
    pub rotate_deg: i32,
    pub opacity: f32,
    pub duration: Duration,
}

impl ExitAnimation {
    pub fn for_direction(direction: SwipeDirection, duration: Duration) -> Self {
        let sign = match direction {
            SwipeDirection::Left => -1,
            SwipeDirection::Right => 1,
        };
        Self {
            translate_x_percent: 150 * sign,
            rotate_deg: 15 * sign,
            opacity: 0.0,
            duration,
        }
    }

    /// CSS-style transform, e.g. `translateX(150%) rotate(15deg)`
    pub fn transform(&self) -> String {
        format!(
            "translateX({}%) rotate({}deg)",
            self.translate_x_percent, self.rotate_deg
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwipeOutcome {
    pub card_id: CafeId,
    pub direction: SwipeDirection,
    pub animation: ExitAnimation,
    /// Set for right swipes only
    pub saved: Option<SaveOutcome>,
}

#[derive(Debug, Clone, Copy)]
pub struct SwipeController {
    animation: Duration,
}

impl Default for SwipeController {
    fn default() -> Self {
        Self::new(EXIT_ANIMATION)
    }
}

impl SwipeController {
    pub fn new(animation: Duration) -> Self {
        Self { animation }
    }

    pub fn animation(&self) -> Duration {
        self.animation
    }

    /// Apply a swipe to card `id`.
    ///
    /// Returns `Ok(None)` when the card is not visible. Right swipes are
    /// persisted before the animation starts; if persisting fails the card
    /// still leaves the deck and the error is returned.
    ///
    /// # Errors
    /// Returns a storage error if saving a right-swiped cafe fails.
    pub async fn swipe(
        &self,
        deck: &mut Deck,
        id: CafeId,
        direction: SwipeDirection,
        saved: &SavedList,
    ) -> Result<Option<SwipeOutcome>, StorageError> {
        let Some(cafe) = deck.begin_exit(id) else {
            tracing::debug!("Ignoring swipe on card {} (not visible)", id);
            return Ok(None);
        };

        let save_result = match direction {
            SwipeDirection::Right => Some(saved.save(SavedCafe::from(&cafe))),
            SwipeDirection::Left => None,
        };

        let animation = ExitAnimation::for_direction(direction, self.animation);
        tracing::debug!("Card {} exiting: {}", id, animation.transform());
        tokio::time::sleep(animation.duration).await;
        deck.remove(id);

        let saved = save_result.transpose()?;
        tracing::info!("Swiped {:?} on {} ({})", direction, cafe.name, id);

        Ok(Some(SwipeOutcome {
            card_id: id,
            direction,
            animation,
            saved,
        }))
    }
}
