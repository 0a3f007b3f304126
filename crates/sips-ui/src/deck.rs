//! The stack of swipeable cards for the current page.

use sips_services::{CafeId, EnrichedCafe};

/// Depth of the top card; each card below sits one lower.
pub const TOP_Z_INDEX: i32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    Visible,
    /// Playing its exit animation; gone once it finishes
    Exiting,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub cafe: EnrichedCafe,
    pub z_index: i32,
    pub state: CardState,
}

#[derive(Debug, Clone, Default)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Stack `cafes` with the first one on top
    pub fn from_page(cafes: Vec<EnrichedCafe>) -> Self {
        let cards = cafes
            .into_iter()
            .zip(0..)
            .map(|(cafe, depth): (EnrichedCafe, i32)| Card {
                cafe,
                z_index: TOP_Z_INDEX - depth,
                state: CardState::Visible,
            })
            .collect();
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards in stacking order, top first
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn visible(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(|c| c.state == CardState::Visible)
    }

    /// The highest visible card
    pub fn top(&self) -> Option<&Card> {
        self.visible().max_by_key(|c| c.z_index)
    }

    pub fn get(&self, id: CafeId) -> Option<&Card> {
        self.cards.iter().find(|c| c.cafe.id == id)
    }

    pub fn contains(&self, id: CafeId) -> bool {
        self.get(id).is_some()
    }

    /// Mark a visible card as leaving. Returns the cafe, or `None` if the
    /// card is not visible (already swiped or never dealt).
    pub(crate) fn begin_exit(&mut self, id: CafeId) -> Option<EnrichedCafe> {
        let card = self
            .cards
            .iter_mut()
            .find(|c| c.cafe.id == id && c.state == CardState::Visible)?;
        card.state = CardState::Exiting;
        Some(card.cafe.clone())
    }

    pub(crate) fn remove(&mut self, id: CafeId) {
        self.cards.retain(|c| c.cafe.id != id);
    }
}
