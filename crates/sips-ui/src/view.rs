//! Card rendering for the shared container.
//!
//! The container shows either the swipe deck or the saved list, never both.

use sips_services::{EnrichedCafe, Rating, SavedCafe};

use crate::deck::Deck;

pub const LOADING_MESSAGE: &str = "Loading Cafes...";
pub const EMPTY_SAVED_MESSAGE: &str = "No saved cafes yet. Swipe right on a cafe to save it!";
pub const EMPTY_DECK_MESSAGE: &str = "No more cards on this page. Refresh for more.";
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this cafe from your saved list?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Deck,
    Saved,
}

impl ViewMode {
    /// Style flag carried by the container
    pub fn style_class(self) -> Option<&'static str> {
        match self {
            ViewMode::Deck => None,
            ViewMode::Saved => Some("saved-view"),
        }
    }
}

/// Display fields shared by deck cards and saved cards
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub name: String,
    pub photo_url: String,
    pub rating: String,
    pub stars: String,
    pub address: String,
}

impl CardView {
    fn new(name: &str, photo_url: &str, rating: Rating, address: &str) -> Self {
        Self {
            name: name.to_string(),
            photo_url: photo_url.to_string(),
            rating: rating.to_string(),
            stars: rating.stars().to_string(),
            address: address.to_string(),
        }
    }

    /// Multi-line text block for a terminal
    pub fn render(&self) -> String {
        format!(
            "{}\n  {} {}\n  {}\n  {}",
            self.name, self.rating, self.stars, self.address, self.photo_url
        )
    }
}

impl From<&EnrichedCafe> for CardView {
    fn from(cafe: &EnrichedCafe) -> Self {
        Self::new(&cafe.name, &cafe.photo_url, cafe.rating, &cafe.address)
    }
}

impl From<&SavedCafe> for CardView {
    fn from(cafe: &SavedCafe) -> Self {
        Self::new(&cafe.name, &cafe.photo_url, cafe.rating, &cafe.address)
    }
}

/// Visible deck, top card first
pub fn render_deck(deck: &Deck) -> String {
    let mut visible: Vec<_> = deck.visible().collect();
    if visible.is_empty() {
        return EMPTY_DECK_MESSAGE.to_string();
    }
    visible.sort_by_key(|c| std::cmp::Reverse(c.z_index));

    let mut out = String::new();
    for (position, card) in visible.iter().enumerate() {
        let marker = if position == 0 { ">" } else { " " };
        out.push_str(&format!(
            "{} [{}] {}\n",
            marker,
            card.z_index,
            CardView::from(&card.cafe).render()
        ));
    }
    out
}

/// Flat saved list with the ids the user can delete by
pub fn render_saved(saved: &[SavedCafe]) -> String {
    if saved.is_empty() {
        return EMPTY_SAVED_MESSAGE.to_string();
    }

    let mut out = String::new();
    for cafe in saved {
        out.push_str(&format!("#{} {}\n", cafe.id, CardView::from(cafe).render()));
    }
    out
}
