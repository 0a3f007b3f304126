//! Presentation layer for Sips & Spots: browsing state, the card deck,
//! swipe handling, the saved list view, and the pipeline that feeds them.

pub mod confirm;
pub mod deck;
pub mod error_mapping;
pub mod finder;
pub mod session;
pub mod swipe;
pub mod view;

pub use confirm::Confirm;
pub use deck::{Card, CardState, Deck};
pub use finder::{CafeFinder, DeleteOutcome, FinderError};
pub use session::BrowseSession;
pub use swipe::{ExitAnimation, SwipeController, SwipeDirection, SwipeOutcome};
pub use view::{render_deck, render_saved, CardView, ViewMode};
