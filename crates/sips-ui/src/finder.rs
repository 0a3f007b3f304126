//! The discovery pipeline: locate, search, enrich, deal cards, handle swipes.
//!
//! `CafeFinder` owns all browsing state. Every stage returns a structured
//! error; the front end decides how to tell the user.

use std::time::Duration;

use anyhow::Context;
use sips_core::{Config, JsonStore, StorageError};
use sips_location::{
    LocationCache, LocationError, LocationProvider, LocationResolver, ReverseGeocoder,
    SystemLocationProvider,
};
use sips_services::{
    CafeFetcher, CafeId, EnrichedCafe, Enricher, PhotoClient, SavedCafe, SavedList, SearchError,
    ThrottlePolicy,
};

use crate::confirm::Confirm;
use crate::deck::Deck;
use crate::session::BrowseSession;
use crate::swipe::{SwipeController, SwipeDirection, SwipeOutcome};
use crate::view::{ViewMode, DELETE_PROMPT};

const APP_ID: &str = "sips-and-spots";

#[derive(Debug, thiserror::Error)]
pub enum FinderError {
    #[error("Location error: {0}")]
    Location(#[from] LocationError),
    #[error("Search error: {0}")]
    Search(#[from] SearchError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl FinderError {
    /// Whether the discovery pipeline stopped at this error
    pub fn halts_pipeline(&self) -> bool {
        matches!(self, FinderError::Location(_) | FinderError::Search(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    Declined,
}

pub struct CafeFinder<P> {
    resolver: LocationResolver<P>,
    fetcher: CafeFetcher,
    enricher: Enricher,
    saved: SavedList,
    swipes: SwipeController,
    session: BrowseSession,
    deck: Deck,
    mode: ViewMode,
}

impl CafeFinder<SystemLocationProvider> {
    /// Build the pipeline from config using the system location provider.
    ///
    /// # Errors
    /// Fails if storage cannot be opened or an HTTP client cannot be built.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.services.request_timeout_secs);
        let provider = SystemLocationProvider::detect(
            config.location.fixed_coordinates(),
            APP_ID,
            timeout,
        );
        Self::with_provider(config, provider)
    }
}

impl<P: LocationProvider> CafeFinder<P> {
    /// Build the pipeline from config with an explicit location provider.
    ///
    /// # Errors
    /// Fails if storage cannot be opened or an HTTP client cannot be built.
    pub fn with_provider(config: &Config, provider: P) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.services.request_timeout_secs);
        let store = JsonStore::open(&config.data_dir).context("Failed to open data directory")?;

        let cache = LocationCache::with_freshness(
            store.clone(),
            chrono::Duration::minutes(i64::from(config.location.cache_minutes)),
        );
        let fetcher = CafeFetcher::new(
            &config.services.overpass_url,
            config.search.radius_meters,
            timeout,
        )
        .context("Failed to create cafe search client")?;
        let photos = PhotoClient::new(
            &config.services.unsplash_url,
            config.services.unsplash_key(),
            timeout,
        )
        .context("Failed to create photo client")?;
        let geocoder = ReverseGeocoder::with_timeout(
            &config.services.nominatim_url,
            &config.services.user_agent,
            timeout,
        )
        .context("Failed to create geocoding client")?;

        Ok(Self {
            resolver: LocationResolver::new(provider, cache),
            fetcher,
            enricher: Enricher::new(
                photos,
                geocoder,
                ThrottlePolicy::from_millis(config.throttle.address_delay_ms),
            ),
            saved: SavedList::new(store),
            swipes: SwipeController::default(),
            session: BrowseSession::new(config.search.page_size),
            deck: Deck::default(),
            mode: ViewMode::Deck,
        })
    }

    /// Replace the swipe controller (e.g. a shorter exit animation)
    pub fn with_swipe_controller(mut self, swipes: SwipeController) -> Self {
        self.swipes = swipes;
        self
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn session(&self) -> &BrowseSession {
        &self.session
    }

    pub fn saved_list(&self) -> &SavedList {
        &self.saved
    }

    /// Locate the user, search nearby, and deal the first page.
    ///
    /// # Errors
    /// Stops at the first failing stage: location, then search. Nothing
    /// after a failing stage runs.
    pub async fn discover(&mut self) -> Result<&Deck, FinderError> {
        self.discover_with(|_, _| {}).await
    }

    /// [`CafeFinder::discover`], reporting each card as it is enriched.
    ///
    /// # Errors
    /// See [`CafeFinder::discover`].
    pub async fn discover_with<F>(&mut self, on_card: F) -> Result<&Deck, FinderError>
    where
        F: FnMut(usize, &EnrichedCafe),
    {
        let coords = self.resolver.resolve().await?;
        let cafes = self.fetcher.nearby(&coords).await?;
        self.session.replace(cafes);
        Ok(self.load_page_with(on_card).await)
    }

    /// Advance to the next page (wrapping) and deal it.
    pub async fn refresh(&mut self) -> &Deck {
        self.refresh_with(|_, _| {}).await
    }

    pub async fn refresh_with<F>(&mut self, on_card: F) -> &Deck
    where
        F: FnMut(usize, &EnrichedCafe),
    {
        self.session.advance();
        self.load_page_with(on_card).await
    }

    async fn load_page_with<F>(&mut self, on_card: F) -> &Deck
    where
        F: FnMut(usize, &EnrichedCafe),
    {
        self.mode = ViewMode::Deck;
        let (page, pages) = self.session.page_position();
        tracing::info!("Loading page {} of {}", page, pages);

        let cards = self
            .enricher
            .enrich_page_with(self.session.current_page(), on_card)
            .await;
        self.deck = Deck::from_page(cards);
        &self.deck
    }

    /// Go back to the cards left on the current page
    pub fn show_deck(&mut self) -> &Deck {
        self.mode = ViewMode::Deck;
        &self.deck
    }

    /// Swipe the top card.
    ///
    /// # Errors
    /// See [`CafeFinder::swipe_card`].
    pub async fn swipe(&mut self, direction: SwipeDirection) -> Result<Option<SwipeOutcome>, FinderError> {
        let Some(id) = self.deck.top().map(|c| c.cafe.id) else {
            return Ok(None);
        };
        self.swipe_card(id, direction).await
    }

    /// Swipe card `id`. Saving switches the container to the saved list.
    ///
    /// # Errors
    /// Returns a storage error if a right swipe could not be persisted.
    pub async fn swipe_card(
        &mut self,
        id: CafeId,
        direction: SwipeDirection,
    ) -> Result<Option<SwipeOutcome>, FinderError> {
        if self.mode != ViewMode::Deck {
            tracing::debug!("Ignoring swipe outside the deck view");
            return Ok(None);
        }

        let outcome = self
            .swipes
            .swipe(&mut self.deck, id, direction, &self.saved)
            .await?;

        if matches!(&outcome, Some(o) if o.direction == SwipeDirection::Right) {
            self.mode = ViewMode::Saved;
        }
        Ok(outcome)
    }

    /// Switch to the saved list and return it.
    ///
    /// # Errors
    /// Returns a storage error if the saved list cannot be read.
    pub fn show_saved(&mut self) -> Result<Vec<SavedCafe>, FinderError> {
        self.mode = ViewMode::Saved;
        Ok(self.saved.list()?)
    }

    /// Delete a saved cafe after asking the user.
    ///
    /// # Errors
    /// Returns a storage error if the saved list cannot be updated.
    pub fn delete_saved<C: Confirm + ?Sized>(
        &mut self,
        id: CafeId,
        confirm: &mut C,
    ) -> Result<DeleteOutcome, FinderError> {
        if !confirm.confirm(DELETE_PROMPT) {
            return Ok(DeleteOutcome::Declined);
        }

        let outcome = if self.saved.delete(id)? {
            DeleteOutcome::Deleted
        } else {
            DeleteOutcome::NotFound
        };
        self.mode = ViewMode::Saved;
        Ok(outcome)
    }
}
