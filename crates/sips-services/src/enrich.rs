//! Turns candidates into display-ready cards.
//!
//! Photos for a page are fetched concurrently and joined before any card is
//! built. Addresses are fetched one card at a time, paced by the throttle
//! policy. Neither lookup can fail the page; both fall back to fixed values.

use std::sync::Arc;

use sips_location::ReverseGeocoder;

use crate::cafe::{CafeCandidate, EnrichedCafe};
use crate::photo::{PhotoClient, PLACEHOLDER_PHOTO};
use crate::rating::Rating;
use crate::throttle::ThrottlePolicy;

#[derive(Debug, Clone)]
pub struct Enricher {
    photos: Arc<PhotoClient>,
    geocoder: Arc<ReverseGeocoder>,
    throttle: ThrottlePolicy,
}

impl Enricher {
    pub fn new(photos: PhotoClient, geocoder: ReverseGeocoder, throttle: ThrottlePolicy) -> Self {
        Self {
            photos: Arc::new(photos),
            geocoder: Arc::new(geocoder),
            throttle,
        }
    }

    pub fn throttle(&self) -> ThrottlePolicy {
        self.throttle
    }

    pub async fn enrich_page(&self, page: &[CafeCandidate]) -> Vec<EnrichedCafe> {
        self.enrich_page_with(page, |_, _| {}).await
    }

    /// Enrich `page` in order, calling `on_card` as each card completes.
    #[tracing::instrument(skip_all, fields(cards = page.len()))]
    pub async fn enrich_page_with<F>(&self, page: &[CafeCandidate], mut on_card: F) -> Vec<EnrichedCafe>
    where
        F: FnMut(usize, &EnrichedCafe),
    {
        let photos = self.photos_for(page).await;
        let mut cards = Vec::with_capacity(page.len());

        for (index, (candidate, photo_url)) in page.iter().zip(photos).enumerate() {
            let address = self.geocoder.address_for(&candidate.coordinates()).await;
            let card = EnrichedCafe::from_candidate(
                candidate.clone(),
                photo_url,
                address,
                Rating::generate(),
            );

            tracing::debug!("Enriched card {} ({})", index, card.name);
            on_card(index, &card);
            cards.push(card);

            if self.throttle.pauses_after(index, page.len()) {
                self.throttle.wait().await;
            }
        }

        cards
    }

    /// One photo per candidate, fetched concurrently, in candidate order.
    async fn photos_for(&self, page: &[CafeCandidate]) -> Vec<String> {
        let handles: Vec<_> = page
            .iter()
            .map(|candidate| {
                let photos = Arc::clone(&self.photos);
                let name = candidate.name.clone();
                tokio::spawn(async move { photos.photo_for(&name).await })
            })
            .collect();

        let mut urls = Vec::with_capacity(handles.len());
        for handle in handles {
            let url = match handle.await {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("Photo lookup task failed: {}", e);
                    PLACEHOLDER_PHOTO.to_string()
                }
            };
            urls.push(url);
        }
        urls
    }
}
