//! Browsing state for one search: the full result list and where we are in it.

use sips_services::CafeCandidate;

pub const DEFAULT_PAGE_SIZE: usize = 5;

#[derive(Debug, Clone)]
pub struct BrowseSession {
    cafes: Vec<CafeCandidate>,
    index: usize,
    page_size: usize,
}

impl Default for BrowseSession {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl BrowseSession {
    pub fn new(page_size: usize) -> Self {
        Self {
            cafes: Vec::new(),
            index: 0,
            page_size: page_size.max(1),
        }
    }

    /// Start over with a new result set
    pub fn replace(&mut self, cafes: Vec<CafeCandidate>) {
        self.cafes = cafes;
        self.index = 0;
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn len(&self) -> usize {
        self.cafes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cafes.is_empty()
    }

    pub fn current_page(&self) -> &[CafeCandidate] {
        let start = self.index.min(self.cafes.len());
        let end = (start + self.page_size).min(self.cafes.len());
        self.cafes.get(start..end).unwrap_or_default()
    }

    /// Move to the next page, wrapping to the start after the last one.
    /// Returns the new index.
    pub fn advance(&mut self) -> usize {
        if self.index + self.page_size < self.cafes.len() {
            self.index += self.page_size;
        } else {
            self.index = 0;
        }
        self.index
    }

    /// 1-based page number and page count, for display
    pub fn page_position(&self) -> (usize, usize) {
        let pages = self.cafes.len().div_ceil(self.page_size);
        (self.index / self.page_size + 1, pages.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cafes(n: u64) -> Vec<CafeCandidate> {
        (0..n)
            .map(|i| CafeCandidate {
                id: i,
                name: format!("Cafe {}", i),
                latitude: 0.0,
                longitude: 0.0,
            })
            .collect()
    }

    #[test]
    fn test_refresh_wraps_after_last_page() {
        let mut session = BrowseSession::new(5);
        session.replace(cafes(12));

        let mut indices = vec![session.index()];
        for _ in 0..3 {
            indices.push(session.advance());
        }
        assert_eq!(indices, vec![0, 5, 10, 0]);
    }

    #[test]
    fn test_last_page_is_partial() {
        let mut session = BrowseSession::new(5);
        session.replace(cafes(12));
        session.advance();
        session.advance();

        let ids: Vec<u64> = session.current_page().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![10, 11]);
        assert_eq!(session.page_position(), (3, 3));
    }

    #[test]
    fn test_single_page_stays_put() {
        let mut session = BrowseSession::new(5);
        session.replace(cafes(5));
        assert_eq!(session.advance(), 0);
        assert_eq!(session.current_page().len(), 5);
    }

    #[test]
    fn test_replace_resets_index() {
        let mut session = BrowseSession::new(5);
        session.replace(cafes(12));
        session.advance();
        session.replace(cafes(3));
        assert_eq!(session.index(), 0);
        assert_eq!(session.len(), 3);
    }

    #[test]
    fn test_empty_session() {
        let mut session = BrowseSession::default();
        assert!(session.is_empty());
        assert!(session.current_page().is_empty());
        assert_eq!(session.advance(), 0);
        assert_eq!(session.page_position(), (1, 1));
    }

    #[test]
    fn test_zero_page_size_is_clamped() {
        let session = BrowseSession::new(0);
        assert_eq!(session.page_size(), 1);
    }
}
