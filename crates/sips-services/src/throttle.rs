//! Pacing for providers that reject bursts.

use std::time::Duration;

/// Fixed pause between successive requests to one provider.
///
/// Requests run one at a time; the pause sits *between* them, never
/// before the first or after the last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottlePolicy {
    delay: Duration,
}

impl ThrottlePolicy {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    /// No pause at all
    pub fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_enabled(&self) -> bool {
        !self.delay.is_zero()
    }

    /// Whether a pause follows request `index` of `total`
    pub fn pauses_after(&self, index: usize, total: usize) -> bool {
        self.is_enabled() && index + 1 < total
    }

    /// Total pause for a run of `total` requests
    pub fn total_delay(&self, total: usize) -> Duration {
        let gaps = u32::try_from(total.saturating_sub(1)).unwrap_or(u32::MAX);
        self.delay.saturating_mul(gaps)
    }

    pub async fn wait(&self) {
        if self.is_enabled() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

impl Default for ThrottlePolicy {
    /// One second, which keeps Nominatim's usage policy happy
    fn default() -> Self {
        Self::from_millis(1000)
    }
}
