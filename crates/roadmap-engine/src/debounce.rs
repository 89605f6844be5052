//! Search input debouncing
//!
//! Keystrokes replace the pending term and push its deadline out; the term is
//! applied once input has been quiet for the whole delay.

use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// Default quiet period before a search term is applied
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Holds the latest unapplied search term and when it becomes due
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DEBOUNCE)
    }
}

impl SearchDebouncer {
    /// Debouncer with the given quiet period
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    /// Quiet period
    #[inline]
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a keystroke; any earlier pending term is superseded
    pub fn push(&mut self, term: impl Into<String>, now: Instant) {
        self.pending = Some((term.into(), now + self.delay));
    }

    /// When the pending term becomes due
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at)
    }

    /// Take the pending term if its deadline has passed
    pub fn take_due(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, at)) if *at <= now => self.pending.take().map(|(term, _)| term),
            _ => None,
        }
    }

    /// Take the pending term regardless of its deadline
    pub fn take(&mut self) -> Option<String> {
        self.pending.take().map(|(term, _)| term)
    }

    /// Drop the pending term
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// True while a term is waiting
    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Wait for the pending deadline and take the term
    ///
    /// Returns `None` immediately when nothing is pending.
    pub async fn settled(&mut self) -> Option<String> {
        let deadline = self.deadline()?;
        sleep_until(deadline).await;
        self.take_due(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn term_is_due_only_after_quiet_period() {
        let mut debouncer = SearchDebouncer::default();
        let start = Instant::now();
        debouncer.push("ryz", start);

        assert_eq!(debouncer.take_due(start + Duration::from_millis(299)), None);
        assert_eq!(
            debouncer.take_due(start + Duration::from_millis(300)).as_deref(),
            Some("ryz")
        );
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn later_keystroke_supersedes_and_extends() {
        let mut debouncer = SearchDebouncer::new(Duration::from_millis(100));
        let start = Instant::now();
        debouncer.push("r", start);
        debouncer.push("ry", start + Duration::from_millis(80));

        assert_eq!(debouncer.take_due(start + Duration::from_millis(120)), None);
        assert_eq!(debouncer.deadline(), Some(start + Duration::from_millis(180)));

        let settled = debouncer.settled().await;
        assert_eq!(settled.as_deref(), Some("ry"));
        assert!(Instant::now() >= start + Duration::from_millis(180));
    }

    #[tokio::test]
    async fn settled_without_pending_returns_none() {
        let mut debouncer = SearchDebouncer::default();
        assert_eq!(debouncer.settled().await, None);

        debouncer.push("x", Instant::now());
        debouncer.cancel();
        assert_eq!(debouncer.settled().await, None);
    }
}
