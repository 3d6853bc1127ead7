//! Single vs double click disambiguation.
//!
//! Every raw click arms a pending entry with its own deadline. When the
//! deadline passes the entry fires, unless a double activation arrived first
//! and suppressed it. Suppressed entries never fire; nothing is fired and
//! then undone.

use std::collections::VecDeque;
use std::time::Duration;

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Quiet period a click must survive before it counts as a single click.
pub const DEFAULT_CLICK_WINDOW: Duration = Duration::from_millis(50);

/// Lifecycle of one pending click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickPhase {
    Armed,
    Fired,
    Suppressed,
}

#[derive(Debug, Clone)]
struct PendingClick<P> {
    payload: P,
    deadline: Instant,
    phase: ClickPhase,
}

impl<P> PendingClick<P> {
    /// Final phase once the deadline has passed.
    fn resolve(&self) -> ClickPhase {
        match self.phase {
            ClickPhase::Armed => ClickPhase::Fired,
            other => other,
        }
    }
}

/// Turns raw clicks into single-click signals after a quiet period.
#[derive(Debug, Clone)]
pub struct ClickDisambiguator<P> {
    window: Duration,
    pending: VecDeque<PendingClick<P>>,
}

impl<P> Default for ClickDisambiguator<P> {
    fn default() -> Self {
        Self::new(DEFAULT_CLICK_WINDOW)
    }
}

impl<P> ClickDisambiguator<P> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: VecDeque::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Arm a single-click candidate carrying `payload`.
    pub fn click(&mut self, payload: P, now: Instant) {
        self.pending.push_back(PendingClick {
            payload,
            deadline: now + self.window,
            phase: ClickPhase::Armed,
        });
    }

    /// Suppress every click whose window is still open at `now`.
    ///
    /// Clicks whose deadline already passed are left armed so the next
    /// [`poll`](Self::poll) fires them in order. Returns how many clicks
    /// were suppressed.
    pub fn double_click(&mut self, now: Instant) -> usize {
        let mut suppressed = 0;
        for click in &mut self.pending {
            if click.phase == ClickPhase::Armed && click.deadline > now {
                click.phase = ClickPhase::Suppressed;
                suppressed += 1;
            }
        }
        suppressed
    }

    /// Resolve every click whose deadline has passed, returning the payloads
    /// that fired, oldest first.
    pub fn poll(&mut self, now: Instant) -> Vec<P> {
        let mut fired = Vec::new();
        while self.pending.front().is_some_and(|c| c.deadline <= now) {
            let Some(click) = self.pending.pop_front() else {
                break;
            };
            if click.resolve() == ClickPhase::Fired {
                fired.push(click.payload);
            }
        }
        fired
    }

    /// Earliest deadline still outstanding, for scheduling a host timer.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.front().map(|c| c.deadline)
    }

    /// Check if any click is still waiting to fire.
    pub fn is_armed(&self) -> bool {
        self.pending.iter().any(|c| c.phase == ClickPhase::Armed)
    }

    /// Drop all pending clicks without firing them.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_single_click_fires_after_window() {
        let t0 = Instant::now();
        let mut clicks = ClickDisambiguator::default();
        clicks.click(1, t0);

        assert!(clicks.poll(t0 + ms(49)).is_empty());
        assert!(clicks.is_armed());
        assert_eq!(clicks.poll(t0 + ms(50)), vec![1]);
        assert!(!clicks.is_armed());
        assert!(clicks.poll(t0 + ms(500)).is_empty());
    }

    #[test]
    fn test_double_click_suppresses() {
        let t0 = Instant::now();
        let mut clicks = ClickDisambiguator::default();
        clicks.click(1, t0);
        clicks.click(2, t0 + ms(20));

        assert_eq!(clicks.double_click(t0 + ms(25)), 2);
        assert!(!clicks.is_armed());
        assert!(clicks.poll(t0 + ms(200)).is_empty());
        assert_eq!(clicks.next_deadline(), None);
    }

    #[test]
    fn test_rapid_singles_fire_independently() {
        let t0 = Instant::now();
        let mut clicks = ClickDisambiguator::default();
        clicks.click("a", t0);
        clicks.click("b", t0 + ms(10));

        assert_eq!(clicks.poll(t0 + ms(55)), vec!["a"]);
        assert_eq!(clicks.poll(t0 + ms(60)), vec!["b"]);
    }

    #[test]
    fn test_expired_click_not_suppressed() {
        let t0 = Instant::now();
        let mut clicks = ClickDisambiguator::default();
        clicks.click(1, t0);
        clicks.click(2, t0 + ms(100));

        // The first window closed before the double arrived.
        assert_eq!(clicks.double_click(t0 + ms(110)), 1);
        assert_eq!(clicks.poll(t0 + ms(200)), vec![1]);
    }

    #[test]
    fn test_next_deadline_and_clear() {
        let t0 = Instant::now();
        let mut clicks = ClickDisambiguator::new(ms(30));
        assert_eq!(clicks.window(), ms(30));
        clicks.click((), t0);
        assert_eq!(clicks.next_deadline(), Some(t0 + ms(30)));

        clicks.clear();
        assert!(clicks.poll(t0 + ms(100)).is_empty());
    }
}
