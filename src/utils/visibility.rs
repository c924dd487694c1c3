// src/utils/visibility.rs

//! Loading-indicator visibility controller.
//!
//! Drives a two-state (hidden/visible) indicator from explicit start/finish
//! events. Showing is delayed so fast loads never flash an indicator, and
//! once shown the indicator stays up for a minimum duration so it never
//! flickers. Time is passed in by the caller, which keeps the state machine
//! deterministic under test.

use std::time::{Duration, Instant};

/// Two-state visibility controller with a show delay and a
/// minimum-visible-duration guarantee.
#[derive(Debug)]
pub struct LoadingIndicator {
    show_delay: Duration,
    min_visible: Duration,
    started: Option<Instant>,
    finished: Option<Instant>,
}

impl LoadingIndicator {
    /// Both the show delay and the minimum visible duration of the original
    /// indicator.
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

    pub fn new(show_delay: Duration, min_visible: Duration) -> Self {
        Self {
            show_delay,
            min_visible,
            started: None,
            finished: None,
        }
    }

    /// Loading has started. Restarts the show-delay window.
    pub fn start(&mut self, now: Instant) {
        self.started = Some(now);
        self.finished = None;
    }

    /// Loading has finished. A pending indicator that never became visible
    /// is cancelled outright.
    pub fn finish(&mut self, now: Instant) {
        if self.started.is_some() {
            self.finished = Some(now);
        }
    }

    /// Whether the indicator should be visible at `now`.
    pub fn is_visible(&self, now: Instant) -> bool {
        let Some(started) = self.started else {
            return false;
        };
        let shown_at = started + self.show_delay;
        if now < shown_at {
            return false;
        }
        match self.finished {
            None => true,
            // finished before the delay elapsed: never shown at all
            Some(finished) if finished < shown_at => false,
            Some(finished) => now < finished.max(shown_at + self.min_visible),
        }
    }
}

impl Default for LoadingIndicator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY, Self::DEFAULT_DELAY)
    }
}
