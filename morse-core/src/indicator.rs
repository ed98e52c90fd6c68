//! Timed activity indicator

use crate::hal::{Duration, Instant};

/// Indicator states
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum IndicatorState {
    /// Output off
    Idle,
    /// Output on since the contained instant
    Active(Instant),
}

/// Boolean that stays on for a fixed duration after each trigger
#[derive(Copy, Clone, Debug)]
pub struct ActivityIndicator {
    state: IndicatorState,
    hold: Duration,
}

impl ActivityIndicator {
    /// Create an idle indicator with the given on-time
    pub const fn new(hold: Duration) -> Self {
        Self {
            state: IndicatorState::Idle,
            hold,
        }
    }

    /// Switch on, or restart the on-time if already on.
    /// Returns true if the indicator was idle.
    pub fn trigger(&mut self, now: Instant) -> bool {
        let was_idle = self.state == IndicatorState::Idle;
        self.state = IndicatorState::Active(now);
        was_idle
    }

    /// Expire the on-time. Returns true on the active -> idle transition.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.state {
            IndicatorState::Active(start) if now.saturating_duration_since(start) >= self.hold => {
                self.state = IndicatorState::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, IndicatorState::Active(_))
    }

    pub fn state(&self) -> IndicatorState {
        self.state
    }

    pub fn hold(&self) -> Duration {
        self.hold
    }
}
