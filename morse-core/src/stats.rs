//! Link statistics and the periodic diagnostic report

use crate::hal::{Duration, Instant};

/// Snapshot emitted on each report period
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatsReport {
    /// Seconds since the counters started
    pub uptime_secs: u64,
    pub transmitted: u32,
    pub received: u32,
    pub decode_errors: u32,
}

impl core::fmt::Display for StatsReport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "[stats] uptime {}s | tx {} | rx {} | decode errors {}",
            self.uptime_secs, self.transmitted, self.received, self.decode_errors
        )
    }
}

/// Monotonic counters owned by the event loop
#[derive(Copy, Clone, Debug)]
pub struct Statistics {
    transmitted: u32,
    received: u32,
    decode_errors: u32,
    started: Instant,
    last_report: Instant,
    period: Duration,
}

impl Statistics {
    pub const fn new(now: Instant, period: Duration) -> Self {
        Self {
            transmitted: 0,
            received: 0,
            decode_errors: 0,
            started: now,
            last_report: now,
            period,
        }
    }

    pub fn record_tx(&mut self) {
        self.transmitted = self.transmitted.saturating_add(1);
    }

    pub fn record_rx(&mut self) {
        self.received = self.received.saturating_add(1);
    }

    pub fn record_decode_error(&mut self) {
        self.decode_errors = self.decode_errors.saturating_add(1);
    }

    /// Report once per period. Counters keep running.
    pub fn maybe_report(&mut self, now: Instant) -> Option<StatsReport> {
        if now.saturating_duration_since(self.last_report) < self.period {
            return None;
        }
        self.last_report = now;
        Some(self.snapshot(now))
    }

    pub fn snapshot(&self, now: Instant) -> StatsReport {
        StatsReport {
            uptime_secs: now.saturating_duration_since(self.started).as_secs(),
            transmitted: self.transmitted,
            received: self.received,
            decode_errors: self.decode_errors,
        }
    }

    pub fn transmitted(&self) -> u32 {
        self.transmitted
    }

    pub fn received(&self) -> u32 {
        self.received
    }

    pub fn decode_errors(&self) -> u32 {
        self.decode_errors
    }
}
