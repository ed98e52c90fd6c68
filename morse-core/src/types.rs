//! Core data types and configuration for the station

use crate::hal::Duration;

/// Longest message accepted from the text input before a forced flush
pub const INPUT_CAPACITY: usize = 100;

/// Largest radio payload, in bytes
pub const PAYLOAD_CAPACITY: usize = 256;

/// Display width in characters
pub const DISPLAY_COLS: usize = 20;

/// Display height in lines
pub const DISPLAY_ROWS: usize = 4;

/// Plain-text characters shown after the "TX: "/"RX: " prefix
pub const TEXT_PREVIEW: usize = 16;

/// Title painted on the first display row
pub const DEFAULT_TITLE: &str = "LoRa Morse Link";

/// How long an activity indicator stays lit after an event
pub const DEFAULT_INDICATOR_HOLD_MS: u64 = 300;

/// Period of the diagnostic statistics report
pub const DEFAULT_REPORT_PERIOD_SECS: u64 = 30;

/// Scheduler tick used by the async runner
pub const DEFAULT_TICK_MS: u64 = 5;

/// Received signal quality, valid right after a packet was read
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkQuality {
    /// Received signal strength in dBm
    pub rssi: i16,
    /// Signal-to-noise ratio in dB
    pub snr: f32,
}

impl LinkQuality {
    pub const fn new(rssi: i16, snr: f32) -> Self {
        Self { rssi, snr }
    }
}

impl core::fmt::Display for LinkQuality {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "RSSI:{} SNR:{:.1}", self.rssi, self.snr)
    }
}

/// Lifecycle of a station
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StationState {
    /// Event loop is serving input and radio
    Running,
    /// Hardware bring-up failed; nothing runs until restart
    Halted,
}

impl StationState {
    /// Returns true if the event loop may run
    pub const fn is_running(&self) -> bool {
        matches!(self, StationState::Running)
    }
}

/// Station configuration parameters
#[derive(Copy, Clone, Debug)]
pub struct StationConfig {
    /// Static text for display row 0
    pub title: &'static str,
    /// Activity indicator on-time after a transmit or receive
    pub indicator_hold: Duration,
    /// Interval between statistics reports
    pub report_period: Duration,
    /// Delay between event loop iterations
    pub tick_interval: Duration,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE,
            indicator_hold: Duration::from_millis(DEFAULT_INDICATOR_HOLD_MS),
            report_period: Duration::from_secs(DEFAULT_REPORT_PERIOD_SECS),
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
        }
    }
}

impl StationConfig {
    /// Create a new configuration with validation
    pub fn new(
        title: &'static str,
        indicator_hold_ms: u64,
        report_period_secs: u64,
        tick_ms: u64,
    ) -> Result<Self, &'static str> {
        if title.len() > DISPLAY_COLS {
            return Err("Title must fit on one display row");
        }
        if indicator_hold_ms == 0 || indicator_hold_ms > 10_000 {
            return Err("Indicator hold must be between 1 and 10000 ms");
        }
        if report_period_secs == 0 || report_period_secs > 3600 {
            return Err("Report period must be between 1 and 3600 s");
        }
        if tick_ms == 0 || tick_ms > indicator_hold_ms {
            return Err("Tick must be between 1 ms and the indicator hold time");
        }

        Ok(Self {
            title,
            indicator_hold: Duration::from_millis(indicator_hold_ms),
            report_period: Duration::from_secs(report_period_secs),
            tick_interval: Duration::from_millis(tick_ms),
        })
    }
}
