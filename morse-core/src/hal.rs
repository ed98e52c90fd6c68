//! Hardware Abstraction Layer for the station
//!
//! The event loop only talks to hardware through the capability traits in
//! this module. Radio modulation setup, display controller init and pin
//! muxing live behind `StationHal::initialize`.

// Re-export time types based on feature
#[cfg(feature = "embassy-time")]
pub use embassy_time::{Duration, Instant};

#[cfg(not(feature = "embassy-time"))]
pub use self::mock_time::{Duration, Instant};

#[cfg(not(feature = "embassy-time"))]
mod mock_time {
    /// Millisecond instant for builds without embassy-time
    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Instant(u64);

    impl Instant {
        pub const fn from_millis(ms: u64) -> Self {
            Self(ms)
        }

        pub const fn from_secs(secs: u64) -> Self {
            Self(secs * 1000)
        }

        pub const fn as_millis(&self) -> u64 {
            self.0
        }

        pub const fn as_secs(&self) -> u64 {
            self.0 / 1000
        }

        /// Elapsed time since `earlier`, zero if `earlier` is in the future
        pub const fn saturating_duration_since(&self, earlier: Instant) -> Duration {
            Duration(self.0.saturating_sub(earlier.0))
        }

        pub const fn checked_duration_since(&self, earlier: Instant) -> Option<Duration> {
            match self.0.checked_sub(earlier.0) {
                Some(ms) => Some(Duration(ms)),
                None => None,
            }
        }
    }

    /// Millisecond duration for builds without embassy-time
    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    pub struct Duration(u64);

    impl Duration {
        pub const fn from_millis(ms: u64) -> Self {
            Self(ms)
        }

        pub const fn from_secs(secs: u64) -> Self {
            Self(secs * 1000)
        }

        pub const fn as_millis(&self) -> u64 {
            self.0
        }

        pub const fn as_secs(&self) -> u64 {
            self.0 / 1000
        }
    }

    impl core::ops::Add<Duration> for Instant {
        type Output = Instant;

        fn add(self, rhs: Duration) -> Instant {
            Instant(self.0 + rhs.0)
        }
    }

    impl core::ops::AddAssign<Duration> for Instant {
        fn add_assign(&mut self, rhs: Duration) {
            self.0 += rhs.0;
        }
    }

    impl core::ops::Add for Duration {
        type Output = Duration;

        fn add(self, rhs: Duration) -> Duration {
            Duration(self.0 + rhs.0)
        }
    }

    impl core::ops::Div<u32> for Duration {
        type Output = Duration;

        fn div(self, rhs: u32) -> Duration {
            Duration(self.0 / rhs as u64)
        }
    }

    impl core::ops::Mul<u32> for Duration {
        type Output = Duration;

        fn mul(self, rhs: u32) -> Duration {
            Duration(self.0 * rhs as u64)
        }
    }
}

use core::fmt::Debug;
use embedded_hal::digital::OutputPin;
use crate::types::LinkQuality;

/// Error types for HAL operations
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    /// Radio transfer failed
    RadioError,
    /// Display write failed
    DisplayError,
    /// GPIO operation failed
    GpioError,
    /// Hardware not initialized
    NotInitialized,
    /// Invalid configuration
    InvalidConfig,
}

#[cfg(feature = "std")]
impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HalError::RadioError => write!(f, "Radio transfer failed"),
            HalError::DisplayError => write!(f, "Display write failed"),
            HalError::GpioError => write!(f, "GPIO operation failed"),
            HalError::NotInitialized => write!(f, "Hardware not initialized"),
            HalError::InvalidConfig => write!(f, "Invalid configuration"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}

/// Byte-oriented text input (serial console, keyboard bridge)
pub trait TextInput {
    /// Next available byte, or `None` when nothing is buffered.
    /// Never waits for more input.
    fn read_byte(&mut self) -> Option<u8>;
}

/// Half-duplex packet transceiver
pub trait PacketRadio {
    type Error: From<HalError> + Debug;

    /// Non-blocking check for a received packet; returns its advertised length
    fn poll_incoming(&mut self) -> Option<usize>;

    /// Next byte of the packet announced by `poll_incoming`.
    /// `None` once the packet is exhausted.
    fn read_byte(&mut self) -> Option<u8>;

    /// Transmit one packet. May block only for a short, bounded time.
    fn send(&mut self, payload: &[u8]) -> Result<(), Self::Error>;

    /// Signal quality of the last received packet
    fn signal_quality(&self) -> LinkQuality;
}

/// Character display addressed by column and row
pub trait CharDisplay {
    type Error: From<HalError> + Debug;

    /// Move the write cursor
    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Self::Error>;

    /// Write text at the cursor, advancing it
    fn write_str(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Blank the whole screen
    fn clear(&mut self) -> Result<(), Self::Error>;
}

/// Trait for activity indicator output control
pub trait IndicatorOutput {
    type Error: From<HalError> + Debug;

    /// Set indicator state (true = lit)
    fn set_state(&mut self, state: bool) -> Result<(), Self::Error>;

    /// Get current indicator state
    fn get_state(&self) -> Result<bool, Self::Error>;

    /// Toggle indicator state
    fn toggle(&mut self) -> Result<(), Self::Error> {
        let current = self.get_state()?;
        self.set_state(!current)
    }
}

/// Complete station HAL interface
pub trait StationHal {
    type Input: TextInput;
    type Radio: PacketRadio;
    type Display: CharDisplay;
    type TxIndicator: IndicatorOutput;
    type RxIndicator: IndicatorOutput;
    type Console: core::fmt::Write;
    type Error: From<HalError> + Debug;

    /// Bring up radio, display and pins. Failure is fatal for the station.
    fn initialize(&mut self) -> Result<(), Self::Error>;

    /// Access to the text input stream
    fn input(&mut self) -> &mut Self::Input;

    /// Access to the packet radio
    fn radio(&mut self) -> &mut Self::Radio;

    /// Access to the character display
    fn display(&mut self) -> &mut Self::Display;

    /// Access to the transmit activity indicator
    fn tx_indicator(&mut self) -> &mut Self::TxIndicator;

    /// Access to the receive activity indicator
    fn rx_indicator(&mut self) -> &mut Self::RxIndicator;

    /// Diagnostic stream for echo and periodic reports
    fn console(&mut self) -> &mut Self::Console;
}

/// Generic implementation for embedded-hal compatible output pins
pub struct EmbeddedHalIndicator<P> {
    pin: P,
    inverted: bool,
    state: bool,
}

impl<P> EmbeddedHalIndicator<P>
where
    P: OutputPin,
{
    /// Wrap a pin. `inverted` is for active-low LEDs.
    pub fn new(pin: P, inverted: bool) -> Self {
        Self {
            pin,
            inverted,
            state: false,
        }
    }

    /// Release the wrapped pin
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P> IndicatorOutput for EmbeddedHalIndicator<P>
where
    P: OutputPin,
{
    type Error = HalError;

    fn set_state(&mut self, state: bool) -> Result<(), Self::Error> {
        let level = if self.inverted { !state } else { state };
        if level {
            self.pin.set_high().map_err(|_| HalError::GpioError)?;
        } else {
            self.pin.set_low().map_err(|_| HalError::GpioError)?;
        }
        self.state = state;
        Ok(())
    }

    fn get_state(&self) -> Result<bool, Self::Error> {
        // Output pins cannot be read back, report the last commanded state
        Ok(self.state)
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    //! Mock implementations for testing

    use super::*;
    use crate::types::{DISPLAY_COLS, DISPLAY_ROWS};
    use std::collections::VecDeque;
    use std::string::String;
    use std::vec::Vec;

    /// Scripted text input
    #[derive(Default, Debug)]
    pub struct MockInput {
        pending: VecDeque<u8>,
    }

    impl MockInput {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue text as if it had been typed
        pub fn type_text(&mut self, text: &str) {
            self.pending.extend(text.bytes());
        }

        /// Queue raw bytes
        pub fn type_bytes(&mut self, bytes: &[u8]) {
            self.pending.extend(bytes.iter().copied());
        }

        pub fn pending(&self) -> usize {
            self.pending.len()
        }
    }

    impl TextInput for MockInput {
        fn read_byte(&mut self) -> Option<u8> {
            self.pending.pop_front()
        }
    }

    /// In-memory radio with an inbox of packets and a log of sent payloads
    #[derive(Default, Debug)]
    pub struct MockRadio {
        inbox: VecDeque<(Vec<u8>, usize)>,
        current: VecDeque<u8>,
        sent: Vec<Vec<u8>>,
        quality: LinkQuality,
        bytes_read: usize,
        fail_sends: bool,
    }

    impl MockRadio {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a packet whose advertised length matches its content
        pub fn receive(&mut self, payload: &[u8]) {
            self.inbox.push_back((payload.to_vec(), payload.len()));
        }

        /// Queue a packet announcing `advertised` bytes regardless of content
        pub fn receive_with_length(&mut self, payload: &[u8], advertised: usize) {
            self.inbox.push_back((payload.to_vec(), advertised));
        }

        pub fn set_quality(&mut self, quality: LinkQuality) {
            self.quality = quality;
        }

        pub fn set_fail_sends(&mut self, fail: bool) {
            self.fail_sends = fail;
        }

        /// Payloads handed to `send`, oldest first
        pub fn sent(&self) -> &[Vec<u8>] {
            &self.sent
        }

        /// Remove and return all sent payloads
        pub fn take_sent(&mut self) -> Vec<Vec<u8>> {
            core::mem::take(&mut self.sent)
        }

        /// Total bytes consumed through `read_byte`
        pub fn bytes_read(&self) -> usize {
            self.bytes_read
        }

        /// Packets still waiting to be polled
        pub fn inbox_len(&self) -> usize {
            self.inbox.len()
        }
    }

    impl PacketRadio for MockRadio {
        type Error = HalError;

        fn poll_incoming(&mut self) -> Option<usize> {
            let (payload, advertised) = self.inbox.pop_front()?;
            self.current = payload.into();
            Some(advertised)
        }

        fn read_byte(&mut self) -> Option<u8> {
            let byte = self.current.pop_front()?;
            self.bytes_read += 1;
            Some(byte)
        }

        fn send(&mut self, payload: &[u8]) -> Result<(), Self::Error> {
            if self.fail_sends {
                return Err(HalError::RadioError);
            }
            self.sent.push(payload.to_vec());
            Ok(())
        }

        fn signal_quality(&self) -> LinkQuality {
            self.quality
        }
    }

    /// 4x20 character display that rejects writes past the last column
    #[derive(Debug)]
    pub struct MockDisplay {
        cells: [[u8; DISPLAY_COLS]; DISPLAY_ROWS],
        cursor: (usize, usize),
        writes: Vec<(u8, String)>,
        fail_writes: bool,
    }

    impl Default for MockDisplay {
        fn default() -> Self {
            Self {
                cells: [[b' '; DISPLAY_COLS]; DISPLAY_ROWS],
                cursor: (0, 0),
                writes: Vec::new(),
                fail_writes: false,
            }
        }
    }

    impl MockDisplay {
        pub fn new() -> Self {
            Self::default()
        }

        /// Current content of a row, always `DISPLAY_COLS` characters
        pub fn line(&self, row: usize) -> String {
            self.cells[row].iter().map(|&b| b as char).collect()
        }

        /// Current content of a row without trailing blanks
        pub fn text(&self, row: usize) -> String {
            self.line(row).trim_end().into()
        }

        /// Every `write_str` call as (row, text), oldest first
        pub fn writes(&self) -> &[(u8, String)] {
            &self.writes
        }

        pub fn clear_log(&mut self) {
            self.writes.clear();
        }

        pub fn set_fail_writes(&mut self, fail: bool) {
            self.fail_writes = fail;
        }
    }

    impl CharDisplay for MockDisplay {
        type Error = HalError;

        fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Self::Error> {
            if col as usize >= DISPLAY_COLS || row as usize >= DISPLAY_ROWS {
                return Err(HalError::InvalidConfig);
            }
            self.cursor = (col as usize, row as usize);
            Ok(())
        }

        fn write_str(&mut self, text: &str) -> Result<(), Self::Error> {
            if self.fail_writes {
                return Err(HalError::DisplayError);
            }
            let (col, row) = self.cursor;
            if col + text.len() > DISPLAY_COLS {
                return Err(HalError::DisplayError);
            }
            self.cells[row][col..col + text.len()].copy_from_slice(text.as_bytes());
            self.cursor = (col + text.len(), row);
            self.writes.push((row as u8, text.into()));
            Ok(())
        }

        fn clear(&mut self) -> Result<(), Self::Error> {
            self.cells = [[b' '; DISPLAY_COLS]; DISPLAY_ROWS];
            self.cursor = (0, 0);
            Ok(())
        }
    }

    /// Indicator that records every commanded state
    #[derive(Default, Debug)]
    pub struct MockIndicator {
        state: bool,
        history: Vec<bool>,
    }

    impl MockIndicator {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn is_active(&self) -> bool {
            self.state
        }

        /// Commanded states, oldest first
        pub fn history(&self) -> &[bool] {
            &self.history
        }
    }

    impl IndicatorOutput for MockIndicator {
        type Error = HalError;

        fn set_state(&mut self, state: bool) -> Result<(), Self::Error> {
            self.state = state;
            self.history.push(state);
            Ok(())
        }

        fn get_state(&self) -> Result<bool, Self::Error> {
            Ok(self.state)
        }
    }

    /// Mock hardware collection
    #[derive(Default, Debug)]
    pub struct MockStationHal {
        pub input: MockInput,
        pub radio: MockRadio,
        pub display: MockDisplay,
        pub tx_led: MockIndicator,
        pub rx_led: MockIndicator,
        pub console: String,
        pub fail_init: bool,
        pub initialized: bool,
    }

    impl MockStationHal {
        pub fn new() -> Self {
            Self::default()
        }

        /// Hardware whose bring-up always fails
        pub fn broken() -> Self {
            Self {
                fail_init: true,
                ..Self::default()
            }
        }
    }

    impl StationHal for MockStationHal {
        type Input = MockInput;
        type Radio = MockRadio;
        type Display = MockDisplay;
        type TxIndicator = MockIndicator;
        type RxIndicator = MockIndicator;
        type Console = String;
        type Error = HalError;

        fn initialize(&mut self) -> Result<(), Self::Error> {
            if self.fail_init {
                return Err(HalError::NotInitialized);
            }
            self.initialized = true;
            Ok(())
        }

        fn input(&mut self) -> &mut Self::Input {
            &mut self.input
        }

        fn radio(&mut self) -> &mut Self::Radio {
            &mut self.radio
        }

        fn display(&mut self) -> &mut Self::Display {
            &mut self.display
        }

        fn tx_indicator(&mut self) -> &mut Self::TxIndicator {
            &mut self.tx_led
        }

        fn rx_indicator(&mut self) -> &mut Self::RxIndicator {
            &mut self.rx_led
        }

        fn console(&mut self) -> &mut Self::Console {
            &mut self.console
        }
    }
}
