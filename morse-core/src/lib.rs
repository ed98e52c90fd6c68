#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! # Morse Core
//!
//! Morse codec and the cooperative event loop of a half-duplex packet
//! radio station: text in, Morse out over the air, Morse in, text back
//! on a 4x20 character display.

#[macro_use]
mod fmt;

pub mod types;
pub mod morse;
pub mod input;
pub mod indicator;
pub mod display;
pub mod stats;
pub mod station;
pub mod hal;

#[cfg(feature = "test-utils")]
pub mod test_utils;


pub use types::*;
pub use morse::*;
pub use input::*;
pub use indicator::*;
pub use display::*;
pub use stats::*;
pub use station::*;
pub use hal::{*, Instant, Duration};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration for a station on a shared channel
pub fn default_config() -> StationConfig {
    StationConfig::default()
}
