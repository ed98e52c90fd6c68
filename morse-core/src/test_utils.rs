//! Test utilities: a shared virtual clock and a two-station link

use std::sync::{Arc, Mutex};
use std::vec::Vec;

use crate::hal::mock::{MockRadio, MockStationHal};
use crate::hal::{Duration, Instant};
use crate::station::{Station, TickReport};
use crate::types::StationConfig;

/// Millisecond clock shared between simulated stations
#[derive(Clone, Debug, Default)]
pub struct VirtualClock {
    now_ms: Arc<Mutex<u64>>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now(&self) -> Instant {
        Instant::from_millis(*self.now_ms.lock().unwrap())
    }

    /// Advance virtual time by duration
    pub fn advance(&self, duration: Duration) {
        *self.now_ms.lock().unwrap() += duration.as_millis() as u64;
    }

    /// Jump to an absolute time
    pub fn set(&self, ms: u64) {
        *self.now_ms.lock().unwrap() = ms;
    }
}

/// Move every payload sent by `from` into the inbox of `to`.
/// Returns the number of packets moved.
pub fn relay(from: &mut MockRadio, to: &mut MockRadio) -> usize {
    let packets = from.take_sent();
    for packet in &packets {
        to.receive(packet);
    }
    packets.len()
}

/// Two stations on one virtual channel
pub struct LinkHarness {
    pub clock: VirtualClock,
    pub alpha: Station,
    pub alpha_hal: MockStationHal,
    pub bravo: Station,
    pub bravo_hal: MockStationHal,
}

impl LinkHarness {
    /// Both stations brought up with the same configuration
    pub fn new(config: StationConfig) -> Self {
        let clock = VirtualClock::new();
        let mut alpha = Station::new(config, clock.now());
        let mut bravo = Station::new(config, clock.now());
        let mut alpha_hal = MockStationHal::new();
        let mut bravo_hal = MockStationHal::new();
        alpha.bring_up(&mut alpha_hal).unwrap();
        bravo.bring_up(&mut bravo_hal).unwrap();

        Self {
            clock,
            alpha,
            alpha_hal,
            bravo,
            bravo_hal,
        }
    }

    /// One tick on both stations, then deliver whatever went over the air
    pub fn step(&mut self) -> (TickReport, TickReport) {
        let now = self.clock.now();
        let a = self.alpha.poll(&mut self.alpha_hal, now);
        let b = self.bravo.poll(&mut self.bravo_hal, now);
        relay(&mut self.alpha_hal.radio, &mut self.bravo_hal.radio);
        relay(&mut self.bravo_hal.radio, &mut self.alpha_hal.radio);
        (a, b)
    }

    /// Step repeatedly, advancing the clock by `tick` before each step
    pub fn run_for(&mut self, total: Duration, tick: Duration) -> Vec<(TickReport, TickReport)> {
        let end = self.clock.now() + total;
        let mut ticks = Vec::new();
        while self.clock.now() < end {
            self.clock.advance(tick);
            ticks.push(self.step());
        }
        ticks
    }
}
