//! Station event loop
//!
//! One `poll` is one scheduler tick, always in the same order:
//! 1. drain the typed input, transmitting every completed message
//! 2. serve at most one received packet
//! 3. expire the activity indicators
//! 4. emit the statistics report when it is due
//!
//! No step waits for data that is not already there.

use core::fmt::Write;
use heapless::{String, Vec};
use crate::display::{Row, StatusPresenter};
use crate::hal::{CharDisplay, IndicatorOutput, Instant, PacketRadio, StationHal, TextInput};
use crate::indicator::ActivityIndicator;
use crate::input::{Feed, InputAccumulator};
use crate::morse::{decode, encode};
use crate::stats::{Statistics, StatsReport};
use crate::types::{StationConfig, StationState, INPUT_CAPACITY, PAYLOAD_CAPACITY};

/// A complete message from the text input
pub type Message = String<INPUT_CAPACITY>;

/// Radio payload buffer
pub type Payload = Vec<u8, PAYLOAD_CAPACITY>;

/// What happened during one tick
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Packets transmitted
    pub sent: usize,
    /// Bytes kept from a received packet
    pub received: Option<usize>,
    /// Statistics report emitted this tick
    pub report: Option<StatsReport>,
    /// Station is halted and did nothing
    pub halted: bool,
}

/// All mutable state of a station, owned by its event loop
pub struct Station {
    config: StationConfig,
    state: StationState,
    input: InputAccumulator<INPUT_CAPACITY>,
    rx_buffer: Payload,
    tx_activity: ActivityIndicator,
    rx_activity: ActivityIndicator,
    stats: Statistics,
}

impl Station {
    /// Create a station whose clock starts at `now`
    pub fn new(config: StationConfig, now: Instant) -> Self {
        Self {
            config,
            state: StationState::Running,
            input: InputAccumulator::new(),
            rx_buffer: Vec::new(),
            tx_activity: ActivityIndicator::new(config.indicator_hold),
            rx_activity: ActivityIndicator::new(config.indicator_hold),
            stats: Statistics::new(now, config.report_period),
        }
    }

    /// Initialize the hardware and paint the idle screen.
    ///
    /// A failure halts the station for good; there is no retry.
    pub fn bring_up<H: StationHal>(&mut self, hal: &mut H) -> Result<(), H::Error> {
        if let Err(err) = hal.initialize() {
            error!("hardware bring-up failed, station halted");
            self.state = StationState::Halted;
            return Err(err);
        }

        let painted = StatusPresenter::render_splash(hal.display(), self.config.title, "Ready");
        check_display(painted);
        check_indicator(hal.tx_indicator().set_state(false));
        check_indicator(hal.rx_indicator().set_state(false));

        info!("station up");
        Ok(())
    }

    /// Run one scheduler tick
    pub fn poll<H: StationHal>(&mut self, hal: &mut H, now: Instant) -> TickReport {
        let mut tick = TickReport::default();
        if !self.state.is_running() {
            tick.halted = true;
            return tick;
        }

        tick.sent = self.service_input(hal, now);
        tick.received = self.service_radio(hal, now);
        self.expire_indicators(hal, now);

        tick.report = self.stats.maybe_report(now);
        if let Some(report) = tick.report {
            info!(
                "uptime {}s tx {} rx {} decode errors {}",
                report.uptime_secs,
                report.transmitted,
                report.received,
                report.decode_errors
            );
            let _ = writeln!(hal.console(), "{}", report);
        }

        tick
    }

    /// Encode, send and show one message. Returns true if a packet went out.
    pub fn transmit<H: StationHal>(&mut self, hal: &mut H, message: &str, now: Instant) -> bool {
        let encoded = encode::<PAYLOAD_CAPACITY>(message);
        if encoded.skipped > 0 {
            warn!("skipped {} characters without a Morse symbol", encoded.skipped);
        }
        if encoded.truncated {
            warn!("message cut to a {} byte payload", encoded.stream.len());
        }
        if encoded.is_empty() {
            warn!("nothing to send");
            check_display(StatusPresenter::render(hal.display(), Row::Link, "Nothing to send"));
            return false;
        }

        if hal.radio().send(encoded.as_bytes()).is_err() {
            warn!("send failed, message dropped");
            check_display(StatusPresenter::render(hal.display(), Row::Link, "TX failed"));
            return false;
        }

        self.stats.record_tx();
        if self.tx_activity.trigger(now) {
            trace!("tx indicator on");
            check_indicator(hal.tx_indicator().set_state(true));
        }
        info!("sent {} bytes", encoded.stream.len());

        check_display(show_transmit(hal.display(), message, encoded.as_bytes()));
        true
    }

    /// Drain all typed characters currently available
    fn service_input<H: StationHal>(&mut self, hal: &mut H, now: Instant) -> usize {
        let mut sent = 0;
        while let Some(byte) = hal.input().read_byte() {
            let message = match self.input.feed(byte) {
                Feed::Echo(ch) => {
                    let _ = hal.console().write_char(ch);
                    continue;
                }
                Feed::Overflow(ch, message) => {
                    let _ = hal.console().write_char(ch);
                    let _ = hal.console().write_str("\r\n");
                    warn!("input buffer full, flushing {} characters", message.len());
                    message
                }
                Feed::Line(message) => {
                    let _ = hal.console().write_str("\r\n");
                    message
                }
                Feed::Nothing => continue,
            };

            if self.transmit(hal, &message, now) {
                sent += 1;
            }
        }
        sent
    }

    /// Receive and show at most one packet
    fn service_radio<H: StationHal>(&mut self, hal: &mut H, now: Instant) -> Option<usize> {
        let advertised = hal.radio().poll_incoming()?;

        // Drain the whole advertised packet, keeping what fits
        self.rx_buffer.clear();
        let mut dropped = 0usize;
        for _ in 0..advertised {
            let Some(byte) = hal.radio().read_byte() else {
                break;
            };
            if self.rx_buffer.push(byte).is_err() {
                dropped += 1;
            }
        }
        if dropped > 0 {
            warn!("packet of {} bytes cut to {}", advertised, PAYLOAD_CAPACITY);
        }

        if self.rx_activity.trigger(now) {
            trace!("rx indicator on");
            check_indicator(hal.rx_indicator().set_state(true));
        }

        let decoded = decode::<PAYLOAD_CAPACITY>(&self.rx_buffer);
        for _ in 0..decoded.errors {
            self.stats.record_decode_error();
        }
        if decoded.errors > 0 {
            warn!("{} unknown symbols in packet", decoded.errors);
        }

        let quality = hal.radio().signal_quality();
        info!("received {} bytes, rssi {} snr {}", self.rx_buffer.len(), quality.rssi, quality.snr);

        let shown = show_receive(hal.display(), decoded.as_str(), &self.rx_buffer)
            .and_then(|()| StatusPresenter::render_quality(hal.display(), quality));
        check_display(shown);

        self.stats.record_rx();
        Some(self.rx_buffer.len())
    }

    fn expire_indicators<H: StationHal>(&mut self, hal: &mut H, now: Instant) {
        if self.tx_activity.tick(now) {
            trace!("tx indicator off");
            check_indicator(hal.tx_indicator().set_state(false));
        }
        if self.rx_activity.tick(now) {
            trace!("rx indicator off");
            check_indicator(hal.rx_indicator().set_state(false));
        }
    }

    pub fn state(&self) -> StationState {
        self.state
    }

    pub fn config(&self) -> &StationConfig {
        &self.config
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    /// Characters typed since the last completed message
    pub fn pending_input(&self) -> &str {
        self.input.pending()
    }

    /// Bytes kept from the last received packet
    pub fn last_packet(&self) -> &[u8] {
        &self.rx_buffer
    }

    pub fn tx_active(&self) -> bool {
        self.tx_activity.is_active()
    }

    pub fn rx_active(&self) -> bool {
        self.rx_activity.is_active()
    }
}

fn show_transmit<D: CharDisplay>(display: &mut D, message: &str, stream: &[u8]) -> Result<(), D::Error> {
    let mut status: String<20> = String::new();
    let _ = write!(status, "Sent {} bytes", stream.len());

    StatusPresenter::render_text(display, "TX", message)?;
    StatusPresenter::render_bytes(display, Row::Stream, stream)?;
    StatusPresenter::render(display, Row::Link, &status)
}

fn show_receive<D: CharDisplay>(display: &mut D, text: &str, stream: &[u8]) -> Result<(), D::Error> {
    StatusPresenter::render_text(display, "RX", text)?;
    StatusPresenter::render_bytes(display, Row::Stream, stream)
}

// Display and indicator faults are logged and otherwise ignored
fn check_display<E>(result: Result<(), E>) {
    if result.is_err() {
        warn!("display write failed");
    }
}

fn check_indicator<E>(result: Result<(), E>) {
    if result.is_err() {
        warn!("indicator write failed");
    }
}

/// Run a station forever at its configured tick rate.
///
/// Only returns if hardware bring-up fails.
#[cfg(feature = "embassy-time")]
pub async fn run_station<H: StationHal>(hal: &mut H, config: StationConfig) -> H::Error {
    use embassy_time::Timer;

    let mut station = Station::new(config, Instant::now());
    if let Err(err) = station.bring_up(hal) {
        return err;
    }

    loop {
        let _tick = station.poll(hal, Instant::now());

        #[cfg(feature = "defmt")]
        defmt::trace!("tick sent {} received {}", _tick.sent, _tick.received.unwrap_or(0));

        Timer::after(config.tick_interval).await;
    }
}
