//! Indicator pins driven through embedded-hal, checked with embedded-hal-mock

use embedded_hal_mock::eh1::digital::{Mock as PinMock, State as PinState, Transaction as PinTransaction};
use morse_core::hal::mock::{MockDisplay, MockInput, MockRadio};
use morse_core::{
    EmbeddedHalIndicator, HalError, IndicatorOutput, Instant, Station, StationConfig, StationHal,
};

/// Mock station whose LEDs are real embedded-hal pins
struct PinnedHal {
    input: MockInput,
    radio: MockRadio,
    display: MockDisplay,
    tx_led: EmbeddedHalIndicator<PinMock>,
    rx_led: EmbeddedHalIndicator<PinMock>,
    console: String,
}

impl PinnedHal {
    fn new(tx_pin: PinMock, rx_pin: PinMock, active_low: bool) -> Self {
        Self {
            input: MockInput::new(),
            radio: MockRadio::new(),
            display: MockDisplay::new(),
            tx_led: EmbeddedHalIndicator::new(tx_pin, active_low),
            rx_led: EmbeddedHalIndicator::new(rx_pin, active_low),
            console: String::new(),
        }
    }

    fn finish(self) {
        self.tx_led.release().done();
        self.rx_led.release().done();
    }
}

impl StationHal for PinnedHal {
    type Input = MockInput;
    type Radio = MockRadio;
    type Display = MockDisplay;
    type TxIndicator = EmbeddedHalIndicator<PinMock>;
    type RxIndicator = EmbeddedHalIndicator<PinMock>;
    type Console = String;
    type Error = HalError;

    fn initialize(&mut self) -> Result<(), Self::Error> {
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

fn at(ms: u64) -> Instant {
    Instant::from_millis(ms)
}

#[test]
fn test_indicator_drives_pin() {
    let expectations = [
        PinTransaction::set(PinState::High),
        PinTransaction::set(PinState::Low),
    ];
    let mut led = EmbeddedHalIndicator::new(PinMock::new(&expectations), false);

    led.set_state(true).unwrap();
    led.set_state(false).unwrap();
    led.release().done();
}

#[test]
fn test_active_low_toggle() {
    let expectations = [
        PinTransaction::set(PinState::Low),
        PinTransaction::set(PinState::High),
    ];
    let mut led = EmbeddedHalIndicator::new(PinMock::new(&expectations), true);

    led.toggle().unwrap();
    assert!(led.get_state().unwrap());
    led.toggle().unwrap();
    assert!(!led.get_state().unwrap());
    led.release().done();
}

#[test]
fn test_station_pin_sequence() {
    println!("🔧 Testing LED pins through a transmit and a receive...");
    // Off at bring-up, on for the event, off after the hold time
    let pulse = [
        PinTransaction::set(PinState::Low),
        PinTransaction::set(PinState::High),
        PinTransaction::set(PinState::Low),
    ];
    let mut hal = PinnedHal::new(PinMock::new(&pulse), PinMock::new(&pulse), false);
    let mut station = Station::new(StationConfig::default(), at(0));
    station.bring_up(&mut hal).unwrap();

    hal.input.type_text("K\n");
    station.poll(&mut hal, at(10));
    hal.radio.receive(b"-.- ");
    station.poll(&mut hal, at(20));

    // Retrigger while lit does not toggle the pin off
    hal.radio.receive(b"-.- ");
    station.poll(&mut hal, at(200));

    for ms in (205..=600).step_by(5) {
        station.poll(&mut hal, at(ms));
    }
    assert!(!station.tx_active());
    assert!(!station.rx_active());
    hal.finish();
    println!("  ✅ Pin transactions matched");
}
