//! End-to-end scenarios over a simulated two-station link

use morse_core::hal::mock::MockStationHal;
use morse_core::test_utils::{LinkHarness, VirtualClock};
use morse_core::{Duration, LinkQuality, Station, StationConfig, StationState, INPUT_CAPACITY};

fn link() -> LinkHarness {
    LinkHarness::new(StationConfig::default())
}

#[test]
fn test_conversation_both_ways() {
    println!("📡 Testing two-way exchange...");
    let mut link = link();
    link.bravo_hal.radio.set_quality(LinkQuality::new(-64, 7.8));

    link.alpha_hal.input.type_text("CQ CQ DE AA\n");
    link.step();
    link.step();
    assert_eq!(link.bravo_hal.display.text(1), "RX: CQ CQ DE AA");
    assert_eq!(link.bravo_hal.display.text(3), "RSSI:-64 SNR:7.8");

    link.bravo_hal.input.type_text("aa de bb\r\n");
    link.step();
    link.step();
    assert_eq!(link.alpha_hal.display.text(1), "RX: AA DE BB");

    assert_eq!(link.alpha.statistics().transmitted(), 1);
    assert_eq!(link.alpha.statistics().received(), 1);
    assert_eq!(link.bravo.statistics().transmitted(), 1);
    assert_eq!(link.bravo.statistics().received(), 1);
    println!("  ✅ Both stations decoded each other");
}

#[test]
fn test_punctuation_is_dropped_over_the_air() {
    let mut link = link();
    link.alpha_hal.input.type_text("HELLO, WORLD!\n");
    link.step();
    link.step();
    assert_eq!(link.bravo_hal.display.text(1), "RX: HELLO WORLD");
    assert_eq!(link.bravo.statistics().decode_errors(), 0);
    // The sender shows what was typed, not what was sent
    assert_eq!(link.alpha_hal.display.text(1), "TX: HELLO, WORLD!");
}

#[test]
fn test_long_message_preview_is_cut() {
    let mut link = link();
    link.alpha_hal.input.type_text("THE QUICK BROWN FOX\n");
    link.step();
    link.step();
    assert_eq!(link.bravo_hal.display.line(1), "RX: THE QUICK BROWN ");
    assert_eq!(link.bravo_hal.display.line(2).len(), 20);
}

#[test]
fn test_burst_of_packets_is_served_one_per_tick() {
    let mut link = link();
    link.alpha_hal.input.type_text("A\nB\nC\n");

    let (a, _) = link.step();
    assert_eq!(a.sent, 3);

    let received: Vec<_> = (0..4).map(|_| link.step().1.received).collect();
    assert_eq!(received, [Some(3), Some(5), Some(5), None]);
    assert_eq!(link.bravo_hal.display.text(1), "RX: C");
}

#[test]
fn test_indicators_follow_traffic() {
    let mut link = link();
    let tick = Duration::from_millis(5);

    link.alpha_hal.input.type_text("E\n");
    link.clock.advance(tick);
    link.step();
    assert!(link.alpha_hal.tx_led.is_active());

    link.clock.advance(tick);
    link.step();
    assert!(link.bravo_hal.rx_led.is_active());
    assert!(!link.bravo_hal.tx_led.is_active());

    link.run_for(Duration::from_millis(400), tick);
    assert!(!link.alpha_hal.tx_led.is_active());
    assert!(!link.bravo_hal.rx_led.is_active());
    assert_eq!(link.alpha_hal.tx_led.history(), &[false, true, false]);
}

#[test]
fn test_reports_every_period() {
    let mut link = link();
    link.alpha_hal.input.type_text("TEST\n");

    let ticks = link.run_for(Duration::from_secs(95), Duration::from_millis(100));
    let reports: Vec<_> = ticks.iter().filter_map(|(a, _)| a.report).collect();

    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0].uptime_secs, 30);
    assert_eq!(reports[2].uptime_secs, 90);
    assert!(reports.iter().all(|r| r.transmitted == 1));
    assert_eq!(link.alpha_hal.console.matches("[stats]").count(), 3);
}

#[test]
fn test_overflowing_input_is_sent_in_pieces() {
    let mut link = link();
    let text: String = std::iter::repeat('E').take(INPUT_CAPACITY * 2 + 10).collect();
    link.alpha_hal.input.type_text(&text);
    link.alpha_hal.input.type_text("\n");

    let (a, _) = link.step();
    assert_eq!(a.sent, 3);
    assert_eq!(link.alpha.pending_input(), "");
    assert_eq!(link.bravo_hal.radio.inbox_len(), 3);

    let sizes: Vec<_> = (0..3).filter_map(|_| link.step().1.received).collect();
    assert_eq!(sizes, [200, 200, 20]);
    assert_eq!(link.bravo_hal.display.text(1), "RX: EEEEEEEEEE");
}

#[test]
fn test_halted_station_stays_silent() {
    println!("🔧 Testing failed bring-up...");
    let clock = VirtualClock::new();
    let mut hal = MockStationHal::broken();
    let mut station = Station::new(StationConfig::default(), clock.now());

    assert!(station.bring_up(&mut hal).is_err());
    hal.input.type_text("SOS\n");
    hal.radio.receive(b"... --- ... ");

    for _ in 0..10 {
        clock.advance(Duration::from_secs(10));
        let tick = station.poll(&mut hal, clock.now());
        assert!(tick.halted);
        assert!(tick.report.is_none());
    }
    assert_eq!(station.state(), StationState::Halted);
    assert!(hal.radio.sent().is_empty());
    assert!(hal.console.is_empty());
    assert_eq!(hal.display.text(0), "");
    println!("  ✅ Halted station did nothing");
}

#[test]
fn test_custom_title_and_hold() {
    let config = StationConfig::new("NODE 7", 50, 10, 5).unwrap();
    let mut link = LinkHarness::new(config);
    assert_eq!(link.alpha_hal.display.text(0), "NODE 7");
    assert_eq!(link.alpha_hal.display.text(3), "Ready");

    link.alpha_hal.input.type_text("T\n");
    link.step();
    link.clock.advance(Duration::from_millis(49));
    link.step();
    assert!(link.alpha_hal.tx_led.is_active());
    link.clock.advance(Duration::from_millis(1));
    link.step();
    assert!(!link.alpha_hal.tx_led.is_active());
}
