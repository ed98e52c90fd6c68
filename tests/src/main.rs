// Two simulated stations exchanging a short QSO over a virtual channel

use morse_core::test_utils::LinkHarness;
use morse_core::{Duration, LinkQuality, StationConfig};

fn main() {
    println!("📡 Morse Link Simulation");

    let mut link = LinkHarness::new(StationConfig::default());
    link.alpha_hal.radio.set_quality(LinkQuality::new(-58, 9.3));
    link.bravo_hal.radio.set_quality(LinkQuality::new(-91, 2.8));

    let script = [
        (true, "CQ CQ DE AA1A K"),
        (false, "AA1A DE BB2B K"),
        (true, "BB2B TNX RST 599 K"),
        (false, "73 SK"),
    ];

    for (from_alpha, line) in script {
        let (name, peer) = if from_alpha { ("AA", "BB") } else { ("BB", "AA") };
        println!("  {} > {}", name, line);

        let input = if from_alpha {
            &mut link.alpha_hal.input
        } else {
            &mut link.bravo_hal.input
        };
        input.type_text(line);
        input.type_text("\n");

        link.run_for(Duration::from_millis(20), Duration::from_millis(5));

        let screen = if from_alpha {
            &link.bravo_hal.display
        } else {
            &link.alpha_hal.display
        };
        println!("  {} screen:", peer);
        for row in 0..4 {
            println!("    |{}|", screen.line(row));
        }
    }

    link.run_for(Duration::from_secs(30), Duration::from_millis(5));
    print!("{}", link.alpha_hal.console);

    let stats = link.alpha.statistics();
    println!(
        "✅ AA sent {} received {} with {} decode errors",
        stats.transmitted(),
        stats.received(),
        stats.decode_errors()
    );
}
