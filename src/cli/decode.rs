use std::error::Error;

use crate::drivers::rpi_touch::hid_report::{hex_dump, unpack_report};
use crate::input::tracker::{Tracker, TrackerConfig};

/// Parse a hex dump into bytes. Whitespace, ':' and '-' separators and a
/// leading "0x" on each byte are accepted.
pub fn parse_hex(input: &str) -> Result<Vec<u8>, Box<dyn Error + Send + Sync>> {
    let digits: String = input
        .split(|c: char| c.is_whitespace() || c == ':' || c == '-' || c == ',')
        .map(|part| part.strip_prefix("0x").unwrap_or(part))
        .collect();
    if digits.len() % 2 != 0 {
        return Err(format!("odd number of hex digits: {}", digits.len()).into());
    }

    let mut bytes = Vec::with_capacity(digits.len() / 2);
    for i in (0..digits.len()).step_by(2) {
        let pair = digits
            .get(i..i + 2)
            .ok_or_else(|| format!("invalid hex at offset {i}"))?;
        let byte = u8::from_str_radix(pair, 16).map_err(|e| format!("invalid hex '{pair}': {e}"))?;
        bytes.push(byte);
    }

    Ok(bytes)
}

/// Decode one report and print it along with the events it would produce
/// from an all-inactive state
pub fn handle_decode(input: &str, no_legacy: bool) -> Result<(), Box<dyn Error + Send + Sync>> {
    let bytes = parse_hex(input)?;
    let report = unpack_report(bytes.as_slice())?;
    if !report.has_valid_markers() {
        println!("Warning: unexpected marker bytes");
    }
    let sample = report.to_sample();
    println!("{}", hex_dump(&report));
    print!("{sample}");

    let mut tracker = Tracker::new(TrackerConfig {
        legacy_single_touch: !no_legacy,
        ..Default::default()
    });
    let events = tracker.emit(&sample);
    println!("Events ({}):", events.len());
    for event in events {
        println!("  {event}");
    }

    Ok(())
}
