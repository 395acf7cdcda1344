//! Per-device throttling of emitted readings.
//!
//! Sensors broadcast far more often than their data changes; the
//! throttle limits output to at most one reading per device per
//! interval.

use crate::mac_address::MacAddress;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Limits the rate of readings per device.
///
/// Each device is tracked independently. The first reading for a device
/// always passes; a blocked reading does not reset the timer.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last_emit: HashMap<MacAddress, Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Throttle {
            interval,
            last_emit: HashMap::new(),
        }
    }

    /// Whether a reading from the given device should be emitted now.
    /// Returns `true` and resets the device's timer if the interval has
    /// passed since the last emitted reading (or none was emitted yet).
    pub fn should_emit(&mut self, mac: MacAddress) -> bool {
        let now = Instant::now();

        match self.last_emit.get(&mac) {
            Some(last) if now.duration_since(*last) < self.interval => false,
            _ => {
                self.last_emit.insert(mac, now);
                true
            }
        }
    }
}

/// Parse a duration from a human-readable string.
///
/// Supports the suffixes `ms`, `s`, `m` and `h`; a bare number is
/// interpreted as seconds.
pub fn parse_duration(src: &str) -> Result<Duration, String> {
    const SUFFIXES: [(&str, u64); 4] = [("ms", 1), ("h", 3_600_000), ("m", 60_000), ("s", 1_000)];

    let src = src.trim();
    if src.is_empty() {
        return Err("empty duration string".to_string());
    }

    for (suffix, millis_per_unit) in SUFFIXES {
        if let Some(num) = src.strip_suffix(suffix) {
            let value: u64 = num
                .trim()
                .parse()
                .map_err(|_| format!("invalid duration: {src}"))?;
            return Ok(Duration::from_millis(value * millis_per_unit));
        }
    }

    let secs: u64 = src
        .parse()
        .map_err(|_| format!("invalid duration: {src}"))?;
    Ok(Duration::from_secs(secs))
}
