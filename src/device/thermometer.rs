//! Service data decoder for the Mi Thermometer (LYWSD03MMC) running the
//! pvvx custom firmware.
//!
//! The firmware broadcasts its "custom format" advertisement under the
//! Environmental Sensing service: a 15-byte payload carrying the sensor
//! MAC, temperature, humidity and battery state.

use crate::codec::{int16, uint16};
use crate::reading::{FieldSet, FieldValue};

/// Environmental Sensing service UUID used by the pvvx firmware.
pub const UUID: u16 = 0x181A;

/// Custom-format payload length.
const PAYLOAD_LEN: usize = 15;

/// Decode one custom-format service data payload.
///
/// Yields a single field set with temperature (°C), relative humidity
/// (%), battery voltage (V) and battery level (%), or nothing when the
/// UUID or payload length does not match.
pub fn parse_service_data(uuid: u16, payload: &[u8]) -> Vec<FieldSet> {
    if uuid != UUID || payload.len() != PAYLOAD_LEN {
        return Vec::new();
    }

    let mut fields = FieldSet::new();
    fields.insert(
        "temperature".into(),
        FieldValue::Float(f64::from(int16(payload[7], payload[6])) / 100.0),
    );
    fields.insert(
        "humidity".into(),
        FieldValue::Float(f64::from(uint16(payload[9], payload[8])) / 100.0),
    );
    fields.insert(
        "battery_volt".into(),
        FieldValue::Float(f64::from(uint16(payload[11], payload[10])) / 1000.0),
    );
    fields.insert(
        "battery_percent".into(),
        FieldValue::Integer(i64::from(payload[12])),
    );
    vec![fields]
}
