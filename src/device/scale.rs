//! Service data decoder for the Mi Body Composition Scale 2.
//!
//! The scale broadcasts under the Body Composition service: a 13-byte
//! payload whose leading control word gates which measurements are
//! stable and which weight unit the scale is set to.

use crate::codec::uint16;
use crate::reading::{FieldSet, FieldValue};

/// Body Composition service UUID used by the scale.
pub const UUID: u16 = 0x181B;

/// Advertisement payload length.
const PAYLOAD_LEN: usize = 13;

// Control word bits (payload bytes 0-1, low byte first).
const UNIT_POUND: u16 = 1 << 0;
const IMPEDANCE_READY: u16 = 1 << 9;
const WEIGHT_READY: u16 = 1 << 13;
const UNIT_CATTY: u16 = 1 << 14;

/// Decode one body composition service data payload.
///
/// Emits `weight` (kg) when the weight measurement is stable and the
/// scale is set to kilograms; pound and catty readings are dropped
/// rather than converted so downstream consumers see a single unit.
/// Emits `impedance` (Ω) when the impedance measurement is stable.
/// A payload with neither yields nothing.
pub fn parse_service_data(uuid: u16, payload: &[u8]) -> Vec<FieldSet> {
    if uuid != UUID || payload.len() != PAYLOAD_LEN {
        return Vec::new();
    }

    let control = uint16(payload[1], payload[0]);
    let unit_kilogram = control & (UNIT_POUND | UNIT_CATTY) == 0;

    let mut fields = FieldSet::new();
    if control & WEIGHT_READY != 0 && unit_kilogram {
        // Raw unit is 5 g
        fields.insert(
            "weight".into(),
            FieldValue::Float(f64::from(uint16(payload[12], payload[11])) / 200.0),
        );
    }
    if control & IMPEDANCE_READY != 0 {
        fields.insert(
            "impedance".into(),
            FieldValue::Integer(i64::from(uint16(payload[10], payload[9]))),
        );
    }

    if fields.is_empty() {
        return Vec::new();
    }
    vec![fields]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode_hex;

    fn parse(hex: &str) -> Vec<FieldSet> {
        parse_service_data(UUID, &decode_hex(hex).unwrap())
    }

    #[test]
    fn test_weight_and_impedance_stable() {
        let result = parse("0226b207010100362bba01ec31");

        assert_eq!(result.len(), 1);
        let fields = &result[0];
        assert_eq!(fields["weight"], FieldValue::Float(63.9));
        assert_eq!(fields["impedance"], FieldValue::Integer(442));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_weight_stable_impedance_not() {
        let result = parse("0224b207010100362bfeffec31");

        assert_eq!(result.len(), 1);
        let fields = &result[0];
        assert_eq!(fields["weight"], FieldValue::Float(63.9));
        assert!(!fields.contains_key("impedance"));
    }

    #[test]
    fn test_nothing_stable_yields_nothing() {
        assert!(parse("0284b207010100363900001400").is_empty());
    }

    #[test]
    fn test_pound_reading_is_dropped() {
        // Same stable reading with the pound bit set: weight must not be
        // emitted, impedance still is.
        let result = parse("0326b207010100362bba01ec31");

        assert_eq!(result.len(), 1);
        let fields = &result[0];
        assert!(!fields.contains_key("weight"));
        assert_eq!(fields["impedance"], FieldValue::Integer(442));
    }

    #[test]
    fn test_catty_reading_is_dropped() {
        // Catty bit (control word 0x6602, stored low byte first)
        let result = parse("0266b207010100362bba01ec31");

        let fields = &result[0];
        assert!(!fields.contains_key("weight"));
        assert_eq!(fields["impedance"], FieldValue::Integer(442));
    }

    #[test]
    fn test_wrong_uuid_yields_nothing() {
        let payload = decode_hex("0226b207010100362bba01ec31").unwrap();
        assert!(parse_service_data(0x181A, &payload).is_empty());
    }

    #[test]
    fn test_wrong_length_yields_nothing() {
        let payload = decode_hex("0226b207010100362bba01ec31").unwrap();
        assert!(parse_service_data(UUID, &payload[..12]).is_empty());
        assert!(parse_service_data(UUID, &[]).is_empty());
    }

    #[test]
    fn test_decoding_is_idempotent() {
        let payload = decode_hex("0226b207010100362bba01ec31").unwrap();
        assert_eq!(
            parse_service_data(UUID, &payload),
            parse_service_data(UUID, &payload)
        );
    }
}
