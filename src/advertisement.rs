//! Raw advertisement events delivered by a scanner backend.
//!
//! A backend reports each received broadcast as an [`Advertisement`]:
//! the sender address, the backend's duplicate-detection verdict, and
//! the scan-data elements with their values as hex digit strings. All
//! byte-level interpretation happens in the core.

use crate::codec::{decode_hex, uint16};
use crate::mac_address::MacAddress;

/// Service Data AD type (16-bit UUID form), per the Bluetooth Assigned
/// Numbers specification.
pub const AD_TYPE_SERVICE_DATA: u8 = 0x16;

/// One scan-data element of an advertisement.
#[derive(Debug, Clone, PartialEq)]
pub struct AdElement {
    /// AD type octet identifying the element's meaning
    pub ad_type: u8,
    /// Element value as a hex digit string, two digits per byte
    pub value: String,
}

impl AdElement {
    /// Split a service data element into its UUID and payload.
    ///
    /// The 16-bit service UUID occupies the first two bytes in
    /// little-endian order. Returns `None` for other AD types, malformed
    /// hex, or a value too short to hold the UUID.
    pub fn service_data(&self) -> Option<ServiceData> {
        if self.ad_type != AD_TYPE_SERVICE_DATA {
            return None;
        }
        let bytes = decode_hex(&self.value)?;
        if bytes.len() < 2 {
            return None;
        }
        Some(ServiceData {
            uuid: uint16(bytes[1], bytes[0]),
            payload: bytes[2..].to_vec(),
        })
    }
}

/// A decoded service data block.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceData {
    /// 16-bit service UUID
    pub uuid: u16,
    /// Payload bytes following the UUID header
    pub payload: Vec<u8>,
}

/// An advertisement event from the BLE stack.
#[derive(Debug, Clone, PartialEq)]
pub struct Advertisement {
    /// Address of the broadcasting device
    pub addr: MacAddress,
    /// Whether the payload differs from the last one seen for this
    /// address; repeats of identical broadcasts carry `false`
    pub is_new_data: bool,
    /// Scan-data elements in over-the-air order
    pub elements: Vec<AdElement>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_data_split() {
        let element = AdElement {
            ad_type: AD_TYPE_SERVICE_DATA,
            value: "1a18ff0102".to_string(),
        };
        let data = element.service_data().unwrap();
        assert_eq!(data.uuid, 0x181A);
        assert_eq!(data.payload, vec![0xFF, 0x01, 0x02]);
    }

    #[test]
    fn test_service_data_uuid_only() {
        let element = AdElement {
            ad_type: AD_TYPE_SERVICE_DATA,
            value: "1b18".to_string(),
        };
        let data = element.service_data().unwrap();
        assert_eq!(data.uuid, 0x181B);
        assert!(data.payload.is_empty());
    }

    #[test]
    fn test_other_ad_types_are_skipped() {
        let element = AdElement {
            ad_type: 0xFF,
            value: "1a18ff0102".to_string(),
        };
        assert_eq!(element.service_data(), None);
    }

    #[test]
    fn test_malformed_values_are_skipped() {
        for value in ["1a", "", "1a1", "zz18ff"] {
            let element = AdElement {
                ad_type: AD_TYPE_SERVICE_DATA,
                value: value.to_string(),
            };
            assert_eq!(element.service_data(), None, "value {value:?}");
        }
    }
}
