use crate::advertisement::{AdElement, Advertisement};
use crate::config::DeviceConfig;
use crate::mac_address::MacAddress;

/// A stable MAC address for unit tests.
pub const TEST_MAC: MacAddress = MacAddress([0xA4, 0xC1, 0x38, 0xAA, 0xBB, 0xCC]);

/// Thermometer service data element value (UUID header included):
/// 25.4 °C, 43.55 %, 3.115 V, 100 %.
pub const THERMOMETER_ELEMENT: &str = "1a1857ed8f38c1a4ec0903112b0c640a04";

/// Scale service data element value with weight and impedance stable:
/// 63.9 kg, 442 Ω.
pub const SCALE_ELEMENT: &str = "1b180226b207010100362bba01ec31";

/// Build an advertisement from `(ad_type, hex value)` pairs.
pub fn advertisement(
    addr: MacAddress,
    is_new_data: bool,
    elements: &[(u8, &str)],
) -> Advertisement {
    Advertisement {
        addr,
        is_new_data,
        elements: elements
            .iter()
            .map(|(ad_type, value)| AdElement {
                ad_type: *ad_type,
                value: (*value).to_string(),
            })
            .collect(),
    }
}

/// Configuration record registering [`TEST_MAC`] as a thermometer.
pub fn thermometer_config() -> DeviceConfig {
    DeviceConfig {
        addr: "a4:c1:38:aa:bb:cc".to_string(),
        device: "mi_thermometer".to_string(),
        tags: Default::default(),
    }
}

/// Configuration record registering [`TEST_MAC`] as a scale.
pub fn scale_config() -> DeviceConfig {
    DeviceConfig {
        addr: "a4:c1:38:aa:bb:cc".to_string(),
        device: "mi_scale".to_string(),
        tags: Default::default(),
    }
}
