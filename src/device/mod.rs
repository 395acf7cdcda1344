//! Device models for the supported sensors.
//!
//! Each configured physical device becomes one [`Device`]: an immutable
//! tag set plus a decoder variant selected by the declared device type.
//! Adding a device type means one decoder module and one [`DeviceKind`]
//! variant; the dispatcher and the run loop stay untouched.

pub mod scale;
pub mod thermometer;

use crate::advertisement::Advertisement;
use crate::config::{ConfigError, DeviceConfig};
use crate::mac_address::MacAddress;
use crate::reading::{FieldSet, TagSet};
use std::fmt;
use std::str::FromStr;

/// The closed set of supported device types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    /// Mi Thermometer running the pvvx firmware
    Thermometer,
    /// Mi Body Composition Scale 2
    Scale,
}

impl DeviceKind {
    /// Parse service data with this device type's decoder.
    pub fn parse_service_data(self, uuid: u16, payload: &[u8]) -> Vec<FieldSet> {
        match self {
            DeviceKind::Thermometer => thermometer::parse_service_data(uuid, payload),
            DeviceKind::Scale => scale::parse_service_data(uuid, payload),
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::Thermometer => write!(f, "mi_thermometer"),
            DeviceKind::Scale => write!(f, "mi_scale"),
        }
    }
}

impl FromStr for DeviceKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mi_thermometer" => Ok(DeviceKind::Thermometer),
            "mi_scale" => Ok(DeviceKind::Scale),
            _ => Err(ConfigError::UnknownDevice(s.to_string())),
        }
    }
}

/// A configured sensor: its address, identifying tags and decoder.
#[derive(Debug, Clone)]
pub struct Device {
    mac: MacAddress,
    tags: TagSet,
    kind: DeviceKind,
}

impl Device {
    /// Build a device from one configuration record.
    ///
    /// The reserved `addr` and `device` tags are derived from the
    /// mandatory keys; user tags come on top. Unknown device types,
    /// unparseable addresses and user tags that redefine a reserved key
    /// are construction-time errors.
    pub fn from_config(config: &DeviceConfig) -> Result<Self, ConfigError> {
        let kind: DeviceKind = config.device.parse()?;
        let mac: MacAddress =
            config
                .addr
                .parse()
                .map_err(|source| ConfigError::InvalidAddress {
                    addr: config.addr.clone(),
                    source,
                })?;

        let mut tags = TagSet::new();
        tags.insert("addr".into(), mac.to_string());
        tags.insert("device".into(), kind.to_string());
        for (key, value) in &config.tags {
            if tags.contains_key(key) {
                return Err(ConfigError::ReservedTag(key.clone()));
            }
            tags.insert(key.clone(), value.to_string());
        }

        Ok(Device { mac, tags, kind })
    }

    pub fn mac(&self) -> MacAddress {
        self.mac
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    /// Decode every service data element of one advertisement.
    ///
    /// Returns decoded field sets paired with this device's tags, in
    /// element order. Elements of other AD types, malformed elements and
    /// payloads the decoder rejects contribute nothing.
    pub fn handle_advertisement(&self, advertisement: &Advertisement) -> Vec<(TagSet, FieldSet)> {
        advertisement
            .elements
            .iter()
            .filter_map(|element| element.service_data())
            .flat_map(|data| self.kind.parse_service_data(data.uuid, &data.payload))
            .map(|fields| (self.tags.clone(), fields))
            .collect()
    }
}
