//! Advertisement dispatch to registered devices.

use crate::advertisement::Advertisement;
use crate::config::{ConfigError, DeviceConfig};
use crate::device::Device;
use crate::mac_address::MacAddress;
use crate::reading::Reading;
use std::collections::HashMap;
use std::time::SystemTime;

/// Routes advertisements to the device registered for their address.
///
/// The device map is built once from configuration before scanning
/// starts and never changes afterwards. Dispatch itself is stateless;
/// duplicate suppression relies on the novelty flag the backend supplies
/// with each event.
#[derive(Debug)]
pub struct Dispatcher {
    devices: HashMap<MacAddress, Device>,
}

impl Dispatcher {
    /// Build the registered-devices map from configuration records.
    ///
    /// Fails on the first invalid record or duplicated address.
    pub fn from_configs(configs: &[DeviceConfig]) -> Result<Self, ConfigError> {
        let mut devices = HashMap::with_capacity(configs.len());
        for config in configs {
            let device = Device::from_config(config)?;
            let mac = device.mac();
            if devices.insert(mac, device).is_some() {
                return Err(ConfigError::DuplicateAddress(mac));
            }
        }
        Ok(Dispatcher { devices })
    }

    /// Decode one advertisement into readings.
    ///
    /// Advertisements that carry no new data or come from an
    /// unregistered address are dropped with no side effect. Readings
    /// preserve scan-data element order.
    pub fn dispatch(&self, advertisement: &Advertisement) -> Vec<Reading> {
        if !advertisement.is_new_data {
            return Vec::new();
        }
        let Some(device) = self.devices.get(&advertisement.addr) else {
            return Vec::new();
        };

        let timestamp = SystemTime::now();
        device
            .handle_advertisement(advertisement)
            .into_iter()
            .map(|(tags, fields)| Reading {
                mac: advertisement.addr,
                timestamp,
                tags,
                fields,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
