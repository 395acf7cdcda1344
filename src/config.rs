//! Device list configuration.
//!
//! The device list is a YAML sequence of mappings, one per physical
//! sensor:
//!
//! ```yaml
//! - addr: a4:c1:38:aa:bb:cc
//!   device: mi_thermometer
//!   tags:
//!     room: sauna
//! - addr: 5c:ca:d3:11:22:33
//!   device: mi_scale
//! ```
//!
//! `addr` and `device` are mandatory; missing keys, unknown device
//! types, unparseable addresses and tag keys that collide with the
//! reserved `addr`/`device` tags all fail before scanning starts.

use crate::mac_address::{MacAddress, ParseMacError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// One device record from the configuration file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeviceConfig {
    /// BLE MAC address in `xx:xx:xx:xx:xx:xx` form
    pub addr: String,
    /// Registered device type name
    pub device: String,
    /// Extra tags attached verbatim to every reading from this device
    #[serde(default)]
    pub tags: BTreeMap<String, TagValue>,
}

/// A user-defined tag value; scalars are rendered into tag strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::String(s) => write!(f, "{s}"),
            TagValue::Integer(num) => write!(f, "{num}"),
            TagValue::Float(num) => write!(f, "{num}"),
            TagValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Errors raised while loading or validating the device list.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read device list: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse device list: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unknown device type '{0}'")]
    UnknownDevice(String),
    #[error("invalid device address '{addr}': {source}")]
    InvalidAddress {
        addr: String,
        source: ParseMacError,
    },
    #[error("tag key '{0}' is reserved")]
    ReservedTag(String),
    #[error("device address {0} configured more than once")]
    DuplicateAddress(MacAddress),
}

/// Load the device list from a YAML file.
pub fn load_devices(path: impl AsRef<Path>) -> Result<Vec<DeviceConfig>, ConfigError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&raw)?)
}
