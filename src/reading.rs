//! Decoded reading records handed to output formatters.

use crate::mac_address::MacAddress;
use std::collections::BTreeMap;
use std::fmt;
use std::time::SystemTime;

/// Identifying metadata attached to every reading from one device.
///
/// Always contains `addr` and `device`; user-defined tags from the
/// configuration come on top. Immutable after device construction.
pub type TagSet = BTreeMap<String, String>;

/// Measured values produced by one decoded service data payload.
pub type FieldSet = BTreeMap<String, FieldValue>;

/// A numeric field value.
///
/// Counters and percentages decoded from single bytes stay integers;
/// fixed-point quantities become floats after scaling.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(num) => write!(f, "{num}"),
            FieldValue::Float(num) => write!(f, "{num}"),
        }
    }
}

/// One decoded observation: device tags plus measured fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    /// Address the advertisement came from
    pub mac: MacAddress,
    /// Capture time, stamped when the advertisement is dispatched
    pub timestamp: SystemTime,
    pub tags: TagSet,
    pub fields: FieldSet,
}
