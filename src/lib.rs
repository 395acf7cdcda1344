//! `mi-sensor-listener` library.
//!
//! The binary (`src/main.rs`) is responsible for CLI parsing and process
//! exit codes. The core “business logic” lives in [`crate::app`] where it
//! can be tested deterministically with injected scanner + injected
//! output streams.

pub mod advertisement;
pub mod app;
pub mod codec;
pub mod config;
pub mod device;
pub mod dispatcher;
pub mod mac_address;
pub mod output;
pub mod reading;
pub mod scanner;
pub mod throttle;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types at the crate root
pub use advertisement::{AD_TYPE_SERVICE_DATA, AdElement, Advertisement, ServiceData};
pub use config::{ConfigError, DeviceConfig, TagValue, load_devices};
pub use device::{Device, DeviceKind};
pub use dispatcher::Dispatcher;
pub use mac_address::MacAddress;
pub use output::OutputFormatter;
pub use output::influxdb::InfluxDbFormatter;
pub use reading::{FieldSet, FieldValue, Reading, TagSet};
pub use scanner::{Backend, ScanError, ScanEvent};
pub use throttle::{Throttle, parse_duration};
