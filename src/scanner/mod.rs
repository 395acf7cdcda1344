//! BLE scanner backends.
//!
//! A backend owns the radio and delivers raw advertisement events over
//! a channel; all byte-level decoding happens in the core. Backends are
//! compiled in behind cargo features and selected at runtime with
//! `--backend`.

#[cfg(feature = "bluer")]
pub mod bluer;

use crate::advertisement::Advertisement;
use thiserror::Error;
use tokio::sync::mpsc;

/// Error type for scanner operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScanError {
    /// Bluetooth/adapter related error
    #[error("Bluetooth error: {0}")]
    Bluetooth(String),
    /// Backend not available (not compiled in)
    #[allow(dead_code)]
    #[error("Backend '{0}' not available (not compiled in)")]
    BackendNotAvailable(String),
}

/// One scanner event: an advertisement, or a backend error worth
/// reporting in verbose mode.
pub type ScanEvent = Result<Advertisement, ScanError>;

/// Channel buffer size for scanner events.
pub const EVENT_CHANNEL_BUFFER_SIZE: usize = 100;

/// The service UUIDs of the supported devices in little-endian byte
/// order, as they appear on air, for advertisement pattern matching.
pub const SERVICE_UUID_PATTERNS: [[u8; 2]; 2] = [
    [0x1A, 0x18], // Environmental Sensing (thermometer)
    [0x1B, 0x18], // Body Composition (scale)
];

/// Available scanner backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Backend {
    /// BlueZ D-Bus backend (requires bluetoothd daemon)
    #[cfg(feature = "bluer")]
    Bluer,
}

impl Default for Backend {
    fn default() -> Self {
        #[cfg(feature = "bluer")]
        return Backend::Bluer;
        #[cfg(not(feature = "bluer"))]
        compile_error!("at least one scanner backend feature must be enabled");
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "bluer")]
            Backend::Bluer => write!(f, "bluer"),
        }
    }
}

/// Start scanning with the selected backend.
///
/// The returned channel yields advertisement events until the scan task
/// stops. Backend errors encountered mid-scan are forwarded as `Err`
/// events when `verbose` is set and dropped otherwise.
pub async fn start_scan(
    backend: Backend,
    verbose: bool,
) -> Result<mpsc::Receiver<ScanEvent>, ScanError> {
    match backend {
        #[cfg(feature = "bluer")]
        Backend::Bluer => bluer::start_scan(verbose).await,
    }
}
