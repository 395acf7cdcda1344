//! BlueZ D-Bus backend.
//!
//! Uses the `bluer` crate to communicate with the BlueZ daemon via
//! D-Bus. Requires `bluetoothd` to be running. Advertisement monitor
//! patterns restrict delivery to broadcasts carrying service data for
//! one of the supported service UUIDs.

use super::{EVENT_CHANNEL_BUFFER_SIZE, SERVICE_UUID_PATTERNS, ScanError, ScanEvent};
use crate::advertisement::{AD_TYPE_SERVICE_DATA, AdElement, Advertisement};
use bluer::monitor::{Monitor, MonitorEvent, Pattern};
use bluer::{Adapter, Address, Session};
use futures::StreamExt;
use std::fmt::Write;
use tokio::sync::mpsc;

impl From<bluer::Error> for ScanError {
    fn from(err: bluer::Error) -> Self {
        ScanError::Bluetooth(err.to_string())
    }
}

/// Start scanning with the BlueZ D-Bus backend.
///
/// Initializes the adapter and registers a passive advertisement
/// monitor. Matched advertisements are sent through the returned
/// channel; runs until interrupted.
pub async fn start_scan(verbose: bool) -> Result<mpsc::Receiver<ScanEvent>, ScanError> {
    let session = Session::new().await?;
    let adapter = session.default_adapter().await?;
    adapter.set_powered(true).await?;

    let (tx, rx) = mpsc::channel(EVENT_CHANNEL_BUFFER_SIZE);

    // Match advertisements carrying service data for a supported UUID
    let patterns = SERVICE_UUID_PATTERNS
        .iter()
        .map(|uuid| Pattern {
            data_type: AD_TYPE_SERVICE_DATA,
            start_position: 0,
            content: uuid.to_vec(),
        })
        .collect();

    let monitor_manager = adapter.monitor().await?;
    let mut monitor_handle = monitor_manager
        .register(Monitor {
            patterns: Some(patterns),
            ..Default::default()
        })
        .await?;

    // Spawn a task that owns all Bluetooth state and runs the event loop
    tokio::spawn(async move {
        // Keep all Bluetooth state alive by moving it into this task
        let _session = session;
        let _monitor_manager = monitor_manager;

        while let Some(event) = monitor_handle.next().await {
            if let MonitorEvent::DeviceFound(device_id) = event
                && let Err(e) = process_device(&adapter, device_id.device, &tx).await
                && verbose
            {
                let _ = tx.send(Err(e)).await;
            }
        }
    });

    Ok(rx)
}

/// Read a matched device's service data and re-encode it as scan-data
/// elements for the core.
async fn process_device(
    adapter: &Adapter,
    address: Address,
    tx: &mpsc::Sender<ScanEvent>,
) -> Result<(), ScanError> {
    let device = adapter.device(address)?;

    let service_data = match device.service_data().await? {
        Some(data) => data,
        None => return Ok(()),
    };

    let elements: Vec<AdElement> = service_data
        .iter()
        .filter_map(|(uuid, data)| {
            // Only 16-bit service UUIDs are of interest here
            let short = uuid16(uuid)?;
            Some(AdElement {
                ad_type: AD_TYPE_SERVICE_DATA,
                value: hex_element_value(short, data),
            })
        })
        .collect();

    if elements.is_empty() {
        return Ok(());
    }

    let advertisement = Advertisement {
        addr: address.into(),
        // Monitor events fire when a matched device's data changes;
        // BlueZ suppresses repeats of an identical payload.
        is_new_data: true,
        elements,
    };
    let _ = tx.send(Ok(advertisement)).await;

    Ok(())
}

/// Render a service data block as an on-air hex element value: the
/// 16-bit UUID low byte first, then the payload bytes.
fn hex_element_value(uuid: u16, payload: &[u8]) -> String {
    let mut value = String::with_capacity(4 + payload.len() * 2);
    let _ = write!(value, "{:02x}{:02x}", uuid & 0xFF, uuid >> 8);
    for byte in payload {
        let _ = write!(value, "{byte:02x}");
    }
    value
}

/// Extract the 16-bit short form of a service UUID, if it uses the
/// Bluetooth base UUID.
fn uuid16(uuid: &bluer::Uuid) -> Option<u16> {
    const BASE_SUFFIX: [u8; 12] = [
        0x00, 0x00, 0x10, 0x00, 0x80, 0x00, 0x00, 0x80, 0x5F, 0x9B, 0x34, 0xFB,
    ];
    let bytes = uuid.as_bytes();
    if bytes[0] == 0 && bytes[1] == 0 && bytes[4..] == BASE_SUFFIX {
        Some((u16::from(bytes[2]) << 8) | u16::from(bytes[3]))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mac_address::MacAddress;

    #[test]
    fn test_address_to_mac_address() {
        let addr = Address([0xA4, 0xC1, 0x38, 0xAA, 0xBB, 0xCC]);
        let mac: MacAddress = addr.into();
        assert_eq!(mac, MacAddress([0xA4, 0xC1, 0x38, 0xAA, 0xBB, 0xCC]));
    }

    #[test]
    fn test_uuid16_base_uuid() {
        let uuid = bluer::Uuid::from_u128(0x0000181A_0000_1000_8000_00805F9B34FB);
        assert_eq!(uuid16(&uuid), Some(0x181A));
    }

    #[test]
    fn test_uuid16_custom_uuid() {
        let uuid = bluer::Uuid::from_u128(0xEBE0CCB0_7A0A_4B0C_8A1A_6FF2997DA3A6);
        assert_eq!(uuid16(&uuid), None);
    }

    #[test]
    fn test_hex_element_value_is_little_endian() {
        assert_eq!(
            hex_element_value(0x181A, &[0x57, 0xED, 0x0F]),
            "1a1857ed0f"
        );
    }
}
