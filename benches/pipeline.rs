//! Integration benchmark for the advertisement processing pipeline.
//!
//! Benchmarks the full application loop using the same patterns as the
//! integration tests in app.rs - with a FakeScanner feeding raw
//! advertisements through run_with_io.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mi_sensor_listener::app::{Options, Scanner, run_with_io};
use mi_sensor_listener::{AdElement, Advertisement, Backend, MacAddress, ScanError, ScanEvent};
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

const TEST_MAC: MacAddress = MacAddress([0xA4, 0xC1, 0x38, 0xAA, 0xBB, 0xCC]);

fn thermometer_advertisement() -> Advertisement {
    Advertisement {
        addr: TEST_MAC,
        is_new_data: true,
        elements: vec![AdElement {
            ad_type: 0x16,
            value: "1a1857ed8f38c1a4ec0903112b0c640a04".to_string(),
        }],
    }
}

/// A fake scanner that yields prepared advertisements, similar to the
/// one in app.rs tests.
struct FakeScanner {
    events: Vec<ScanEvent>,
}

impl FakeScanner {
    fn new(events: Vec<ScanEvent>) -> Self {
        Self { events }
    }
}

impl Scanner for FakeScanner {
    fn start_scan(
        &self,
        _backend: Backend,
        _verbose: bool,
    ) -> Pin<Box<dyn Future<Output = Result<mpsc::Receiver<ScanEvent>, ScanError>> + Send + '_>>
    {
        let events = self.events.clone();
        Box::pin(async move {
            let (tx, rx) = mpsc::channel::<ScanEvent>(events.len().max(1));
            tokio::spawn(async move {
                for event in events {
                    let _ = tx.send(event).await;
                }
            });
            Ok(rx)
        })
    }
}

fn device_list() -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "mi-sensor-listener-bench-{}.yaml",
        std::process::id()
    ));
    std::fs::write(
        &path,
        "- addr: a4:c1:38:aa:bb:cc\n  device: mi_thermometer\n",
    )
    .unwrap();
    path
}

fn options(devices: PathBuf) -> Options {
    Options {
        devices,
        influxdb_measurement: "bluetooth".to_string(),
        verbose: false,
        throttle: None,
        backend: Backend::default(),
    }
}

fn bench_pipeline(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let devices = device_list();

    let mut group = c.benchmark_group("pipeline");
    for count in [1usize, 100, 1000] {
        let events: Vec<ScanEvent> = (0..count)
            .map(|_| Ok(thermometer_advertisement()))
            .collect();

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &events, |b, events| {
            b.iter(|| {
                let scanner = FakeScanner::new(events.clone());
                let mut out = Vec::<u8>::new();
                let mut err = Vec::<u8>::new();
                rt.block_on(run_with_io(
                    options(devices.clone()),
                    &scanner,
                    &mut out,
                    &mut err,
                ))
                .unwrap();
                black_box(out)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
