//! Core application runner (business logic).
//!
//! This module is intentionally decoupled from CLI parsing and process
//! exit codes so it can be tested deterministically with an injected
//! scanner and injected output streams.

use crate::config::{self, ConfigError};
use crate::dispatcher::Dispatcher;
use crate::output::OutputFormatter;
use crate::output::influxdb::InfluxDbFormatter;
use crate::scanner::{Backend, ScanError, ScanEvent};
use crate::throttle::Throttle;
use clap::Parser;
use std::future::Future;
use std::io;
use std::io::Write;
use std::path::PathBuf;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

/// Configuration for the core run loop.
#[derive(Parser, Debug, Clone)]
#[command(author, about, version)]
pub struct Options {
    /// YAML file listing the devices to listen for.
    #[arg(long, value_name = "FILE")]
    pub devices: PathBuf,

    /// The name of the measurement in InfluxDB line protocol.
    #[arg(long, default_value = "bluetooth")]
    pub influxdb_measurement: String,

    /// Verbose output, print scanner errors
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Throttle readings per device to at most one per interval.
    /// Accepts duration with suffix: 3s, 1m, 500ms, 2h.
    /// Without suffix, value is interpreted as seconds.
    #[arg(long, value_parser = crate::throttle::parse_duration)]
    pub throttle: Option<Duration>,

    /// Bluetooth scanner backend to use
    #[arg(long, default_value_t, value_enum)]
    pub backend: Backend,
}

/// Errors returned by the core run loop.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Scanner abstraction to enable deterministic unit tests without
/// Bluetooth hardware.
pub trait Scanner: Send + Sync {
    fn start_scan(
        &self,
        backend: Backend,
        verbose: bool,
    ) -> Pin<Box<dyn Future<Output = Result<mpsc::Receiver<ScanEvent>, ScanError>> + Send + '_>>;
}

/// Real scanner implementation that delegates to the compiled-in
/// backends.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealScanner;

impl Scanner for RealScanner {
    fn start_scan(
        &self,
        backend: Backend,
        verbose: bool,
    ) -> Pin<Box<dyn Future<Output = Result<mpsc::Receiver<ScanEvent>, ScanError>> + Send + '_>>
    {
        Box::pin(async move { crate::scanner::start_scan(backend, verbose).await })
    }
}

/// Run the core processing loop, writing formatted readings to `out`
/// and verbose scanner errors to `err`.
///
/// Loads the device list, builds the dispatcher, then drains scanner
/// events until the channel closes. Each advertisement is dispatched,
/// optionally throttled per device, formatted and written as one line.
pub async fn run_with_io(
    options: Options,
    scanner: &dyn Scanner,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), RunError> {
    let configs = config::load_devices(&options.devices)?;
    let dispatcher = Dispatcher::from_configs(&configs)?;
    let formatter = InfluxDbFormatter::new(options.influxdb_measurement);

    // Create throttle if interval is specified
    let mut throttle = options.throttle.map(Throttle::new);

    let mut events = scanner.start_scan(options.backend, options.verbose).await?;

    while let Some(event) = events.recv().await {
        match event {
            Ok(advertisement) => {
                for reading in dispatcher.dispatch(&advertisement) {
                    let should_emit = throttle
                        .as_mut()
                        .is_none_or(|t: &mut Throttle| t.should_emit(reading.mac));

                    if should_emit {
                        writeln!(out, "{}", formatter.format(&reading))?;
                    }
                }
            }
            Err(scan_err) => {
                if options.verbose {
                    writeln!(err, "{scan_err}")?;
                }
            }
        }
    }

    Ok(())
}
