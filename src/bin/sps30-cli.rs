// src/bin/sps30-cli.rs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};

use sps30::present::format_result;
use sps30::service::wait_for_shutdown;
use sps30::{DeviceAddress, LinuxTransport, Sps30};

#[derive(Parser)]
#[command(name = "sps30-cli")]
#[command(about = "Print SPS30 sensor information and stream measurements until Ctrl+C")]
struct Cli {
    /// Bus number N of /dev/i2c-N
    #[arg(short, long, default_value_t = 1)]
    bus: u32,

    /// 7-bit device address, decimal or 0x-prefixed hex
    #[arg(short, long, default_value_t = DeviceAddress::SPS30)]
    address: DeviceAddress,

    /// Auto cleaning interval to apply, in days
    #[arg(long, default_value_t = 2, allow_negative_numbers = true)]
    interval_days: i64,

    /// Seconds between measurement reads
    #[arg(long, default_value_t = 2)]
    poll_secs: u64,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "sps30=info".to_owned());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || shutdown.store(true, Ordering::SeqCst))?;
    }

    let mut sensor = Sps30::new(LinuxTransport::open(cli.bus, cli.address)?);

    println!("{}", format_result("Firmware version", &sensor.firmware_version(), ""));
    println!("{}", format_result("Product type", &sensor.product_type(), ""));
    println!("{}", format_result("Serial number", &sensor.serial_number(), ""));
    println!("{}", format_result("Status register", &sensor.read_status_register(), ""));
    println!(
        "{}",
        format_result("Auto cleaning interval", &sensor.read_auto_cleaning_interval(), "s")
    );

    match sensor.write_auto_cleaning_interval_days(cli.interval_days) {
        Ok(seconds) => println!("Set auto cleaning interval: {}s", seconds),
        Err(e) => println!("Failed to set auto cleaning interval: {}", e),
    }

    sensor.start_measurement()?;

    let poll = Duration::from_secs(cli.poll_secs);
    while !shutdown.load(Ordering::SeqCst) {
        match sensor.get_measurement() {
            Ok(Some(reading)) => println!("{}", serde_json::to_string_pretty(&reading)?),
            Ok(None) => info!("no new measurement yet"),
            Err(e) => error!(error = %e, "failed to read measurement"),
        }
        wait_for_shutdown(poll, &shutdown);
    }

    println!("Stopping measurement...");
    sensor.shutdown()?;
    Ok(())
}
