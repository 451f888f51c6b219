// src/bin/sps30-service.rs

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use sps30::service::{self, HttpUploader, ServiceConfig, ServiceOverrides};
use sps30::{LinuxTransport, Sps30};

#[derive(Parser)]
#[command(name = "sps30-service")]
#[command(about = "SPS30 measurement tool: uploads readings to an API backend")]
struct Cli {
    /// The host of the API backend, like: 192.168.0.104:4001
    #[arg(long)]
    host: Option<String>,

    /// Delay between measurements in seconds [default: 10]
    #[arg(long)]
    delay: Option<u64>,

    /// Bus number N of /dev/i2c-N [default: 1]
    #[arg(long)]
    bus: Option<u32>,

    /// 7-bit device address [default: 0x69]
    #[arg(long, value_parser = parse_address)]
    address: Option<u16>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn parse_address(s: &str) -> Result<u16, String> {
    s.parse::<sps30::DeviceAddress>()
        .map(|address| u16::from(u8::from(address)))
        .map_err(|e| e.to_string())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "sps30=info,sps30_service=info".to_owned());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            info!(path = ?path, "loading configuration");
            ServiceConfig::load(path)?
        }
        None => ServiceConfig::default(),
    };
    config.apply(ServiceOverrides {
        host: cli.host,
        delay_secs: cli.delay,
        bus: cli.bus,
        address: cli.address,
    });

    let uploader = HttpUploader::new(config.host()?, config.upload_timeout())?;
    info!(url = uploader.url(), delay_secs = config.delay_secs, "starting measurement service");

    // SIGINT, and SIGTERM from systemd via the `termination` feature.
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            info!("received stop signal");
            shutdown.store(true, Ordering::SeqCst);
        })?;
    }

    let mut sensor = Sps30::new(LinuxTransport::open(config.bus, config.device_address()?)?);
    service::run(&mut sensor, &uploader, &config.poll_settings(), &shutdown)?;
    sensor.shutdown()?;

    info!("sensor stopped");
    Ok(())
}
