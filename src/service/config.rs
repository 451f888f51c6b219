// src/service/config.rs

use std::path::Path;
use std::time::Duration;

use color_eyre::eyre::{eyre, WrapErr};
use serde::Deserialize;

use crate::common::address::DeviceAddress;

use super::PollSettings;

/// Settings of the measurement upload service.
///
/// Loaded from an optional TOML file; every key may be omitted. Command line
/// flags are layered on top with [`ServiceConfig::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// API backend as `host[:port]`, e.g. `192.168.0.104:4001`.
    pub host: Option<String>,
    /// Seconds between measurement polls.
    pub delay_secs: u64,
    /// Bus number N of `/dev/i2c-N`.
    pub bus: u32,
    pub address: u16,
    /// Auto cleaning interval applied at startup, in days.
    pub cleaning_interval_days: i64,
    pub upload_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: None,
            delay_secs: 10,
            bus: 1,
            address: DeviceAddress::SPS30.as_u8() as u16,
            cleaning_interval_days: 2,
            upload_timeout_secs: 5,
        }
    }
}

/// Values given on the command line. `None` keeps the configured value.
#[derive(Debug, Clone, Default)]
pub struct ServiceOverrides {
    pub host: Option<String>,
    pub delay_secs: Option<u64>,
    pub bus: Option<u32>,
    pub address: Option<u16>,
}

impl ServiceConfig {
    pub fn load(path: &Path) -> color_eyre::Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("reading config file {}", path.display()))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> color_eyre::Result<Self> {
        let config: ServiceConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Layers command line values over the loaded ones.
    pub fn apply(&mut self, overrides: ServiceOverrides) {
        if let Some(host) = overrides.host {
            self.host = Some(host);
        }
        if let Some(delay) = overrides.delay_secs {
            self.delay_secs = delay;
        }
        if let Some(bus) = overrides.bus {
            self.bus = bus;
        }
        if let Some(address) = overrides.address {
            self.address = address;
        }
    }

    /// Backend host. Required from either the file or the command line.
    pub fn host(&self) -> color_eyre::Result<&str> {
        match self.host.as_deref() {
            Some(host) if !host.trim().is_empty() => Ok(host),
            _ => Err(eyre!("no API host configured; pass --host or set `host` in the config file")),
        }
    }

    pub fn device_address(&self) -> color_eyre::Result<DeviceAddress> {
        Ok(DeviceAddress::new(self.address)?)
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: Duration::from_secs(self.delay_secs),
            cleaning_interval_days: self.cleaning_interval_days,
        }
    }
}
