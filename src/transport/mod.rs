// src/transport/mod.rs

//! Raw byte transfers to one device address, with bounded retry.

use core::time::Duration;

use tracing::{debug, warn};

use crate::common::{
    address::DeviceAddress,
    error::Sps30Error,
    hal_traits::{BusFault, DelayNs, I2c},
    timing,
};

#[cfg(feature = "linux")]
pub mod linux;

/// Owns the bus handle for one device and performs plain reads and writes.
///
/// Transient faults (see [`BusFault::is_transient`]) are retried up to
/// [`timing::MAX_TRANSFER_ATTEMPTS`] times with linear backoff. Callers only
/// ever see the final outcome.
#[derive(Debug)]
pub struct BusTransport<I, D> {
    bus: Option<I>,
    delay: D,
    address: DeviceAddress,
}

impl<I, D> BusTransport<I, D>
where
    I: I2c,
    D: DelayNs,
{
    pub fn new(bus: I, delay: D, address: DeviceAddress) -> Self {
        BusTransport { bus: Some(bus), delay, address }
    }

    pub fn address(&self) -> DeviceAddress {
        self.address
    }

    pub fn is_open(&self) -> bool {
        self.bus.is_some()
    }

    /// Writes `bytes` as one transfer.
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), Sps30Error<I::Error>> {
        self.execute_with_retry("write", |bus, address| bus.write(address, bytes))
    }

    /// Fills `buffer` completely from one read transfer.
    pub fn read(&mut self, buffer: &mut [u8]) -> Result<(), Sps30Error<I::Error>> {
        self.execute_with_retry("read", |bus, address| bus.read(address, buffer))
    }

    /// Blocks for `duration` using the transport's delay source.
    pub fn pause(&mut self, duration: Duration) {
        pause(&mut self.delay, duration);
    }

    /// Releases the bus handle. Safe to call more than once.
    ///
    /// Returns the handle if this call closed it.
    pub fn close(&mut self) -> Option<I> {
        let bus = self.bus.take();
        if bus.is_some() {
            debug!(address = %self.address, "bus handle released");
        }
        bus
    }

    // --- Retry Helper ---
    fn execute_with_retry<FN, T>(&mut self, op: &'static str, mut f: FN) -> Result<T, Sps30Error<I::Error>>
    where
        FN: FnMut(&mut I, u8) -> Result<T, I::Error>,
    {
        let address = self.address.as_u8();
        let bus = self.bus.as_mut().ok_or(Sps30Error::BusClosed)?;

        let mut attempt = 1;
        loop {
            match f(&mut *bus, address) {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < timing::MAX_TRANSFER_ATTEMPTS => {
                    let backoff = timing::RETRY_BASE_DELAY * attempt;
                    warn!(op, attempt, error = ?e, backoff_ms = backoff.as_millis() as u64, "transient bus fault, retrying");
                    pause(&mut self.delay, backoff);
                    attempt += 1;
                }
                Err(e) => {
                    debug!(op, attempt, error = ?e, "bus transfer failed");
                    return Err(Sps30Error::Io(e));
                }
            }
        }
    }
}

fn pause<D: DelayNs>(delay: &mut D, duration: Duration) {
    if !duration.is_zero() {
        delay.delay_us(duration.as_micros().min(u32::MAX as u128) as u32);
    }
}
