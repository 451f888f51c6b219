// src/driver/mod.rs

//! The SPS30 command surface and measurement session state machine.

mod transaction;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::common::{
    command::Command,
    error::{SequenceViolation, Sps30Error},
    hal_traits::{DelayNs, I2c},
    response::{
        decode_data_ready, decode_firmware_version, decode_identity, decode_interval,
        decode_measurement, decode_status, MeasurementReading,
    },
    types::{FirmwareVersion, StatusBits},
};
use crate::transport::BusTransport;

const SECONDS_PER_DAY: u32 = 86_400;

/// Operating mode of the sensor as tracked by the driver.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DriverState {
    /// Powered, fan off. Initial and terminal state.
    Idle,
    /// Measurement session running.
    Measuring,
    /// Low-power mode with the I2C interface switched off.
    Sleeping,
}

/// Driver for one SPS30 sensor.
///
/// Owns its [`BusTransport`] exclusively. Dropping the driver stops an active
/// measurement session and releases the bus; [`Sps30::shutdown`] does the
/// same but reports failures. Not meant for concurrent use: wrap it in a
/// mutex if more than one thread must issue commands.
#[derive(Debug)]
pub struct Sps30<I, D>
where
    I: I2c,
    D: DelayNs,
{
    transport: BusTransport<I, D>,
    state: DriverState,
}

impl<I, D> Sps30<I, D>
where
    I: I2c,
    D: DelayNs,
{
    /// Wraps an open transport. The sensor is assumed idle, which it is after
    /// power-up and after [`Sps30::reset`].
    pub fn new(transport: BusTransport<I, D>) -> Self {
        Sps30 { transport, state: DriverState::Idle }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    // --- Identity ---

    /// Firmware major/minor version.
    pub fn firmware_version(&mut self) -> Result<FirmwareVersion, Sps30Error<I::Error>> {
        self.ensure_awake()?;
        self.query(Command::ReadFirmwareVersion, decode_firmware_version)
    }

    /// Product type, `"00080000"` for the SPS30.
    pub fn product_type(&mut self) -> Result<String, Sps30Error<I::Error>> {
        self.ensure_awake()?;
        self.query(Command::ReadProductType, decode_identity)
    }

    pub fn serial_number(&mut self) -> Result<String, Sps30Error<I::Error>> {
        self.ensure_awake()?;
        self.query(Command::ReadSerialNumber, decode_identity)
    }

    // --- Status Register ---

    pub fn read_status_register(&mut self) -> Result<StatusBits, Sps30Error<I::Error>> {
        self.ensure_awake()?;
        self.query(Command::ReadStatusRegister, decode_status)
    }

    pub fn clear_status_register(&mut self) -> Result<(), Sps30Error<I::Error>> {
        self.ensure_awake()?;
        self.send_command(Command::ClearStatusRegister)
    }

    // --- Auto Cleaning ---

    /// Auto cleaning interval in seconds. 0 means auto cleaning is disabled.
    pub fn read_auto_cleaning_interval(&mut self) -> Result<u32, Sps30Error<I::Error>> {
        self.ensure_awake()?;
        self.query(Command::ReadAutoCleaningInterval, decode_interval)
    }

    /// Sets the auto cleaning interval to `days` whole days.
    ///
    /// Returns the interval in seconds as read back from the sensor after the
    /// write. Parameters are validated before any bus traffic.
    pub fn write_auto_cleaning_interval_days(&mut self, days: i64) -> Result<u32, Sps30Error<I::Error>> {
        if days < 0 {
            return Err(Sps30Error::Validation("days must not be negative"));
        }
        let seconds = u32::try_from(days)
            .ok()
            .and_then(|d| d.checked_mul(SECONDS_PER_DAY))
            .ok_or(Sps30Error::Validation("interval in seconds does not fit 32 bits"))?;
        self.ensure_awake()?;

        self.send_command(Command::WriteAutoCleaningInterval { seconds })?;
        let applied = self.read_auto_cleaning_interval()?;
        if applied != seconds {
            // Older firmware only reports a new interval after a reset.
            warn!(requested = seconds, applied, "auto cleaning interval read back differs");
        }
        info!(seconds = applied, "auto cleaning interval set");
        Ok(applied)
    }

    /// Runs the fan at full speed for 10 s. Measurement mode only.
    pub fn start_fan_cleaning(&mut self) -> Result<(), Sps30Error<I::Error>> {
        self.require(DriverState::Measuring)?;
        self.send_command(Command::StartFanCleaning)
    }

    // --- Measurement Session ---

    /// Starts a measurement session (float output format).
    pub fn start_measurement(&mut self) -> Result<(), Sps30Error<I::Error>> {
        self.require(DriverState::Idle)?;
        self.send_command(Command::StartMeasurement)?;
        self.state = DriverState::Measuring;
        info!("measurement started");
        Ok(())
    }

    /// Whether a new measurement can be read.
    pub fn read_data_ready_flag(&mut self) -> Result<bool, Sps30Error<I::Error>> {
        self.ensure_awake()?;
        self.query(Command::ReadDataReadyFlag, decode_data_ready)
    }

    /// Reads the latest measurement.
    ///
    /// `Ok(None)` means the sensor has no new data since the last read. Fails
    /// with a sequence error when no session is running.
    pub fn get_measurement(&mut self) -> Result<Option<MeasurementReading>, Sps30Error<I::Error>> {
        self.require(DriverState::Measuring)?;

        if !self.read_data_ready_flag()? {
            debug!("no new measurement available");
            return Ok(None);
        }
        let sensor_data = self.query(Command::ReadMeasuredValues, decode_measurement)?;
        Ok(Some(MeasurementReading { timestamp: Utc::now(), sensor_data }))
    }

    /// Ends the measurement session. Without one running this does nothing.
    pub fn stop_measurement(&mut self) -> Result<(), Sps30Error<I::Error>> {
        if self.state != DriverState::Measuring {
            debug!(state = ?self.state, "no measurement session to stop");
            return Ok(());
        }
        self.send_command(Command::StopMeasurement)?;
        self.state = DriverState::Idle;
        info!("measurement stopped");
        Ok(())
    }

    // --- Power ---

    /// Enters sleep mode. Only accepted when idle.
    pub fn sleep(&mut self) -> Result<(), Sps30Error<I::Error>> {
        match self.state {
            DriverState::Sleeping => Ok(()),
            DriverState::Measuring => Err(Sps30Error::Sequence(SequenceViolation::NotIdle)),
            DriverState::Idle => {
                self.send_command(Command::Sleep)?;
                self.state = DriverState::Sleeping;
                info!("sensor asleep");
                Ok(())
            }
        }
    }

    /// Leaves sleep mode.
    ///
    /// The interface is off while sleeping: the first transfer only wakes it
    /// and is usually not acknowledged, so its result is ignored and the
    /// command is sent again.
    pub fn wake_up(&mut self) -> Result<(), Sps30Error<I::Error>> {
        if self.state != DriverState::Sleeping {
            return Ok(());
        }
        if let Err(e) = self.transport.write(&Command::WakeUp.encode()) {
            debug!(error = ?e, "wake-up pulse not acknowledged");
        }
        self.send_command(Command::WakeUp)?;
        self.state = DriverState::Idle;
        info!("sensor awake");
        Ok(())
    }

    /// Soft reset. The sensor returns to idle from any mode.
    pub fn reset(&mut self) -> Result<(), Sps30Error<I::Error>> {
        if self.state == DriverState::Sleeping {
            self.wake_up()?;
        }
        self.send_command(Command::Reset)?;
        self.state = DriverState::Idle;
        info!("sensor reset");
        Ok(())
    }

    // --- Teardown ---

    /// Stops an active session and releases the bus.
    ///
    /// The bus is released even if stopping fails.
    pub fn shutdown(mut self) -> Result<(), Sps30Error<I::Error>> {
        let stopped = self.stop_measurement();
        self.transport.close();
        stopped
    }

    // --- State Guards ---

    fn ensure_awake(&self) -> Result<(), Sps30Error<I::Error>> {
        if self.state == DriverState::Sleeping {
            Err(Sps30Error::Sequence(SequenceViolation::Sleeping))
        } else {
            Ok(())
        }
    }

    fn require(&self, wanted: DriverState) -> Result<(), Sps30Error<I::Error>> {
        if self.state == wanted {
            return Ok(());
        }
        let violation = match (wanted, self.state) {
            (_, DriverState::Sleeping) => SequenceViolation::Sleeping,
            (DriverState::Measuring, _) => SequenceViolation::NotMeasuring,
            (DriverState::Idle, DriverState::Measuring) => SequenceViolation::AlreadyMeasuring,
            _ => SequenceViolation::NotIdle,
        };
        Err(Sps30Error::Sequence(violation))
    }
}

impl<I, D> Drop for Sps30<I, D>
where
    I: I2c,
    D: DelayNs,
{
    fn drop(&mut self) {
        if let Err(e) = self.stop_measurement() {
            warn!(error = ?e, "failed to stop measurement while dropping driver");
        }
        self.transport.close();
    }
}
