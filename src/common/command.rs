//! SPS30 I2C command definitions.
//!
//! Every command starts with a 16-bit big-endian pointer (opcode). Commands that
//! carry data append it as checksum-protected words.

use core::fmt;

use arrayvec::ArrayVec;

use super::crc::{encode_word, WORD_LEN};
use super::timing;

/// Largest encoded command: opcode plus two protected words.
pub const MAX_COMMAND_LEN: usize = 2 + 2 * WORD_LEN;

/// Byte sequence ready to be written to the bus.
pub type CommandFrame = ArrayVec<u8, MAX_COMMAND_LEN>;

/// Output format argument of Start Measurement: big-endian IEEE754 float.
pub const OUTPUT_FORMAT_FLOAT: [u8; 2] = [0x03, 0x00];

/// Command opcodes from the SPS30 register map.
pub mod opcode {
    pub const START_MEASUREMENT: u16 = 0x0010;
    pub const STOP_MEASUREMENT: u16 = 0x0104;
    pub const READ_DATA_READY_FLAG: u16 = 0x0202;
    pub const READ_MEASURED_VALUES: u16 = 0x0300;
    pub const SLEEP: u16 = 0x1001;
    pub const WAKE_UP: u16 = 0x1103;
    pub const START_FAN_CLEANING: u16 = 0x5607;
    pub const AUTO_CLEANING_INTERVAL: u16 = 0x8004;
    pub const READ_PRODUCT_TYPE: u16 = 0xD002;
    pub const READ_SERIAL_NUMBER: u16 = 0xD033;
    pub const READ_FIRMWARE_VERSION: u16 = 0xD100;
    pub const READ_STATUS_REGISTER: u16 = 0xD206;
    pub const CLEAR_STATUS_REGISTER: u16 = 0xD210;
    pub const RESET: u16 = 0xD304;
}

/// Represents one SPS30 command.
///
/// The `Display` implementation gives a short human-readable name with the
/// opcode, used in log output.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    /// Enter measurement mode, float output format.
    StartMeasurement,
    /// Return to idle mode.
    StopMeasurement,
    /// Whether a new measurement is available.
    ReadDataReadyFlag,
    /// Read the 10 measured values.
    ReadMeasuredValues,
    /// Enter sleep mode (idle mode only).
    Sleep,
    /// Leave sleep mode.
    WakeUp,
    /// Run the fan at maximum speed for 10 s (measurement mode only).
    StartFanCleaning,
    /// Read the auto cleaning interval in seconds.
    ReadAutoCleaningInterval,
    /// Write the auto cleaning interval in seconds. 0 disables auto cleaning.
    WriteAutoCleaningInterval { seconds: u32 },
    /// Read the product type string.
    ReadProductType,
    /// Read the serial number string.
    ReadSerialNumber,
    /// Read firmware major/minor.
    ReadFirmwareVersion,
    /// Read the 32-bit device status register.
    ReadStatusRegister,
    /// Clear the device status register.
    ClearStatusRegister,
    /// Soft reset.
    Reset,
}

impl Command {
    /// The 16-bit pointer written first.
    pub const fn opcode(&self) -> u16 {
        match self {
            Command::StartMeasurement => opcode::START_MEASUREMENT,
            Command::StopMeasurement => opcode::STOP_MEASUREMENT,
            Command::ReadDataReadyFlag => opcode::READ_DATA_READY_FLAG,
            Command::ReadMeasuredValues => opcode::READ_MEASURED_VALUES,
            Command::Sleep => opcode::SLEEP,
            Command::WakeUp => opcode::WAKE_UP,
            Command::StartFanCleaning => opcode::START_FAN_CLEANING,
            Command::ReadAutoCleaningInterval | Command::WriteAutoCleaningInterval { .. } => {
                opcode::AUTO_CLEANING_INTERVAL
            }
            Command::ReadProductType => opcode::READ_PRODUCT_TYPE,
            Command::ReadSerialNumber => opcode::READ_SERIAL_NUMBER,
            Command::ReadFirmwareVersion => opcode::READ_FIRMWARE_VERSION,
            Command::ReadStatusRegister => opcode::READ_STATUS_REGISTER,
            Command::ClearStatusRegister => opcode::CLEAR_STATUS_REGISTER,
            Command::Reset => opcode::RESET,
        }
    }

    /// Number of bytes the sensor returns after this command (0 = write only).
    pub const fn response_len(&self) -> usize {
        match self {
            Command::ReadDataReadyFlag => WORD_LEN,
            Command::ReadMeasuredValues => 20 * WORD_LEN,
            Command::ReadAutoCleaningInterval => 2 * WORD_LEN,
            Command::ReadProductType => 4 * WORD_LEN,
            Command::ReadSerialNumber => 16 * WORD_LEN,
            Command::ReadFirmwareVersion => WORD_LEN,
            Command::ReadStatusRegister => 2 * WORD_LEN,
            _ => 0,
        }
    }

    /// Time the sensor needs after the write before it can be addressed again.
    pub const fn execution_time(&self) -> core::time::Duration {
        match self {
            Command::StartMeasurement => timing::START_MEASUREMENT,
            Command::StopMeasurement => timing::STOP_MEASUREMENT,
            Command::Sleep => timing::SLEEP,
            Command::WakeUp => timing::WAKE_UP,
            Command::StartFanCleaning => timing::START_FAN_CLEANING,
            Command::ReadAutoCleaningInterval => timing::READ_CLEANING_INTERVAL,
            Command::WriteAutoCleaningInterval { .. } => timing::WRITE_CLEANING_INTERVAL,
            Command::ReadStatusRegister | Command::ClearStatusRegister => timing::STATUS_REGISTER,
            Command::Reset => timing::RESET,
            Command::ReadDataReadyFlag
            | Command::ReadMeasuredValues
            | Command::ReadProductType
            | Command::ReadSerialNumber
            | Command::ReadFirmwareVersion => core::time::Duration::ZERO,
        }
    }

    /// Encodes the command into the exact bytes the sensor expects.
    pub fn encode(&self) -> CommandFrame {
        let mut frame = CommandFrame::new();
        // Capacity covers the largest command, so these never fail.
        let _ = frame.try_extend_from_slice(&self.opcode().to_be_bytes());

        match self {
            Command::StartMeasurement => {
                let _ = frame.try_extend_from_slice(&encode_word(OUTPUT_FORMAT_FLOAT));
            }
            Command::WriteAutoCleaningInterval { seconds } => {
                let bytes = seconds.to_be_bytes();
                let _ = frame.try_extend_from_slice(&encode_word([bytes[0], bytes[1]]));
                let _ = frame.try_extend_from_slice(&encode_word([bytes[2], bytes[3]]));
            }
            _ => {}
        }
        frame
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Command::StartMeasurement => "start measurement",
            Command::StopMeasurement => "stop measurement",
            Command::ReadDataReadyFlag => "read data-ready flag",
            Command::ReadMeasuredValues => "read measured values",
            Command::Sleep => "sleep",
            Command::WakeUp => "wake-up",
            Command::StartFanCleaning => "start fan cleaning",
            Command::ReadAutoCleaningInterval => "read auto cleaning interval",
            Command::WriteAutoCleaningInterval { .. } => "write auto cleaning interval",
            Command::ReadProductType => "read product type",
            Command::ReadSerialNumber => "read serial number",
            Command::ReadFirmwareVersion => "read firmware version",
            Command::ReadStatusRegister => "read status register",
            Command::ClearStatusRegister => "clear status register",
            Command::Reset => "reset",
        };
        write!(f, "{} ({:#06x})", name, self.opcode())
    }
}
