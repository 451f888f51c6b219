// src/common/types.rs

use core::fmt;

use serde::Serialize;

// --- Device Status Register ---

/// The 32-bit device status register.
///
/// Flags stay set until cleared with `clear_status_register` or a reset,
/// except the fan speed warning which clears itself once the speed recovers.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct StatusBits(u32);

impl StatusBits {
    /// Fan speed is too high or too low.
    pub const FAN_SPEED_WARNING: u32 = 1 << 21;
    /// Laser current out of range.
    pub const LASER_FAILURE: u32 = 1 << 5;
    /// Fan is switched on but measures 0 rpm.
    pub const FAN_FAILURE: u32 = 1 << 4;

    pub const fn from_bits(bits: u32) -> Self {
        StatusBits(bits)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn fan_speed_warning(&self) -> bool {
        self.0 & Self::FAN_SPEED_WARNING != 0
    }

    pub const fn laser_failure(&self) -> bool {
        self.0 & Self::LASER_FAILURE != 0
    }

    pub const fn fan_failure(&self) -> bool {
        self.0 & Self::FAN_FAILURE != 0
    }

    /// No known error flag is set.
    pub const fn is_ok(&self) -> bool {
        self.0 & (Self::FAN_SPEED_WARNING | Self::LASER_FAILURE | Self::FAN_FAILURE) == 0
    }
}

impl fmt::Display for StatusBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "speed: {}, laser: {}, fan: {}",
            if self.fan_speed_warning() { "too high/too low" } else { "ok" },
            if self.laser_failure() { "out of range" } else { "ok" },
            if self.fan_failure() { "0 rpm" } else { "ok" },
        )
    }
}

// --- Firmware Version ---

/// Firmware version as reported by Read Version.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Serialize)]
pub struct FirmwareVersion {
    pub major: u8,
    pub minor: u8,
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
