// src/common/timing.rs

use core::time::Duration;

// Execution times from the SPS30 datasheet (Table "I2C commands").
// After writing a command the host must not address the sensor again
// until this time has passed.

// === Measurement Mode ===

/// Start Measurement.
pub const START_MEASUREMENT: Duration = Duration::from_millis(20);
/// Stop Measurement.
pub const STOP_MEASUREMENT: Duration = Duration::from_millis(20);

// === Power ===

/// Sleep. Only accepted in idle mode.
pub const SLEEP: Duration = Duration::from_millis(5);
/// Wake-up.
pub const WAKE_UP: Duration = Duration::from_millis(5);
/// Device Reset. Sensor needs this long before it answers again.
pub const RESET: Duration = Duration::from_millis(100);

// === Configuration / Maintenance ===

/// Start Fan Cleaning.
pub const START_FAN_CLEANING: Duration = Duration::from_millis(5);
/// Read Auto Cleaning Interval.
pub const READ_CLEANING_INTERVAL: Duration = Duration::from_millis(5);
/// Write Auto Cleaning Interval. Also covers the settle time before a read-back.
pub const WRITE_CLEANING_INTERVAL: Duration = Duration::from_millis(20);
/// Read / Clear Device Status Register.
pub const STATUS_REGISTER: Duration = Duration::from_millis(5);

// === Retry (transport) ===

/// Attempts per bus transfer, including the first.
pub const MAX_TRANSFER_ATTEMPTS: u32 = 3;
/// Backoff after attempt `n` (1-based) is `RETRY_BASE_DELAY * n`.
pub const RETRY_BASE_DELAY: Duration = Duration::from_millis(50);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worst_case_backoff_is_bounded() {
        // Backoff only happens between attempts.
        let total: Duration = (1..MAX_TRANSFER_ATTEMPTS).map(|n| RETRY_BASE_DELAY * n).sum();
        assert_eq!(total, Duration::from_millis(150));
    }
}
