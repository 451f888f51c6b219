// src/common/hal_traits.rs

//! The bus seam. The transport is generic over the embedded-hal 1.0 blocking
//! I2C and delay traits, so `linux-embedded-hal` on a host and a mock in tests
//! plug in the same way.

pub use embedded_hal::delay::DelayNs;
pub use embedded_hal::i2c::{Error as I2cError, ErrorKind, I2c};

/// Classification of bus errors for the transport's retry policy.
///
/// Blanket-implemented for every `embedded_hal::i2c::Error`.
pub trait BusFault: I2cError {
    /// Bus-busy / transfer-aborted class: worth repeating the same transfer.
    ///
    /// On Linux i2c-dev this covers `EIO`, `EBUSY` (`ErrorKind::Bus`) and
    /// `EAGAIN` (`ErrorKind::ArbitrationLoss`). A missing acknowledge means the
    /// device is absent or rejected the command and is reported at once.
    fn is_transient(&self) -> bool {
        matches!(self.kind(), ErrorKind::Bus | ErrorKind::ArbitrationLoss)
    }
}

impl<T: I2cError> BusFault for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::NoAcknowledgeSource;

    #[derive(Debug)]
    struct Fault(ErrorKind);

    impl I2cError for Fault {
        fn kind(&self) -> ErrorKind {
            self.0
        }
    }

    #[test]
    fn test_transient_kinds() {
        assert!(Fault(ErrorKind::Bus).is_transient());
        assert!(Fault(ErrorKind::ArbitrationLoss).is_transient());
    }

    #[test]
    fn test_permanent_kinds() {
        assert!(!Fault(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)).is_transient());
        assert!(!Fault(ErrorKind::Overrun).is_transient());
        assert!(!Fault(ErrorKind::Other).is_transient());
    }
}
