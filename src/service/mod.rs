// src/service/mod.rs

//! Periodic measurement upload loop.

pub mod config;
pub mod upload;

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::common::{
    error::Sps30Error,
    hal_traits::{DelayNs, I2c},
};
use crate::driver::Sps30;

pub use config::{ServiceConfig, ServiceOverrides};
pub use upload::{HttpUploader, UploadError, UploadRequest, UploadValue, Uploader};

/// Upper bound on how long a stop request goes unnoticed while waiting.
const SHUTDOWN_POLL_SLICE: Duration = Duration::from_millis(100);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PollSettings {
    /// Wait between two measurement polls.
    pub interval: Duration,
    /// Applied once before the session starts.
    pub cleaning_interval_days: i64,
}

/// Runs a measurement session and uploads every new reading until `shutdown`
/// is set, then stops the session.
///
/// Failing to set the cleaning interval, to read a measurement or to upload it
/// is logged and the loop carries on. Only failing to start or stop the
/// session is returned.
pub fn run<I, D, U>(
    sensor: &mut Sps30<I, D>,
    uploader: &U,
    settings: &PollSettings,
    shutdown: &AtomicBool,
) -> Result<(), Sps30Error<I::Error>>
where
    I: I2c,
    D: DelayNs,
    U: Uploader,
{
    match sensor.write_auto_cleaning_interval_days(settings.cleaning_interval_days) {
        Ok(seconds) => info!(seconds, "auto cleaning interval applied"),
        Err(e) => warn!(error = %e, "failed to set auto cleaning interval"),
    }

    sensor.start_measurement()?;

    while !shutdown.load(Ordering::SeqCst) {
        match sensor.get_measurement() {
            Ok(Some(reading)) => {
                let request = UploadRequest::from(&reading);
                if let Err(e) = uploader.upload(&request) {
                    error!(error = %e, "upload failed");
                }
            }
            Ok(None) => debug!("no new measurement"),
            Err(e) => error!(error = %e, "failed to read measurement"),
        }
        wait_for_shutdown(settings.interval, shutdown);
    }

    info!("stopping sensor");
    sensor.stop_measurement()
}

/// Sleeps for `duration` in short slices, returning early once `shutdown` is
/// set. Returns whether shutdown was requested.
pub fn wait_for_shutdown(duration: Duration, shutdown: &AtomicBool) -> bool {
    let deadline = Instant::now() + duration;
    loop {
        if shutdown.load(Ordering::SeqCst) {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        thread::sleep((deadline - now).min(SHUTDOWN_POLL_SLICE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::address::DeviceAddress;
    use crate::common::response::parse::fixtures;
    use crate::driver::DriverState;
    use crate::mock::{MockBus, MockDelay, MockState, NACK};
    use crate::transport::BusTransport;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Keeps requests and raises the shutdown flag after `stop_after` calls.
    struct RecordingUploader<'a> {
        requests: RefCell<Vec<UploadRequest>>,
        stop_after: usize,
        shutdown: &'a AtomicBool,
        fail: bool,
    }

    impl<'a> RecordingUploader<'a> {
        fn new(stop_after: usize, shutdown: &'a AtomicBool) -> Self {
            Self { requests: RefCell::new(Vec::new()), stop_after, shutdown, fail: false }
        }
    }

    impl Uploader for RecordingUploader<'_> {
        fn upload(&self, request: &UploadRequest) -> Result<(), UploadError> {
            let mut requests = self.requests.borrow_mut();
            requests.push(request.clone());
            if requests.len() >= self.stop_after {
                self.shutdown.store(true, Ordering::SeqCst);
            }
            if self.fail {
                return Err(UploadError::Status { status: 500, reason: "Internal Server Error".into() });
            }
            Ok(())
        }
    }

    const SETTINGS: PollSettings = PollSettings { interval: Duration::ZERO, cleaning_interval_days: 2 };

    fn sensor() -> (Sps30<MockBus, MockDelay>, Rc<RefCell<MockState>>) {
        let (bus, state) = MockBus::new();
        let (delay, _) = MockDelay::new();
        (Sps30::new(BusTransport::new(bus, delay, DeviceAddress::SPS30)), state)
    }

    fn stage_reading(state: &Rc<RefCell<MockState>>) {
        let mut s = state.borrow_mut();
        s.stage_response(&fixtures::DATA_READY);
        s.stage_response(&fixtures::MEASUREMENT);
    }

    #[test]
    fn test_uploads_until_shutdown_then_stops() {
        let (mut sps, state) = sensor();
        state.borrow_mut().stage_response(&fixtures::INTERVAL_TWO_DAYS);
        stage_reading(&state);
        state.borrow_mut().stage_response(&fixtures::DATA_NOT_READY);
        stage_reading(&state);

        let shutdown = AtomicBool::new(false);
        let uploader = RecordingUploader::new(2, &shutdown);
        run(&mut sps, &uploader, &SETTINGS, &shutdown).unwrap();

        let requests = uploader.requests.borrow();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].values.len(), 10);
        assert_eq!(sps.state(), DriverState::Idle);
        assert_eq!(state.borrow().writes.last().unwrap(), &vec![0x01, 0x04]);
    }

    #[test]
    fn test_upload_failure_does_not_end_loop() {
        let (mut sps, state) = sensor();
        state.borrow_mut().stage_response(&fixtures::INTERVAL_TWO_DAYS);
        stage_reading(&state);
        stage_reading(&state);

        let shutdown = AtomicBool::new(false);
        let mut uploader = RecordingUploader::new(2, &shutdown);
        uploader.fail = true;
        run(&mut sps, &uploader, &SETTINGS, &shutdown).unwrap();

        assert_eq!(uploader.requests.borrow().len(), 2);
        assert_eq!(sps.state(), DriverState::Idle);
    }

    #[test]
    fn test_interval_failure_is_not_fatal() {
        let (mut sps, state) = sensor();
        state.borrow_mut().write_faults.push_back(NACK);
        stage_reading(&state);

        let shutdown = AtomicBool::new(false);
        let uploader = RecordingUploader::new(1, &shutdown);
        run(&mut sps, &uploader, &SETTINGS, &shutdown).unwrap();

        assert_eq!(uploader.requests.borrow().len(), 1);
    }

    #[test]
    fn test_start_failure_is_returned() {
        let (mut sps, state) = sensor();
        // The interval is rejected before any transfer, so the NACK hits start.
        let settings = PollSettings { cleaning_interval_days: -1, ..SETTINGS };
        state.borrow_mut().write_faults.push_back(NACK);

        let shutdown = AtomicBool::new(false);
        let uploader = RecordingUploader::new(1, &shutdown);
        assert!(matches!(
            run(&mut sps, &uploader, &settings, &shutdown),
            Err(Sps30Error::Io(_))
        ));
        assert_eq!(sps.state(), DriverState::Idle);
    }

    #[test]
    fn test_preset_shutdown_skips_polling() {
        let (mut sps, state) = sensor();
        state.borrow_mut().stage_response(&fixtures::INTERVAL_TWO_DAYS);

        let shutdown = AtomicBool::new(true);
        let uploader = RecordingUploader::new(1, &shutdown);
        run(&mut sps, &uploader, &SETTINGS, &shutdown).unwrap();

        assert!(uploader.requests.borrow().is_empty());
        // interval write + read-back, start, stop
        assert_eq!(state.borrow().writes.len(), 4);
    }

    #[test]
    fn test_wait_returns_early_on_shutdown() {
        let shutdown = AtomicBool::new(true);
        let started = Instant::now();
        assert!(wait_for_shutdown(Duration::from_secs(60), &shutdown));
        assert!(started.elapsed() < Duration::from_secs(1));

        let idle = AtomicBool::new(false);
        assert!(!wait_for_shutdown(Duration::from_millis(10), &idle));
    }
}
