// src/mock.rs

//! Scriptable bus and delay for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{self, ErrorKind, Operation};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MockFault(pub ErrorKind);

impl i2c::Error for MockFault {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

pub const TRANSIENT: MockFault = MockFault(ErrorKind::Bus);
pub const NACK: MockFault = MockFault(ErrorKind::NoAcknowledge(i2c::NoAcknowledgeSource::Address));

#[derive(Debug, Default)]
pub struct MockState {
    /// Successfully written frames, in order.
    pub writes: Vec<Vec<u8>>,
    /// Staged responses, consumed one per read.
    pub responses: VecDeque<Vec<u8>>,
    /// Faults returned by the next write attempts, before any succeeds.
    pub write_faults: VecDeque<MockFault>,
    /// Faults returned by the next read attempts.
    pub read_faults: VecDeque<MockFault>,
    pub write_attempts: usize,
    pub read_attempts: usize,
    pub addresses: Vec<u8>,
    pub dropped: bool,
}

impl MockState {
    pub fn stage_response(&mut self, bytes: &[u8]) {
        self.responses.push_back(bytes.to_vec());
    }
}

/// Cloning shares the state, so a test keeps a handle after moving the bus.
#[derive(Debug, Clone, Default)]
pub struct MockBus {
    pub state: Rc<RefCell<MockState>>,
}

impl MockBus {
    pub fn new() -> (Self, Rc<RefCell<MockState>>) {
        let bus = MockBus::default();
        let state = bus.state.clone();
        (bus, state)
    }
}

impl Drop for MockBus {
    fn drop(&mut self) {
        // Only the copy owned by the transport is tracked; tests hold the Rc.
        if Rc::strong_count(&self.state) <= 2 {
            self.state.borrow_mut().dropped = true;
        }
    }
}

impl i2c::ErrorType for MockBus {
    type Error = MockFault;
}

impl i2c::I2c for MockBus {
    fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        state.addresses.push(address);
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    state.write_attempts += 1;
                    if let Some(fault) = state.write_faults.pop_front() {
                        return Err(fault);
                    }
                    state.writes.push(bytes.to_vec());
                }
                Operation::Read(buffer) => {
                    state.read_attempts += 1;
                    if let Some(fault) = state.read_faults.pop_front() {
                        return Err(fault);
                    }
                    let response = state.responses.pop_front().unwrap_or_default();
                    buffer.fill(0);
                    let n = response.len().min(buffer.len());
                    buffer[..n].copy_from_slice(&response[..n]);
                }
            }
        }
        Ok(())
    }
}

/// Accumulates requested delay instead of sleeping.
#[derive(Debug, Clone, Default)]
pub struct MockDelay {
    pub elapsed_ns: Rc<RefCell<u64>>,
}

impl MockDelay {
    pub fn new() -> (Self, Rc<RefCell<u64>>) {
        let delay = MockDelay::default();
        let elapsed = delay.elapsed_ns.clone();
        (delay, elapsed)
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        *self.elapsed_ns.borrow_mut() += u64::from(ns);
    }
}
