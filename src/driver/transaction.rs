// src/driver/transaction.rs

use super::Sps30;
use crate::common::{
    command::Command,
    error::Sps30Error,
    frame::MAX_RESPONSE_LEN,
    hal_traits::{DelayNs, I2c},
    response::DecodeError,
};
use tracing::{debug, trace};

impl<I, D> Sps30<I, D>
where
    I: I2c,
    D: DelayNs,
{
    /// Writes a command and waits out its execution time.
    pub(super) fn send_command(&mut self, command: Command) -> Result<(), Sps30Error<I::Error>> {
        debug!(%command, "sending command");
        let frame = command.encode();
        self.transport.write(&frame)?;
        self.transport.pause(command.execution_time());
        Ok(())
    }

    /// Sends a read command, reads its fixed-size response and decodes it.
    ///
    /// No retry happens here: transfers are already retried by the transport
    /// and a decode failure would repeat identically.
    pub(super) fn query<T>(
        &mut self,
        command: Command,
        decode: fn(&[u8]) -> Result<T, DecodeError>,
    ) -> Result<T, Sps30Error<I::Error>> {
        self.send_command(command)?;

        let mut buffer = [0u8; MAX_RESPONSE_LEN];
        let response = &mut buffer[..command.response_len()];
        self.transport.read(response)?;
        trace!(%command, response = ?response, "received response");

        decode(response).map_err(|e| {
            debug!(%command, error = %e, "response rejected");
            Sps30Error::from(e)
        })
    }
}
