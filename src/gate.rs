//! Delivery gate
//!
//! Flow control between the filter and the transport: holds at most one
//! filtered value until the transport can take it.
//!
//! ```text
//! Empty --offer--> Occupied --try_deliver (transport ready)--> Empty
//! ```

use crate::error::Error;
use crate::report;
use crate::transport::Transport;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeliveryGate {
    pending: Option<u16>,
}

impl DeliveryGate {
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Stores `value` as the pending report
    ///
    /// Fails without touching the pending value if the gate is occupied.
    pub fn offer(&mut self, value: u16) -> Result<(), Error> {
        if self.pending.is_some() {
            warn!("offer of {} rejected, report still pending", value);
            return Err(Error::GateOccupied);
        }
        self.pending = Some(value);
        Ok(())
    }

    /// Sends the pending report if there is one and the transport is ready
    pub fn try_deliver<T: Transport>(&mut self, transport: &mut T) -> bool {
        let Some(value) = self.pending else {
            return false;
        };
        if !transport.is_ready() {
            return false;
        }
        transport.send(report::build(value));
        self.pending = None;
        true
    }

    pub fn is_occupied(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<u16> {
        self.pending
    }
}
