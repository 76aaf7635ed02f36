//! Host transport interface
//!
//! The core never talks to the USB stack directly. It needs three things from
//! the transport: whether the interrupt endpoint can take a report, a way to
//! hand one off, and a housekeeping hook that runs every tick.
//!
//! Control requests arrive asynchronously from the host and are answered from
//! [`HidControl`], which remembers the last report sent and the idle rate.
//!
//! [`EndpointSlot`] tracks the single report the interrupt endpoint may hold.
//! It is taken when a report is handed off and only given back once the
//! endpoint has finished with it, so handing a report to a queue never counts
//! as delivery.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::config::DEFAULT_IDLE_RATE;
use crate::report::{self, REPORT_LEN};

/// Host-facing transport, serviced once per scheduler tick
pub trait Transport {
    /// Whether the next report may be handed off now
    fn is_ready(&mut self) -> bool;

    /// Hands off exactly one report. Only called right after `is_ready` returned true.
    fn send(&mut self, report: [u8; REPORT_LEN]);

    /// Protocol housekeeping, called every tick regardless of pipeline state
    fn service(&mut self);
}

/// The one report slot of the interrupt endpoint
///
/// Shared between the side that hands reports off and the side that writes
/// them to the wire, hence the atomic.
#[derive(Debug)]
pub struct EndpointSlot {
    busy: AtomicBool,
}

impl EndpointSlot {
    pub const fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
        }
    }

    /// Whether a report is outstanding
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Marks a report as handed off
    pub fn take(&self) {
        self.busy.store(true, Ordering::Release);
    }

    /// Frees the slot once the endpoint is done with the report, sent or not
    pub fn release(&self) {
        self.busy.store(false, Ordering::Release);
    }
}

impl Default for EndpointSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// HID class control requests the device understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlRequest {
    GetReport,
    GetIdle,
    /// New idle rate in 4 ms units
    SetIdle(u8),
    /// Any other request code
    Other(u8),
}

/// State behind the HID control callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HidControl {
    last_report: [u8; REPORT_LEN],
    idle_rate: u8,
}

impl HidControl {
    pub const fn new() -> Self {
        Self {
            last_report: report::build(0),
            idle_rate: DEFAULT_IDLE_RATE,
        }
    }

    /// Remembers the report most recently handed to the transport
    pub fn record(&mut self, report: [u8; REPORT_LEN]) {
        self.last_report = report;
    }

    pub fn last_report(&self) -> [u8; REPORT_LEN] {
        self.last_report
    }

    /// Idle rate in 4 ms units. Stored for the host, not enforced.
    pub fn idle_rate(&self) -> u8 {
        self.idle_rate
    }

    /// Answers a control request, writing the response into `buf`
    ///
    /// Returns the response length; 0 for requests without data, unknown
    /// requests, and buffers too small for the response.
    pub fn handle(&mut self, request: ControlRequest, buf: &mut [u8]) -> usize {
        match request {
            ControlRequest::GetReport => match buf.get_mut(..REPORT_LEN) {
                Some(out) => {
                    out.copy_from_slice(&self.last_report);
                    REPORT_LEN
                }
                None => 0,
            },
            ControlRequest::GetIdle => match buf.first_mut() {
                Some(out) => {
                    *out = self.idle_rate;
                    1
                }
                None => 0,
            },
            ControlRequest::SetIdle(rate) => {
                debug!("idle rate set to {}", rate);
                self.idle_rate = rate;
                0
            }
            ControlRequest::Other(code) => {
                debug!("ignoring control request {}", code);
                0
            }
        }
    }
}

impl Default for HidControl {
    fn default() -> Self {
        Self::new()
    }
}
