//! HID transport glue
//!
//! Bridges the synchronous scheduler to the async USB stack. The scheduler
//! hands reports to a one-slot channel, the USB task drains it into the
//! interrupt endpoint. [`IN_FLIGHT`] stays taken from the hand-off until the
//! endpoint write returns, so the transport only reads as ready when nothing
//! is queued or on the wire. Control requests are answered from a shared
//! [`HidControl`] that the scheduler updates on every send.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, Ordering};

use aethersense::report::REPORT_LEN;
use aethersense::{ControlRequest, EndpointSlot, HidControl, Transport};
use defmt::{info, warn};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;

/// Reports waiting for the interrupt endpoint, at most one
static REPORTS: Channel<CriticalSectionRawMutex, [u8; REPORT_LEN], 1> = Channel::new();

/// Report handed off and not yet written by the endpoint
static IN_FLIGHT: EndpointSlot = EndpointSlot::new();

/// Last report and idle rate, read by control requests
static CONTROL: Mutex<CriticalSectionRawMutex, RefCell<HidControl>> = Mutex::new(RefCell::new(HidControl::new()));

/// Set while the host has the device configured
static CONFIGURED: AtomicBool = AtomicBool::new(false);

/// Records the configuration state reported by the USB stack
pub fn set_configured(configured: bool) {
    CONFIGURED.store(configured, Ordering::Relaxed);
}

/// Waits for the next report to put on the wire
pub async fn next_report() -> [u8; REPORT_LEN] {
    REPORTS.receive().await
}

/// Marks the current report as finished by the endpoint
pub fn report_done() {
    IN_FLIGHT.release();
}

/// Answers a HID control request, returning the response length
pub fn handle_control(request: ControlRequest, buf: &mut [u8]) -> usize {
    CONTROL.lock(|control| control.borrow_mut().handle(request, buf))
}

/// Scheduler side of the transport
pub struct UsbTransport {
    connected: bool,
}

impl UsbTransport {
    pub const fn new() -> Self {
        Self { connected: false }
    }
}

impl Transport for UsbTransport {
    fn is_ready(&mut self) -> bool {
        self.connected && !IN_FLIGHT.is_busy()
    }

    fn send(&mut self, report: [u8; REPORT_LEN]) {
        CONTROL.lock(|control| control.borrow_mut().record(report));
        IN_FLIGHT.take();
        if REPORTS.try_send(report).is_err() {
            warn!("Report endpoint busy, dropped {}", report);
            IN_FLIGHT.release();
        }
    }

    fn service(&mut self) {
        let configured = CONFIGURED.load(Ordering::Relaxed);
        if configured != self.connected {
            info!("USB host {}", if configured { "connected" } else { "disconnected" });
            self.connected = configured;
        }
    }
}
