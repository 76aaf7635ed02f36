//! USB HID device
//!
//! Runs the USB stack and moves reports from the scheduler to the interrupt
//! endpoint. Control requests (GET_REPORT, GET_IDLE, SET_IDLE) are answered
//! from the shared HID state in [`crate::system::hid`].
//!
//! Everything here is async and lives in the main task; the scheduler in the
//! measurement task never waits on it.

use aethersense::report::{REPORT_DESCRIPTOR, REPORT_LEN};
use aethersense::ControlRequest;
use defmt::{info, warn};
use embassy_futures::join::join;
use embassy_rp::usb::Driver;
use embassy_usb::class::hid::{Config as HidConfig, HidWriter, ReportId, RequestHandler, State};
use embassy_usb::control::OutResponse;
use embassy_usb::{Builder, Config, Handler};

use crate::system::hid;
use crate::system::resources::{Irqs, UsbResources};

const USB_VID: u16 = 0x16c0;
const USB_PID: u16 = 0x27dc;

/// Interrupt endpoint polling interval
const POLL_MS: u8 = 10;

/// Idle rate unit, HID reports the rate in 4 ms steps
const IDLE_RATE_UNIT_MS: u32 = 4;

/// Answers HID class control requests
struct ControlRequests;

impl RequestHandler for ControlRequests {
    fn get_report(&mut self, _id: ReportId, buf: &mut [u8]) -> Option<usize> {
        Some(hid::handle_control(ControlRequest::GetReport, buf))
    }

    fn set_report(&mut self, _id: ReportId, _data: &[u8]) -> OutResponse {
        OutResponse::Rejected
    }

    fn get_idle_ms(&mut self, _id: Option<ReportId>) -> Option<u32> {
        let mut rate = [0u8; 1];
        hid::handle_control(ControlRequest::GetIdle, &mut rate);
        Some(u32::from(rate[0]) * IDLE_RATE_UNIT_MS)
    }

    fn set_idle_ms(&mut self, _id: Option<ReportId>, duration_ms: u32) {
        let rate = (duration_ms / IDLE_RATE_UNIT_MS).min(u32::from(u8::MAX)) as u8;
        hid::handle_control(ControlRequest::SetIdle(rate), &mut []);
    }
}

/// Tracks whether the host has configured the device
struct ConnectionHandler;

impl Handler for ConnectionHandler {
    fn configured(&mut self, configured: bool) {
        hid::set_configured(configured);
    }
}

/// Runs the USB device and report writer forever
pub async fn serve(r: UsbResources) {
    let driver = Driver::new(r.usb, Irqs);

    let mut config = Config::new(USB_VID, USB_PID);
    config.manufacturer = Some("aethersense");
    config.product = Some("aethersense distance joystick");
    config.serial_number = Some("00000001");
    config.max_power = 100;
    config.max_packet_size_0 = 64;

    let mut config_descriptor = [0; 256];
    let mut bos_descriptor = [0; 256];
    let mut msos_descriptor = [0; 256];
    let mut control_buf = [0; 64];

    let mut request_handler = ControlRequests;
    let mut connection_handler = ConnectionHandler;
    let mut state = State::new();

    let mut builder = Builder::new(
        driver,
        config,
        &mut config_descriptor,
        &mut bos_descriptor,
        &mut msos_descriptor,
        &mut control_buf,
    );
    builder.handler(&mut connection_handler);

    let hid_config = HidConfig {
        report_descriptor: &REPORT_DESCRIPTOR,
        request_handler: Some(&mut request_handler),
        poll_ms: POLL_MS,
        max_packet_size: 8,
    };
    let mut writer = HidWriter::<_, REPORT_LEN>::new(&mut builder, &mut state, hid_config);
    let mut usb = builder.build();

    info!("USB HID device ready");

    let write_reports = async {
        loop {
            let report = hid::next_report().await;
            if let Err(e) = writer.write(&report).await {
                warn!("Failed to send report: {:?}", e);
            }
            hid::report_done();
        }
    };

    join(usb.run(), write_reports).await;
}
