//! Sensor firmware entry point
//!
//! Initializes the system, reads the calibration byte, spawns the
//! measurement task and runs the USB device in the main task.

#![no_std]
#![no_main]

#[cfg(all(feature = "pulse-width", feature = "dual-channel"))]
compile_error!("features `pulse-width` and `dual-channel` are mutually exclusive");

#[cfg(not(any(feature = "pulse-width", feature = "dual-channel")))]
compile_error!("enable one of the features `pulse-width` or `dual-channel`");

use crate::task::measure::measure;
use defmt::info;
use embassy_executor::Spawner;
use embassy_rp::block::ImageDef;
use embassy_rp::config::Config;
use embassy_time::{Duration, Timer};
use system::resources::{
    AnalogResources, AssignedResources, EchoSensorResources, StatusLedResources, StorageResources, UsbResources,
    WatchdogResources,
};
use {defmt_rtt as _, panic_probe as _};

/// Firmware image type for bootloader
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

/// Time the host gets to notice the disconnect after a reset
const USB_SETTLE: Duration = Duration::from_millis(300);

/// System core modules
mod system;
/// Task implementations
mod task;

/// Firmware entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Config::default());

    // Split the resources into separate groups for each task
    let r = split_resources!(p);

    let calibration = system::storage::load_calibration(r.storage);

    Timer::after(USB_SETTLE).await;

    #[cfg(feature = "pulse-width")]
    let sensor = r.echo_sensor;
    #[cfg(feature = "dual-channel")]
    let sensor = r.analog;

    spawner
        .spawn(measure(sensor, r.status_led, r.watchdog, calibration))
        .unwrap();

    info!("Sensor started");
    task::usb::serve(r.usb).await;
}
