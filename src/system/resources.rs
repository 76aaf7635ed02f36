//! Hardware Resource Management
//!
//! Assigns pins and peripherals to the parts of the firmware that own them.
//! Every peripheral has exactly one owner, there is no shared hardware.
//!
//! # Resource Groups
//! - Echo sensor: trigger/echo pins and the PWM slice that times the echo
//! - Analog inputs: ADC and the two channel pins of the dual-channel variant
//! - Status LED: measurement pending indicator
//! - USB: host transport
//! - Watchdog: liveness guard fed by the measurement loop
//! - Storage: flash holding the calibration byte

use assign_resources::assign_resources;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::{self, USB};
use embassy_rp::usb::InterruptHandler as UsbInterruptHandler;

/// ADC input number of `channel_a_pin` (GPIO26)
pub const CHANNEL_A_AINSEL: u8 = 0;

/// ADC input number of `channel_b_pin` (GPIO27)
pub const CHANNEL_B_AINSEL: u8 = 1;

assign_resources! {
    /// HC-SR04 style echo sensor. The echo pin must be the B input of the capture slice.
    echo_sensor: EchoSensorResources {
        trigger_pin: PIN_14,
        echo_pin: PIN_15,
        capture_slice: PWM_SLICE7,
    },
    /// Analog inputs for the dual-channel variant
    analog: AnalogResources {
        adc: ADC,
        channel_a_pin: PIN_26,
        channel_b_pin: PIN_27,
    },
    /// Measurement pending indicator (active high)
    status_led: StatusLedResources {
        led_pin: PIN_25,
    },
    /// USB device controller
    usb: UsbResources {
        usb: USB,
    },
    /// Hardware watchdog
    watchdog: WatchdogResources {
        watchdog: WATCHDOG,
    },
    /// Flash holding the calibration byte
    storage: StorageResources {
        flash: FLASH,
    },
}

bind_interrupts!(pub struct Irqs {
    USBCTRL_IRQ => UsbInterruptHandler<USB>;
});
