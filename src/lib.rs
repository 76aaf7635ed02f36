//! # aethersense
//!
//! One-axis distance sensor that shows up on the host as a HID joystick.
//!
//! This library is the hardware-independent core of the firmware:
//! - [`sensor`]: non-blocking sample sources (echo pulse width, dual analog channel)
//! - [`filter`]: moving average with outlier and timeout rejection
//! - [`gate`]: at-most-one-pending-report flow control
//! - [`report`]: wire encoding and the HID report descriptor
//! - [`scheduler`]: the cooperative loop tying everything to the transport
//!
//! Hardware is reached only through `embedded-hal` traits and the small port
//! traits defined next to each sample source, so every piece runs on the host
//! under `cargo test`. The RP2350 bindings live in the firmware binary.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod calibration;
pub mod config;
pub mod error;
pub mod filter;
pub mod gate;
pub mod report;
pub mod scheduler;
pub mod sensor;
pub mod transport;

pub use calibration::Calibration;
pub use error::Error;
pub use filter::{FilterConfig, OutlierFilter};
pub use gate::DeliveryGate;
pub use scheduler::{Scheduler, TickOutcome, Watchdog};
pub use sensor::{Poll, RawSample, SampleSource};
pub use transport::{ControlRequest, EndpointSlot, HidControl, Transport};
