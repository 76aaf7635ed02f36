//! Compile-time configuration
//!
//! Reference values for the pipeline. The tick-to-time constants assume the
//! capture slice runs at 1 MHz, i.e. the 150 MHz system clock divided by
//! [`CAPTURE_DIVIDER`] (see [`crate::calibration`] for the stored trim).

/// Number of accepted samples averaged by the filter
pub const FILTER_LEN: usize = 2;

/// Largest delta between consecutive raw samples that still counts as signal
///
/// At 1 µs per tick this is an 8 ms jump in echo time, roughly 1.4 m.
pub const JUMP_THRESHOLD: u16 = 8000;

/// Capture clock divider applied to the 150 MHz system clock (1 tick = 1 µs)
pub const CAPTURE_DIVIDER: u8 = 150;

/// Counter ticks per overflow of the capture counter (8-bit wrap)
pub const COUNTER_SPAN: u32 = 256;

/// Overflows tolerated before an echo counts as timed out (~41 ms)
pub const OVERFLOW_CAP: u16 = 160;

/// Busy-wait iterations allowed for the echo line to rise after a trigger
pub const ECHO_WAIT_SPINS: u32 = 20_000;

/// Width of the trigger pulse in microseconds
pub const TRIGGER_PULSE_US: u32 = 10;

/// Settling time after switching the ADC multiplexer, in microseconds
///
/// Shorter values corrupt the second channel's reading.
pub const SETTLE_DELAY_US: u32 = 10;

/// ADC reading at or above which a channel counts as pinned at its rail (12-bit ADC)
pub const RAIL_THRESHOLD: u16 = 4080;

/// Default HID idle rate in 4 ms units (0 = only report on change)
pub const DEFAULT_IDLE_RATE: u8 = 0;
