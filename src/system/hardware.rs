//! RP2350 bindings for the core's hardware ports
//!
//! Pins are used through their `embedded-hal` implementations directly. The
//! capture counter, the ADC sequencer and the watchdog need thin adapters.

use aethersense::sensor::dual_channel::{AdcSequencer, Channel};
use aethersense::sensor::pulse_width::CaptureCounter;
use aethersense::Watchdog;
use embassy_rp::adc::{self, Adc, Blocking};
use embassy_rp::pac;
use embassy_rp::pwm::Pwm;
use embassy_rp::watchdog;

/// PWM slice in level-gated input mode: counts while the echo pin is high.
///
/// The slice's `top` is set to the counter span minus one, so every wrap sets
/// the slice's raw interrupt flag, which serves as the overflow flag.
pub struct PwmCapture<'d> {
    pwm: Pwm<'d>,
}

impl<'d> PwmCapture<'d> {
    pub fn new(pwm: Pwm<'d>) -> Self {
        Self { pwm }
    }
}

impl CaptureCounter for PwmCapture<'_> {
    fn restart(&mut self) {
        self.pwm.set_counter(0);
        self.pwm.clear_wrapped();
    }

    fn ticks(&mut self) -> u16 {
        self.pwm.counter()
    }

    fn take_overflow(&mut self) -> bool {
        if self.pwm.wrapped() {
            self.pwm.clear_wrapped();
            true
        } else {
            false
        }
    }
}

/// Single-shot ADC driven through its control register, so starting a
/// conversion and checking for completion never wait.
pub struct RpAdc<'d> {
    // keeps the ADC powered and the pins in analog mode
    _adc: Adc<'d, Blocking>,
    _channels: [adc::Channel<'d>; 2],
    ainsel: [u8; 2],
}

impl<'d> RpAdc<'d> {
    pub fn new(adc: Adc<'d, Blocking>, channels: [adc::Channel<'d>; 2], ainsel: [u8; 2]) -> Self {
        Self {
            _adc: adc,
            _channels: channels,
            ainsel,
        }
    }
}

impl AdcSequencer for RpAdc<'_> {
    fn select(&mut self, channel: Channel) {
        let ainsel = self.ainsel.get(channel.index()).copied().unwrap_or_default();
        pac::ADC.cs().modify(|w| w.set_ainsel(ainsel));
    }

    fn start(&mut self) {
        pac::ADC.cs().modify(|w| w.set_start_once(true));
    }

    fn is_busy(&mut self) -> bool {
        !pac::ADC.cs().read().ready()
    }

    fn result(&mut self) -> u16 {
        pac::ADC.result().read().result()
    }
}

/// Hardware watchdog fed by the scheduler
pub struct RpWatchdog(watchdog::Watchdog);

impl RpWatchdog {
    pub fn new(watchdog: watchdog::Watchdog) -> Self {
        Self(watchdog)
    }
}

impl Watchdog for RpWatchdog {
    fn feed(&mut self) {
        self.0.feed();
    }
}
