//! Echo pulse-width capture
//!
//! Measures the high time of an ultrasonic sensor's echo line (HC-SR04 style).
//!
//! # Cycle
//! 1. Idle: pulse the trigger, then busy-wait for the echo to rise. This wait
//!    is the only blocking point in the whole pipeline and is bounded by
//!    [`PulseWidthConfig::echo_wait_spins`].
//! 2. Measuring: every poll checks the capture counter's overflow flag and the
//!    echo level. The cycle ends when the echo falls or the overflow count
//!    exceeds [`PulseWidthConfig::overflow_cap`].
//!
//! The raw duration is `ticks + counter_span * overflows`. Anything that ran
//! into the cap, or an echo that never rose, is reported as a timed-out sample
//! carrying `u16::MAX` so it can never pass as a reading.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use super::{Poll, RawSample, SampleSource};
use crate::config::{COUNTER_SPAN, ECHO_WAIT_SPINS, OVERFLOW_CAP, TRIGGER_PULSE_US};

/// Free-running counter gated by the echo line
pub trait CaptureCounter {
    /// Zeroes the counter and clears a pending overflow flag
    fn restart(&mut self);

    /// Current counter value, always below the counter span
    fn ticks(&mut self) -> u16;

    /// Returns and clears the overflow flag
    fn take_overflow(&mut self) -> bool;
}

/// Timing limits of the capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseWidthConfig {
    /// Overflows tolerated before the echo counts as timed out
    pub overflow_cap: u16,
    /// Counter ticks per overflow
    pub counter_span: u32,
    /// Busy-wait iterations allowed for the echo to rise
    pub echo_wait_spins: u32,
    /// Trigger pulse width in microseconds
    pub trigger_pulse_us: u32,
}

impl Default for PulseWidthConfig {
    fn default() -> Self {
        Self {
            overflow_cap: OVERFLOW_CAP,
            counter_span: COUNTER_SPAN,
            echo_wait_spins: ECHO_WAIT_SPINS,
            trigger_pulse_us: TRIGGER_PULSE_US,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AcquisitionState {
    /// Next poll starts a new cycle
    Idle,
    /// Echo is high, counting
    Measuring { overflows: u16 },
}

/// Pulse-width sample source
pub struct PulseWidthCapture<T, E, C, D> {
    trigger: T,
    echo: E,
    counter: C,
    delay: D,
    config: PulseWidthConfig,
    state: AcquisitionState,
}

impl<T, E, C, D> PulseWidthCapture<T, E, C, D>
where
    T: OutputPin,
    E: InputPin,
    C: CaptureCounter,
    D: DelayNs,
{
    pub fn new(trigger: T, echo: E, counter: C, delay: D, config: PulseWidthConfig) -> Self {
        Self {
            trigger,
            echo,
            counter,
            delay,
            config,
            state: AcquisitionState::Idle,
        }
    }

    pub fn state(&self) -> AcquisitionState {
        self.state
    }

    /// Releases the owned peripherals
    pub fn release(self) -> (T, E, C, D) {
        (self.trigger, self.echo, self.counter, self.delay)
    }

    fn echo_active(&mut self) -> bool {
        self.echo.is_high().unwrap_or(false)
    }

    fn start_cycle(&mut self) -> Poll {
        let _ = self.trigger.set_high();
        self.delay.delay_us(self.config.trigger_pulse_us);
        let _ = self.trigger.set_low();

        let mut spins = 0;
        while !self.echo_active() {
            if spins >= self.config.echo_wait_spins {
                warn!("echo did not rise within {} spins", spins);
                return Poll::Ready(RawSample::timed_out(u16::MAX));
            }
            spins += 1;
            core::hint::spin_loop();
        }

        self.counter.restart();
        self.state = AcquisitionState::Measuring { overflows: 0 };
        Poll::InProgress
    }

    fn measure(&mut self, mut overflows: u16) -> Poll {
        if self.counter.take_overflow() {
            overflows = overflows.saturating_add(1);
        }
        if overflows > self.config.overflow_cap {
            self.state = AcquisitionState::Idle;
            debug!("echo timed out after {} overflows", overflows);
            return Poll::Ready(RawSample::timed_out(u16::MAX));
        }
        if self.echo_active() {
            self.state = AcquisitionState::Measuring { overflows };
            return Poll::InProgress;
        }

        self.state = AcquisitionState::Idle;
        let ticks = self.counter.ticks();
        // a wrap between the first flag check and the echo check is not counted yet
        if self.counter.take_overflow() {
            overflows = overflows.saturating_add(1);
        }
        if overflows > self.config.overflow_cap {
            return Poll::Ready(RawSample::timed_out(u16::MAX));
        }

        let duration = u32::from(ticks) + self.config.counter_span * u32::from(overflows);
        match u16::try_from(duration) {
            Ok(duration) => {
                trace!("echo width {} ticks", duration);
                Poll::Ready(RawSample::new(duration))
            }
            Err(_) => Poll::Ready(RawSample::timed_out(u16::MAX)),
        }
    }
}

impl<T, E, C, D> SampleSource for PulseWidthCapture<T, E, C, D>
where
    T: OutputPin,
    E: InputPin,
    C: CaptureCounter,
    D: DelayNs,
{
    fn poll(&mut self) -> Poll {
        match self.state {
            AcquisitionState::Idle => self.start_cycle(),
            AcquisitionState::Measuring { overflows } => self.measure(overflows),
        }
    }
}
