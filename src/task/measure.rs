//! Distance measurement loop
//!
//! Owns the sample source, filter, status LED and watchdog, and runs the
//! cooperative scheduler from the core library.
//!
//! # Sensor Operation
//! - pulse-width variant: HC-SR04 style echo timed by a PWM slice in
//!   level-gated input mode, 1 tick per µs at the factory divider
//! - dual-channel variant: two ADC inputs converted one after the other
//!
//! # Cadence
//! The loop runs one scheduler tick and then yields to the executor, so the
//! USB stack in the main task runs between every two ticks. A tick never
//! waits on hardware except the bounded echo wait of the pulse-width source.
//!
//! # Watchdog
//! Started here with a 1 s period and fed at the top of every tick.

use aethersense::config::FILTER_LEN;
use aethersense::{Calibration, FilterConfig, OutlierFilter, SampleSource, Scheduler};
use defmt::info;
use embassy_futures::yield_now;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::watchdog::Watchdog;
use embassy_time::Duration;

use crate::system::hardware::RpWatchdog;
use crate::system::hid::UsbTransport;
use crate::system::resources::{StatusLedResources, WatchdogResources};

/// Watchdog period, the loop must tick at least this often
const WATCHDOG_PERIOD: Duration = Duration::from_secs(1);

#[cfg(feature = "pulse-width")]
pub use pulse_width::{build_source, SensorResources};

#[cfg(feature = "dual-channel")]
pub use dual_channel::{build_source, SensorResources};

#[cfg(feature = "pulse-width")]
mod pulse_width {
    use aethersense::config::{CAPTURE_DIVIDER, COUNTER_SPAN};
    use aethersense::sensor::pulse_width::{PulseWidthCapture, PulseWidthConfig};
    use aethersense::Calibration;
    use defmt::info;
    use embassy_rp::gpio::{Input, Level, Output, Pull};
    use embassy_rp::pwm::{self, InputMode, Pwm};
    use embassy_time::Delay;

    use crate::system::hardware::PwmCapture;
    pub use crate::system::resources::EchoSensorResources as SensorResources;

    pub fn build_source(
        r: SensorResources,
        calibration: Calibration,
    ) -> PulseWidthCapture<Output<'static>, Input<'static>, PwmCapture<'static>, Delay> {
        let divider = calibration.capture_divider(CAPTURE_DIVIDER);

        let mut config = pwm::Config::default();
        config.divider = divider.into();
        config.top = (COUNTER_SPAN - 1) as u16;
        // the PWM slice and the level check share the echo pin, pad input reaches both
        let echo = Input::new(unsafe { r.echo_pin.clone_unchecked() }, Pull::Down);
        let capture = Pwm::new_input(r.capture_slice, r.echo_pin, Pull::Down, InputMode::Level, config);
        let trigger = Output::new(r.trigger_pin, Level::Low);

        info!("Pulse-width capture, clock divider {}", divider);
        PulseWidthCapture::new(
            trigger,
            echo,
            PwmCapture::new(capture),
            Delay,
            PulseWidthConfig::default(),
        )
    }
}

#[cfg(feature = "dual-channel")]
mod dual_channel {
    use aethersense::sensor::dual_channel::{DualChannelConfig, DualChannelSampler};
    use aethersense::Calibration;
    use defmt::info;
    use embassy_rp::adc::{self, Adc};
    use embassy_rp::gpio::Pull;
    use embassy_time::Delay;

    use crate::system::hardware::RpAdc;
    use crate::system::resources::{CHANNEL_A_AINSEL, CHANNEL_B_AINSEL};
    pub use crate::system::resources::AnalogResources as SensorResources;

    pub fn build_source(r: SensorResources, _calibration: Calibration) -> DualChannelSampler<RpAdc<'static>, Delay> {
        let adc = Adc::new_blocking(r.adc, adc::Config::default());
        let channels = [
            adc::Channel::new_pin(r.channel_a_pin, Pull::None),
            adc::Channel::new_pin(r.channel_b_pin, Pull::None),
        ];
        let config = DualChannelConfig::default();

        info!("Dual-channel sampler, pair mode {:?}", config.pair_mode);
        DualChannelSampler::new(
            RpAdc::new(adc, channels, [CHANNEL_A_AINSEL, CHANNEL_B_AINSEL]),
            Delay,
            config,
        )
    }
}

/// Measurement task: builds the pipeline and ticks it forever
#[embassy_executor::task]
pub async fn measure(
    sensor: SensorResources,
    status_led: StatusLedResources,
    watchdog: WatchdogResources,
    calibration: Calibration,
) {
    let source = build_source(sensor, calibration);
    let filter = OutlierFilter::<FILTER_LEN>::new(FilterConfig::default());
    let status = Output::new(status_led.led_pin, Level::Low);

    let mut watchdog = Watchdog::new(watchdog.watchdog);
    watchdog.start(WATCHDOG_PERIOD);

    info!("Measurement loop started");
    run(Scheduler::new(source, filter, UsbTransport::new(), RpWatchdog::new(watchdog), status)).await;
}

async fn run<S: SampleSource>(
    mut scheduler: Scheduler<S, UsbTransport, RpWatchdog, Output<'static>, FILTER_LEN>,
) {
    loop {
        scheduler.tick();
        yield_now().await;
    }
}
