//! Echo pulse-width capture tests

mod common;

use aethersense::sensor::pulse_width::{AcquisitionState, PulseWidthCapture, PulseWidthConfig};
use aethersense::{Poll, RawSample, SampleSource};
use common::{Event, MockCounter, MockDelay, MockEcho, MockPin};

type Capture = PulseWidthCapture<MockPin, MockEcho, MockCounter, MockDelay>;

fn capture(echo: MockEcho, config: PulseWidthConfig) -> (Capture, MockPin, MockCounter, MockDelay) {
    let trigger = MockPin::default();
    let counter = MockCounter::default();
    let delay = MockDelay::default();
    let capture = PulseWidthCapture::new(trigger.clone(), echo, counter.clone(), delay.clone(), config);
    (capture, trigger, counter, delay)
}

fn config() -> PulseWidthConfig {
    PulseWidthConfig {
        overflow_cap: 4,
        counter_span: 256,
        echo_wait_spins: 50,
        trigger_pulse_us: 10,
    }
}

#[test]
fn test_cycle_start_pulses_trigger_and_waits_for_echo() {
    let echo = MockEcho::rising_after(3);
    let (mut capture, trigger, counter, delay) = capture(echo.clone(), config());

    assert_eq!(capture.poll(), Poll::InProgress);
    assert_eq!(*trigger.history.borrow(), vec![true, false]);
    assert_eq!(*delay.log.borrow(), vec![Event::Delay(10_000)]);
    assert_eq!(echo.reads(), 4);
    assert_eq!(counter.restarts(), 1);
    assert_eq!(capture.state(), AcquisitionState::Measuring { overflows: 0 });
}

#[test]
fn test_duration_counts_overflows() {
    let echo = MockEcho::rising_after(0);
    let (mut capture, _, counter, _) = capture(echo.clone(), config());

    assert_eq!(capture.poll(), Poll::InProgress);

    counter.overflow();
    assert_eq!(capture.poll(), Poll::InProgress);
    counter.overflow();
    assert_eq!(capture.poll(), Poll::InProgress);
    assert_eq!(capture.state(), AcquisitionState::Measuring { overflows: 2 });

    counter.set_ticks(40);
    echo.fall();
    assert_eq!(capture.poll(), Poll::Ready(RawSample::new(40 + 2 * 256)));
    assert_eq!(capture.state(), AcquisitionState::Idle);
}

#[test]
fn test_short_echo_without_overflow() {
    let echo = MockEcho::rising_after(1);
    let (mut capture, _, counter, _) = capture(echo.clone(), config());

    capture.poll();
    counter.set_ticks(117);
    echo.fall();
    assert_eq!(capture.poll(), Poll::Ready(RawSample::new(117)));
}

#[test]
fn test_echo_that_never_rises_times_out() {
    let echo = MockEcho::silent();
    let (mut capture, _, counter, _) = capture(echo.clone(), config());

    assert_eq!(capture.poll(), Poll::Ready(RawSample::timed_out(u16::MAX)));
    assert!(echo.reads() <= 51);
    assert_eq!(counter.restarts(), 0);
    assert_eq!(capture.state(), AcquisitionState::Idle);
}

#[test]
fn test_overflow_cap_times_out() {
    let echo = MockEcho::rising_after(0);
    let (mut capture, _, counter, _) = capture(echo, config());

    capture.poll();
    for _ in 0..4 {
        counter.overflow();
        assert_eq!(capture.poll(), Poll::InProgress);
    }
    counter.overflow();
    assert_eq!(capture.poll(), Poll::Ready(RawSample::timed_out(u16::MAX)));
    assert_eq!(capture.state(), AcquisitionState::Idle);
}

#[test]
fn test_duration_beyond_u16_is_a_timeout() {
    let echo = MockEcho::rising_after(0);
    let config = PulseWidthConfig {
        overflow_cap: 300,
        ..config()
    };
    let (mut capture, _, counter, _) = capture(echo.clone(), config);

    capture.poll();
    for _ in 0..256 {
        counter.overflow();
        capture.poll();
    }
    echo.fall();
    assert_eq!(capture.poll(), Poll::Ready(RawSample::timed_out(u16::MAX)));
}

#[test]
fn test_next_poll_after_result_starts_new_cycle() {
    let echo = MockEcho::rising_after(0);
    let (mut capture, trigger, counter, _) = capture(echo.clone(), config());

    capture.poll();
    echo.fall();
    assert!(matches!(capture.poll(), Poll::Ready(_)));

    echo.0.borrow_mut().reads_until_rise = Some(0);
    assert_eq!(capture.poll(), Poll::InProgress);
    assert_eq!(counter.restarts(), 2);
    assert_eq!(*trigger.history.borrow(), vec![true, false, true, false]);
}
