//! Host-side stand-ins for pins, counters, ADC and transport

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use aethersense::report::REPORT_LEN;
use aethersense::sensor::dual_channel::{AdcSequencer, Channel};
use aethersense::sensor::pulse_width::CaptureCounter;
use aethersense::{Poll, SampleSource, Transport, Watchdog};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

/// Output pin remembering every level written
#[derive(Debug, Default, Clone)]
pub struct MockPin {
    pub history: Rc<RefCell<Vec<bool>>>,
}

impl MockPin {
    pub fn is_set(&self) -> bool {
        self.history.borrow().last().copied().unwrap_or(false)
    }
}

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.history.borrow_mut().push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.history.borrow_mut().push(true);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct EchoLine {
    /// Reads that still return low before the line rises, `None` = never rises by itself
    pub reads_until_rise: Option<u32>,
    pub high: bool,
    pub reads: u32,
}

#[derive(Debug, Default, Clone)]
pub struct MockEcho(pub Rc<RefCell<EchoLine>>);

impl MockEcho {
    pub fn rising_after(reads: u32) -> Self {
        Self(Rc::new(RefCell::new(EchoLine {
            reads_until_rise: Some(reads),
            ..Default::default()
        })))
    }

    pub fn silent() -> Self {
        Self::default()
    }

    pub fn fall(&self) {
        self.0.borrow_mut().high = false;
    }

    pub fn reads(&self) -> u32 {
        self.0.borrow().reads
    }
}

impl ErrorType for MockEcho {
    type Error = Infallible;
}

impl InputPin for MockEcho {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let mut line = self.0.borrow_mut();
        line.reads += 1;
        match line.reads_until_rise {
            Some(0) => {
                line.reads_until_rise = None;
                line.high = true;
            }
            Some(n) => line.reads_until_rise = Some(n - 1),
            None => {}
        }
        Ok(line.high)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

#[derive(Debug, Default)]
pub struct CounterState {
    pub ticks: u16,
    pub overflow: bool,
    pub restarts: u32,
}

#[derive(Debug, Default, Clone)]
pub struct MockCounter(pub Rc<RefCell<CounterState>>);

impl MockCounter {
    pub fn overflow(&self) {
        self.0.borrow_mut().overflow = true;
    }

    pub fn set_ticks(&self, ticks: u16) {
        self.0.borrow_mut().ticks = ticks;
    }

    pub fn restarts(&self) -> u32 {
        self.0.borrow().restarts
    }
}

impl CaptureCounter for MockCounter {
    fn restart(&mut self) {
        let mut state = self.0.borrow_mut();
        state.ticks = 0;
        state.overflow = false;
        state.restarts += 1;
    }

    fn ticks(&mut self) -> u16 {
        self.0.borrow().ticks
    }

    fn take_overflow(&mut self) -> bool {
        core::mem::take(&mut self.0.borrow_mut().overflow)
    }
}

/// Hardware events in the order they happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Select(Channel),
    Delay(u32),
    Start,
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

/// Delay that returns at once and logs the requested time in nanoseconds
#[derive(Debug, Default, Clone)]
pub struct MockDelay {
    pub log: EventLog,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Event::Delay(ns));
    }
}

#[derive(Debug, Default)]
pub struct AdcState {
    pub values: [u16; 2],
    /// Busy polls each conversion takes
    pub conversion_polls: u32,
    pub selected: Option<Channel>,
    pub remaining: u32,
    pub result: u16,
}

#[derive(Debug, Clone)]
pub struct MockAdc {
    pub state: Rc<RefCell<AdcState>>,
    pub log: EventLog,
}

impl MockAdc {
    pub fn new(values: [u16; 2], conversion_polls: u32, log: EventLog) -> Self {
        Self {
            state: Rc::new(RefCell::new(AdcState {
                values,
                conversion_polls,
                ..Default::default()
            })),
            log,
        }
    }

    pub fn set_values(&self, values: [u16; 2]) {
        self.state.borrow_mut().values = values;
    }
}

impl AdcSequencer for MockAdc {
    fn select(&mut self, channel: Channel) {
        self.state.borrow_mut().selected = Some(channel);
        self.log.borrow_mut().push(Event::Select(channel));
    }

    fn start(&mut self) {
        let mut state = self.state.borrow_mut();
        let channel = state.selected.unwrap_or(Channel::A);
        state.result = state.values[channel.index()];
        state.remaining = state.conversion_polls;
        self.log.borrow_mut().push(Event::Start);
    }

    fn is_busy(&mut self) -> bool {
        let mut state = self.state.borrow_mut();
        if state.remaining > 0 {
            state.remaining -= 1;
            true
        } else {
            false
        }
    }

    fn result(&mut self) -> u16 {
        self.state.borrow().result
    }
}

/// Sample source playing back a script, then repeating `fallback`
#[derive(Debug)]
pub struct ScriptedSource {
    pub script: VecDeque<Poll>,
    pub fallback: Poll,
    pub polls: u32,
    pub pinned: bool,
}

impl ScriptedSource {
    pub fn new(script: impl IntoIterator<Item = Poll>) -> Self {
        Self {
            script: script.into_iter().collect(),
            fallback: Poll::InProgress,
            polls: 0,
            pinned: false,
        }
    }
}

impl SampleSource for ScriptedSource {
    fn poll(&mut self) -> Poll {
        self.polls += 1;
        self.script.pop_front().unwrap_or(self.fallback)
    }

    fn rail_pinned(&self) -> bool {
        self.pinned
    }
}

#[derive(Debug, Default)]
pub struct MockTransport {
    pub ready: bool,
    pub sent: Vec<[u8; REPORT_LEN]>,
    pub services: u32,
}

impl Transport for MockTransport {
    fn is_ready(&mut self) -> bool {
        self.ready
    }

    fn send(&mut self, report: [u8; REPORT_LEN]) {
        assert!(self.ready, "report sent while transport not ready");
        self.sent.push(report);
    }

    fn service(&mut self) {
        self.services += 1;
    }
}

#[derive(Debug, Default)]
pub struct MockWatchdog {
    pub feeds: u32,
}

impl Watchdog for MockWatchdog {
    fn feed(&mut self) {
        self.feeds += 1;
    }
}
