//! Sequential dual-channel analog sampler
//!
//! Converts two ADC channels one after the other without ever waiting on a
//! conversion. Each poll does one of: start channel A, latch A and start B,
//! latch B and yield the pair.
//!
//! After every multiplexer switch the sampler waits the configured settling
//! time before starting the next conversion. This delay is a hardware
//! requirement and must not be shortened.
//!
//! The pair is reduced to one raw value by [`PairMode`]. Independently of the
//! mode, a channel at or above the rail threshold is reported through
//! [`SampleSource::rail_pinned`] for the status indicator.

use embedded_hal::delay::DelayNs;

use super::{Poll, RawSample, SampleSource};
use crate::config::{RAIL_THRESHOLD, SETTLE_DELAY_US};

/// Analog input of the sampler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    A,
    B,
}

impl Channel {
    /// Slot of this channel in the latch buffer
    pub const fn index(self) -> usize {
        match self {
            Channel::A => 0,
            Channel::B => 1,
        }
    }
}

/// Single-shot ADC with a channel multiplexer
pub trait AdcSequencer {
    /// Routes `channel` to the converter
    fn select(&mut self, channel: Channel);

    /// Starts one conversion on the selected channel
    fn start(&mut self);

    /// Whether a started conversion has not completed yet
    fn is_busy(&mut self) -> bool;

    /// Result register of the last completed conversion
    fn result(&mut self) -> u16;
}

/// How the latched pair becomes one raw value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PairMode {
    /// Absolute difference between channel A and channel B
    Difference,
    /// Channel A passes through, channel B only feeds the rail indicator
    FirstChannel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DualChannelConfig {
    /// Settling time after a multiplexer switch in microseconds
    pub settle_us: u32,
    pub pair_mode: PairMode,
    /// Reading at or above which a channel counts as pinned
    pub rail_threshold: u16,
}

impl Default for DualChannelConfig {
    fn default() -> Self {
        Self {
            settle_us: SETTLE_DELAY_US,
            pair_mode: PairMode::FirstChannel,
            rail_threshold: RAIL_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AcquisitionState {
    Idle,
    ChannelAPending,
    ChannelBPending,
    /// Both channels latched, the pair has been yielded
    BothReady,
}

/// Dual-channel sample source
pub struct DualChannelSampler<A, D> {
    adc: A,
    delay: D,
    config: DualChannelConfig,
    state: AcquisitionState,
    latched: [u16; 2],
    rail_pinned: bool,
}

impl<A, D> DualChannelSampler<A, D>
where
    A: AdcSequencer,
    D: DelayNs,
{
    pub fn new(adc: A, delay: D, config: DualChannelConfig) -> Self {
        Self {
            adc,
            delay,
            config,
            state: AcquisitionState::Idle,
            latched: [0; 2],
            rail_pinned: false,
        }
    }

    pub fn state(&self) -> AcquisitionState {
        self.state
    }

    /// Last latched value of each channel, indexed by [`Channel::index`]
    pub fn latched(&self) -> [u16; 2] {
        self.latched
    }

    fn switch_and_start(&mut self, channel: Channel) {
        self.adc.select(channel);
        self.delay.delay_us(self.config.settle_us);
        self.adc.start();
    }

    fn latch(&mut self, channel: Channel) {
        let value = self.adc.result();
        if let Some(slot) = self.latched.get_mut(channel.index()) {
            *slot = value;
        }
    }

    fn reduce(&self) -> u16 {
        let [a, b] = self.latched;
        match self.config.pair_mode {
            PairMode::Difference => a.abs_diff(b),
            PairMode::FirstChannel => a,
        }
    }
}

impl<A, D> SampleSource for DualChannelSampler<A, D>
where
    A: AdcSequencer,
    D: DelayNs,
{
    fn poll(&mut self) -> Poll {
        match self.state {
            AcquisitionState::Idle | AcquisitionState::BothReady => {
                self.switch_and_start(Channel::A);
                self.state = AcquisitionState::ChannelAPending;
                Poll::InProgress
            }
            AcquisitionState::ChannelAPending => {
                if self.adc.is_busy() {
                    return Poll::InProgress;
                }
                self.latch(Channel::A);
                self.switch_and_start(Channel::B);
                self.state = AcquisitionState::ChannelBPending;
                Poll::InProgress
            }
            AcquisitionState::ChannelBPending => {
                if self.adc.is_busy() {
                    return Poll::InProgress;
                }
                self.latch(Channel::B);
                self.state = AcquisitionState::BothReady;

                let [a, b] = self.latched;
                let pinned = a >= self.config.rail_threshold || b >= self.config.rail_threshold;
                if pinned != self.rail_pinned {
                    debug!("rail pinned: {}", pinned);
                    self.rail_pinned = pinned;
                }
                Poll::Ready(RawSample::new(self.reduce()))
            }
        }
    }

    fn rail_pinned(&self) -> bool {
        self.rail_pinned
    }
}
