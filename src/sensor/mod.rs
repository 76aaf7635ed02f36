//! Sample sources
//!
//! A sample source advances its acquisition by exactly one hardware step per
//! [`SampleSource::poll`] call and returns immediately. Two interchangeable
//! variants exist:
//! - [`pulse_width::PulseWidthCapture`]: times an echo's high level with a
//!   free-running counter
//! - [`dual_channel::DualChannelSampler`]: converts two analog channels in turn
//!
//! The scheduler only polls a source while no report is pending, which is the
//! whole back-pressure mechanism: a source never runs more than one cycle
//! ahead of delivery.

pub mod dual_channel;
pub mod pulse_width;

/// One raw reading plus its validity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    value: u16,
    timed_out: bool,
}

impl RawSample {
    /// A valid reading
    pub const fn new(value: u16) -> Self {
        Self {
            value,
            timed_out: false,
        }
    }

    /// A reading cut short by the acquisition's timeout cap
    pub const fn timed_out(value: u16) -> Self {
        Self {
            value,
            timed_out: true,
        }
    }

    pub const fn value(&self) -> u16 {
        self.value
    }

    pub const fn is_timed_out(&self) -> bool {
        self.timed_out
    }
}

/// Result of advancing a source by one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Poll {
    /// The acquisition cycle finished, possibly with a timed-out sample
    Ready(RawSample),
    /// Still acquiring, poll again next tick
    InProgress,
}

/// Non-blocking acquisition of raw readings
pub trait SampleSource {
    /// Performs at most one hardware step of the current acquisition
    fn poll(&mut self) -> Poll;

    /// Whether the source sees one of its inputs pinned at the rail
    ///
    /// Only the dual-channel sampler reports this; it drives the status
    /// indicator and never feeds back into the pipeline.
    fn rail_pinned(&self) -> bool {
        false
    }
}
