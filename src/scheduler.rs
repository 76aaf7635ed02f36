//! Cooperative scheduler
//!
//! Interleaves the measurement pipeline with transport servicing. One call to
//! [`Scheduler::tick`] runs, in order:
//! 1. feed the watchdog
//! 2. service the transport
//! 3. if a report is pending and the transport is ready, deliver it
//! 4. if nothing is pending, advance the sample source by one step and push a
//!    finished sample through the filter into the gate
//!
//! No step blocks except the bounded echo wait inside the pulse-width source,
//! so a tick always returns quickly. A source that keeps timing out never
//! offers anything; the loop keeps ticking and the transport keeps being
//! serviced.
//!
//! The status indicator is on while a report is pending, or while the source
//! reports an input pinned at its rail.

use embedded_hal::digital::OutputPin;

use crate::filter::OutlierFilter;
use crate::gate::DeliveryGate;
use crate::sensor::{Poll, SampleSource};
use crate::transport::Transport;

/// Liveness signal reset at the top of every tick
pub trait Watchdog {
    fn feed(&mut self);
}

/// What happened during one tick
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickOutcome {
    /// A pending report was handed to the transport
    pub delivered: bool,
    /// The sample source was advanced
    pub polled: bool,
    /// A filtered value entered the gate
    pub offered: Option<u16>,
}

pub struct Scheduler<S, T, W, L, const N: usize> {
    source: S,
    filter: OutlierFilter<N>,
    gate: DeliveryGate,
    transport: T,
    watchdog: W,
    indicator: L,
    indicator_on: bool,
}

impl<S, T, W, L, const N: usize> Scheduler<S, T, W, L, N>
where
    S: SampleSource,
    T: Transport,
    W: Watchdog,
    L: OutputPin,
{
    pub fn new(source: S, filter: OutlierFilter<N>, transport: T, watchdog: W, mut indicator: L) -> Self {
        let _ = indicator.set_low();
        Self {
            source,
            filter,
            gate: DeliveryGate::new(),
            transport,
            watchdog,
            indicator,
            indicator_on: false,
        }
    }

    /// Runs one bounded iteration of the loop
    pub fn tick(&mut self) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        self.watchdog.feed();
        self.transport.service();

        if self.gate.is_occupied() && self.gate.try_deliver(&mut self.transport) {
            outcome.delivered = true;
        }

        if !self.gate.is_occupied() {
            outcome.polled = true;
            if let Poll::Ready(sample) = self.source.poll() {
                if let Some(value) = self.filter.accept(sample) {
                    // the gate was checked empty above, so the offer cannot fail
                    if self.gate.offer(value).is_ok() {
                        outcome.offered = Some(value);
                    }
                }
            }
        }

        self.update_indicator();
        outcome
    }

    fn update_indicator(&mut self) {
        let on = self.gate.is_occupied() || self.source.rail_pinned();
        if on == self.indicator_on {
            return;
        }
        let _ = if on {
            self.indicator.set_high()
        } else {
            self.indicator.set_low()
        };
        self.indicator_on = on;
    }

    pub fn gate(&self) -> &DeliveryGate {
        &self.gate
    }

    pub fn filter(&self) -> &OutlierFilter<N> {
        &self.filter
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn watchdog(&self) -> &W {
        &self.watchdog
    }

    pub fn indicator(&self) -> &L {
        &self.indicator
    }

    pub fn indicator_on(&self) -> bool {
        self.indicator_on
    }
}
