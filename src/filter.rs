//! Moving average with outlier rejection
//!
//! Keeps the last `N` accepted raw readings in a fixed ring buffer and yields
//! their truncating integer mean.
//!
//! # Rejection
//! A sample is rejected when it is flagged as timed out, or when it differs
//! from the previous raw sample by at least the jump threshold. Rejected
//! samples leave the window untouched and yield `None`, but still become the
//! reference for the next delta, so a real step change is accepted on its
//! second reading.
//!
//! # Start-up
//! All state starts at zero. The first accepted sample seeds every slot of the
//! window, so early means are never dragged toward zero by empty slots.

use crate::config::JUMP_THRESHOLD;
use crate::sensor::RawSample;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FilterConfig {
    /// Smallest delta between consecutive raw samples that counts as noise
    pub jump_threshold: u16,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            jump_threshold: JUMP_THRESHOLD,
        }
    }
}

/// Outlier-rejecting moving average over `N` accepted samples
#[derive(Debug, Clone)]
pub struct OutlierFilter<const N: usize> {
    window: [u16; N],
    cursor: usize,
    last_raw: u16,
    seeded: bool,
    config: FilterConfig,
}

impl<const N: usize> OutlierFilter<N> {
    const NON_EMPTY: () = assert!(N > 0, "filter window must hold at least one sample");

    pub const fn new(config: FilterConfig) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NON_EMPTY;
        Self {
            window: [0; N],
            cursor: 0,
            last_raw: 0,
            seeded: false,
            config,
        }
    }

    /// Feeds one raw sample, returning the new mean if the sample was accepted
    pub fn accept(&mut self, sample: RawSample) -> Option<u16> {
        let raw = sample.value();
        let delta = raw.abs_diff(self.last_raw);
        self.last_raw = raw;

        if sample.is_timed_out() {
            debug!("rejected timed out sample");
            return None;
        }
        if delta >= self.config.jump_threshold {
            debug!("rejected outlier {} (delta {})", raw, delta);
            return None;
        }

        if self.seeded {
            if let Some(slot) = self.window.get_mut(self.cursor) {
                *slot = raw;
            }
        } else {
            self.window = [raw; N];
            self.seeded = true;
        }
        self.cursor = (self.cursor + 1) % N;

        Some(self.mean())
    }

    /// Truncating mean of all window slots
    pub fn mean(&self) -> u16 {
        let sum: u32 = self.window.iter().map(|&v| u32::from(v)).sum();
        // the mean of u16 values always fits in a u16
        (sum / N as u32) as u16
    }

    pub fn window(&self) -> &[u16; N] {
        &self.window
    }

    /// Most recent raw sample, accepted or not
    pub fn last_raw(&self) -> u16 {
        self.last_raw
    }

    pub fn config(&self) -> FilterConfig {
        self.config
    }
}
