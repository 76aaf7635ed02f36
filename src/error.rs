//! Core error type

use core::fmt;

/// Errors surfaced by the core pipeline.
///
/// Acquisition timeouts and outliers are not errors: the filter absorbs them
/// by yielding no value for that cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A value was offered while another report is still pending delivery
    GateOccupied,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::GateOccupied => f.write_str("delivery gate already holds a pending report"),
        }
    }
}
