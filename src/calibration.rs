//! Stored clock calibration
//!
//! A single byte in non-volatile storage trims the capture clock. Erased
//! storage reads `0xFF`, which means no calibration was written and the
//! factory divider applies. Any other value is used as the capture clock
//! divider directly, so the tick-to-time constants in [`crate::config`] hold.

/// Value of an erased calibration byte
pub const ABSENT: u8 = 0xff;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Calibration {
    /// Nothing stored, use the factory default
    Absent,
    /// Stored trim byte
    Trim(u8),
}

impl Calibration {
    pub const fn from_stored(byte: u8) -> Self {
        match byte {
            ABSENT => Calibration::Absent,
            trim => Calibration::Trim(trim),
        }
    }

    /// Capture clock divider to use, falling back to `default` when absent
    ///
    /// A divider of zero is not a valid clock setting and is raised to one.
    pub fn capture_divider(self, default: u8) -> u8 {
        match self {
            Calibration::Absent => default,
            Calibration::Trim(trim) => trim.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CAPTURE_DIVIDER;

    #[test]
    fn erased_byte_means_absent() {
        assert_eq!(Calibration::from_stored(0xff), Calibration::Absent);
        assert_eq!(
            Calibration::from_stored(0xff).capture_divider(CAPTURE_DIVIDER),
            CAPTURE_DIVIDER
        );
    }

    #[test]
    fn stored_byte_is_applied_directly() {
        assert_eq!(Calibration::from_stored(148), Calibration::Trim(148));
        assert_eq!(Calibration::from_stored(148).capture_divider(CAPTURE_DIVIDER), 148);
    }

    #[test]
    fn zero_trim_is_clamped() {
        assert_eq!(Calibration::from_stored(0).capture_divider(CAPTURE_DIVIDER), 1);
    }
}
