//! Master clock configuration.

/// Master crystal frequency of a machine.
///
/// Every component clock derives from this by integer division.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MasterClock {
    /// Crystal frequency in Hz (e.g. `14_318_180` for an NTSC colour machine).
    pub frequency_hz: u64,
}

impl MasterClock {
    #[must_use]
    pub const fn new(frequency_hz: u64) -> Self {
        Self { frequency_hz }
    }

    /// Frequency after dividing the crystal by `divisor`.
    ///
    /// A zero divisor yields zero rather than panicking.
    #[must_use]
    pub const fn divided(&self, divisor: u64) -> u64 {
        match self.frequency_hz.checked_div(divisor) {
            Some(hz) => hz,
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ntsc_colour_crystal_divides_to_cpu_rates() {
        let clock = MasterClock::new(14_318_180);
        assert_eq!(clock.divided(16), 894_886);
        assert_eq!(clock.divided(8), 1_789_772);
    }

    #[test]
    fn zero_divisor_is_zero() {
        assert_eq!(MasterClock::new(1_000).divided(0), 0);
    }
}
