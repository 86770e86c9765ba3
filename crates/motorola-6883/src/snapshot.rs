//! Save state.

use crate::error::SamError;
use crate::video::VideoCounter;

/// Everything durable about a SAM. Derived state (memory view, CPU clock)
/// is recomputed on restore.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SamSnapshot {
    /// Control register.
    pub state: u16,
    /// ENDC line.
    pub endc: bool,
    /// Video address counter.
    pub counter: u16,
    pub xdiv: u8,
    pub ydiv: u8,
}

/// Largest value either sub-divider can hold.
const DIVIDER_MAX: u8 = 15;

impl SamSnapshot {
    pub(crate) fn video(&self) -> Result<VideoCounter, SamError> {
        for (field, value) in [("xdiv", self.xdiv), ("ydiv", self.ydiv)] {
            if value > DIVIDER_MAX {
                return Err(SamError::InvalidSnapshot {
                    field,
                    value: u32::from(value),
                });
            }
        }
        Ok(VideoCounter {
            counter: self.counter,
            xdiv: self.xdiv,
            ydiv: self.ydiv,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divider_range_checked() {
        let snap = SamSnapshot { ydiv: 16, ..Default::default() };
        assert_eq!(
            snap.video(),
            Err(SamError::InvalidSnapshot { field: "ydiv", value: 16 })
        );
        let snap = SamSnapshot { counter: 0x0420, xdiv: 2, ydiv: 11, ..Default::default() };
        assert_eq!(
            snap.video(),
            Ok(VideoCounter { counter: 0x0420, xdiv: 2, ydiv: 11 })
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_round_trip() {
        let snap = SamSnapshot { state: 0xA403, endc: true, counter: 0x0E1F, xdiv: 1, ydiv: 9 };
        let json = serde_json::to_string(&snap).unwrap();
        assert_eq!(serde_json::from_str::<SamSnapshot>(&json).unwrap(), snap);
    }
}
